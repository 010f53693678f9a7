//! On-disk FIB persistence.
//!
//! The core's own types (`FibEntry`, `ZoneSet`) are not `serde`-friendly by
//! construction — `ZoneSet` carries interned `Arc<str>` zone labels, and a
//! round-trip through a plain `Vec<String>` is simpler than teaching serde
//! about the interning. [`PersistedFib`] is the flat, serializable schema
//! external glue (the CLI's `-p/--pickled-fib` cache) actually writes.
//! Layout is otherwise unspecified: this is one faithful round-tripping
//! representation, not a contract.

use serde::{Deserialize, Serialize};

use crate::family::{Ipv4, Ipv6};
use crate::fib::{FamilyFib, Fib};
use crate::linearize::FibEntry;
use crate::zone::ZoneSet;

#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    addr: u128,
    zones: Vec<String>,
}

impl From<&FibEntry> for PersistedEntry {
    fn from(entry: &FibEntry) -> Self {
        Self {
            addr: entry.addr,
            zones: entry.zones.iter().map(str::to_string).collect(),
        }
    }
}

impl From<PersistedEntry> for FibEntry {
    fn from(entry: PersistedEntry) -> Self {
        FibEntry {
            addr: entry.addr,
            zones: entry.zones.into_iter().collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedFamily {
    entries: Vec<PersistedEntry>,
    total_zones: Vec<String>,
    total_zones_stripped: Vec<String>,
}

impl<A: crate::family::Afi> From<&FamilyFib<A>> for PersistedFamily {
    fn from(fib: &FamilyFib<A>) -> Self {
        Self {
            entries: fib.entries.iter().map(PersistedEntry::from).collect(),
            total_zones: fib.total_zones.iter().map(str::to_string).collect(),
            total_zones_stripped: fib.total_zones_stripped.iter().map(str::to_string).collect(),
        }
    }
}

impl PersistedFamily {
    fn into_family_fib<A: crate::family::Afi>(self) -> FamilyFib<A> {
        FamilyFib::from_parts(
            self.entries.into_iter().map(FibEntry::from).collect(),
            self.total_zones.into_iter().collect(),
            self.total_zones_stripped.into_iter().collect(),
        )
    }
}

/// A flat, serializable snapshot of a built [`Fib`], suitable for caching
/// to disk between runs.
#[derive(Serialize, Deserialize)]
pub struct PersistedFib {
    v4: PersistedFamily,
    v6: PersistedFamily,
}

impl From<&Fib> for PersistedFib {
    fn from(fib: &Fib) -> Self {
        Self {
            v4: PersistedFamily::from(&fib.v4),
            v6: PersistedFamily::from(&fib.v6),
        }
    }
}

impl From<PersistedFib> for Fib {
    fn from(persisted: PersistedFib) -> Self {
        Fib {
            v4: persisted.v4.into_family_fib::<Ipv4>(),
            v6: persisted.v6.into_family_fib::<Ipv6>(),
        }
    }
}

/// Serialize `fib` with `bincode`.
pub fn to_bytes(fib: &Fib) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(&PersistedFib::from(fib))
}

/// Deserialize a [`Fib`] previously written by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<Fib, bincode::Error> {
    let persisted: PersistedFib = bincode::deserialize(bytes)?;
    Ok(persisted.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_lookup_answers() {
        let fib = Fib::build(["0.0.0.0/0,e1", "192.0.2.0/24,e2"], ',').unwrap();
        let bytes = to_bytes(&fib).unwrap();
        let restored = from_bytes(&bytes).unwrap();

        for query in ["192.0.2.5", "192.0.3.5", "192.0.2.0/23"] {
            assert_eq!(
                fib.resolve_expression(query).unwrap(),
                restored.resolve_expression(query).unwrap(),
                "mismatch for {query}"
            );
        }
    }
}
