//! RIB ingestion: read `(prefix, zone)` rows, collapse ECMP duplicates by
//! zone-set union, bucket by prefix length per address family, and
//! backfill a default route so the coalescer always starts from full
//! coverage.

use std::collections::HashMap;

use crate::error::Error;
use crate::family::{Afi, Ipv4, Ipv6};
use crate::prefix::Prefix;
use crate::query::{parse_any_prefix, AnyPrefix};
use crate::zone::{reject_reserved_token, ZoneSet};

/// Per-family routes bucketed by prefix length, `levels[p]` holding every
/// distinct prefix of length `p` seen so far.
pub struct Rib<A: Afi> {
    levels: Vec<HashMap<Prefix<A>, ZoneSet>>,
}

impl<A: Afi> Rib<A> {
    fn new() -> Self {
        Self {
            levels: (0..=A::MAX_LENGTH).map(|_| HashMap::new()).collect(),
        }
    }

    /// Insert or merge a route. ECMP: a second route for an already-present
    /// prefix unions its zone into the existing set rather than replacing
    /// it.
    pub fn insert(&mut self, prefix: Prefix<A>, zone: &str) {
        self.levels[usize::from(prefix.length())]
            .entry(prefix)
            .or_insert_with(ZoneSet::new)
            .insert(zone.to_string());
    }

    fn backfill_default(&mut self) {
        if self.levels[0].is_empty() {
            self.levels[0].insert(Prefix::default_route(), ZoneSet::null_route());
        }
    }

    /// Routes at a given prefix length.
    #[must_use]
    pub fn level(&self, plen: u8) -> &HashMap<Prefix<A>, ZoneSet> {
        &self.levels[usize::from(plen)]
    }

    /// Mutable access to the routes at a given prefix length.
    pub fn level_mut(&mut self, plen: u8) -> &mut HashMap<Prefix<A>, ZoneSet> {
        &mut self.levels[usize::from(plen)]
    }

    /// Highest prefix length with any routes present.
    #[must_use]
    pub fn max_length(&self) -> u8 {
        A::MAX_LENGTH
    }
}

/// The ingested routing tables for both address families.
pub struct Ribs {
    /// IPv4 routes.
    pub v4: Rib<Ipv4>,
    /// IPv6 routes.
    pub v6: Rib<Ipv6>,
}

/// Ingest a sequence of raw RIB rows (`"prefix<sep>zone"`, one per line),
/// auto-detecting and skipping a header row, rejecting the reserved
/// sentinel token, and skipping rows with an empty zone field.
///
/// The first row triggers header detection: if field 0 fails to parse as a
/// prefix, the row is skipped silently. Every subsequent parse failure is
/// fatal — the RIB cannot be built partially.
pub fn ingest<I, S>(rows: I, field_separator: char) -> Result<Ribs, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ribs = Ribs {
        v4: Rib::new(),
        v6: Rib::new(),
    };

    let mut first_row = true;

    for raw in rows {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }
        reject_reserved_token(raw)?;

        let mut fields = raw.splitn(2, field_separator);
        let prefix_text = fields.next().unwrap_or("").trim();
        let zone_text = fields.next().unwrap_or("").trim();

        if first_row {
            first_row = false;
            if parse_any_prefix(prefix_text).is_err() {
                tracing::debug!(row = raw, "skipping RIB header row");
                continue;
            }
        }

        let prefix = parse_any_prefix(prefix_text)?;

        if zone_text.is_empty() {
            tracing::warn!(prefix = prefix_text, "RIB row has empty zone, skipping");
            continue;
        }

        match prefix {
            AnyPrefix::V4(p) => {
                tracing::debug!(prefix = %p, zone = zone_text, "ingesting RIB row");
                ribs.v4.insert(p, zone_text);
            }
            AnyPrefix::V6(p) => {
                tracing::debug!(prefix = %p, zone = zone_text, "ingesting RIB row");
                ribs.v6.insert(p, zone_text);
            }
        }
    }

    ribs.v4.backfill_default();
    ribs.v6.backfill_default();

    Ok(ribs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecmp_union_on_duplicate_prefix() {
        let rows = ["10.0.0.0/8,a", "10.0.0.0/8,b"];
        let ribs = ingest(rows, ',').unwrap();
        let p: Prefix<Ipv4> = "10.0.0.0/8".parse().unwrap();
        let zones = ribs.v4.level(8).get(&p).unwrap();
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn header_row_is_skipped() {
        let rows = ["prefix,zone", "10.0.0.0/8,a"];
        let ribs = ingest(rows, ',').unwrap();
        assert_eq!(ribs.v4.level(8).len(), 1);
    }

    #[test]
    fn empty_zone_field_is_skipped_not_fatal() {
        let rows = ["10.0.0.0/8,", "10.1.0.0/16,b"];
        let ribs = ingest(rows, ',').unwrap();
        assert!(ribs.v4.level(8).is_empty());
        assert_eq!(ribs.v4.level(16).len(), 1);
    }

    #[test]
    fn default_route_backfilled_when_absent() {
        let rows = ["192.0.2.0/24,e"];
        let ribs = ingest(rows, ',').unwrap();
        let default = ribs.v4.level(0).get(&Prefix::default_route()).unwrap();
        assert!(default.is_null_route_only());
    }

    #[test]
    fn explicit_default_route_is_not_overwritten() {
        let rows = ["0.0.0.0/0,e1", "192.0.2.0/24,e2"];
        let ribs = ingest(rows, ',').unwrap();
        let default = ribs.v4.level(0).get(&Prefix::default_route()).unwrap();
        assert!(!default.is_null_route_only());
    }

    #[test]
    fn reserved_token_is_rejected() {
        let rows = ["####NULL_ROUTED####/8,a"];
        assert!(ingest(rows, ',').is_err());
    }
}
