//! Zone identifiers and zone sets.
//!
//! A RIB row or a resolved query carries not one zone but a *set* of zones
//! (ECMP: more than one next-hop, hence more than one egress zone, for the
//! same prefix). Zone sets are small — almost always one or two elements —
//! so a sorted, deduplicated `Vec<Arc<str>>` beats a hash set here.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;

/// The literal zone name written into the linearized FIB for address space
/// that was never covered by any RIB entry, or that was explicitly routed to
/// a null/blackhole next-hop in the original RIB.
pub const NULL_ROUTE: &str = "NULL_ROUTE";

/// A literal that must never appear in RIB, policy, or zone input: it is
/// reserved for the tool's own internal bookkeeping sentinel and colliding
/// with it would silently corrupt the zone/default-route distinction.
pub const RESERVED_TOKEN: &str = "####NULL_ROUTED####";

/// Returns [`Error::ReservedTokenError`] if `text` contains the reserved
/// token anywhere.
pub fn reject_reserved_token(text: &str) -> Result<(), Error> {
    if text.contains(RESERVED_TOKEN) {
        Err(Error::ReservedTokenError {
            token: RESERVED_TOKEN,
        })
    } else {
        Ok(())
    }
}

/// A deduplicated, sorted set of zone names.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneSet(BTreeSet<Arc<str>>);

impl ZoneSet {
    /// The empty zone set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// A zone set containing a single zone.
    #[must_use]
    pub fn single(zone: impl Into<Arc<str>>) -> Self {
        let mut set = BTreeSet::new();
        set.insert(zone.into());
        Self(set)
    }

    /// The singleton `NULL_ROUTE` zone set.
    #[must_use]
    pub fn null_route() -> Self {
        Self::single(NULL_ROUTE)
    }

    /// Insert a zone, returning whether it was newly added.
    pub fn insert(&mut self, zone: impl Into<Arc<str>>) -> bool {
        self.0.insert(zone.into())
    }

    /// Union `other` into `self` in place (the ECMP merge rule: two RIB
    /// entries for the same prefix widen the zone set rather than
    /// overwriting it).
    pub fn union_with(&mut self, other: &Self) {
        for zone in &other.0 {
            self.0.insert(zone.clone());
        }
    }

    /// The union of `self` and `other`, without mutating either.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// Does this set contain only `NULL_ROUTE`?
    #[must_use]
    pub fn is_null_route_only(&self) -> bool {
        self.0.len() == 1 && self.0.contains(NULL_ROUTE)
    }

    /// This zone set with `NULL_ROUTE` removed, if present.
    #[must_use]
    pub fn without_null_route(&self) -> Self {
        let mut set = self.0.clone();
        set.remove(NULL_ROUTE);
        Self(set)
    }

    /// Number of zones in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no zones at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the zones in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(AsRef::as_ref)
    }
}

impl FromIterator<Arc<str>> for ZoneSet {
    fn from_iter<I: IntoIterator<Item = Arc<str>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<String> for ZoneSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        iter.into_iter().map(Arc::from).collect()
    }
}

impl fmt::Display for ZoneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut zones = self.iter();
        if let Some(first) = zones.next() {
            write!(f, "{first}")?;
            for zone in zones {
                write!(f, ";{zone}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_deduplicates() {
        let mut a = ZoneSet::single("blue");
        let b = ZoneSet::single("blue");
        a.union_with(&b);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn union_merges_distinct_zones() {
        let a = ZoneSet::single("blue");
        let b = ZoneSet::single("red");
        let merged = a.union(&b);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.to_string(), "blue;red");
    }

    #[test]
    fn null_route_detection() {
        assert!(ZoneSet::null_route().is_null_route_only());
        let mixed = ZoneSet::null_route().union(&ZoneSet::single("blue"));
        assert!(!mixed.is_null_route_only());
        assert_eq!(mixed.without_null_route(), ZoneSet::single("blue"));
    }

    #[test]
    fn reserved_token_detection() {
        assert!(reject_reserved_token("blue").is_ok());
        assert!(reject_reserved_token("####NULL_ROUTED####").is_err());
    }
}
