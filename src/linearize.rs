//! FIB linearizer: project the disjoint prefix set onto the integer
//! address line as a compact, ordered sequence of breakpoints.

use std::collections::BTreeMap;

use crate::family::Afi;
use crate::prefix::Prefix;
use crate::zone::ZoneSet;

/// One breakpoint on the address line: the zone set active starting at
/// `addr` (inclusive), until the next breakpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FibEntry {
    /// Integer address where this entry's zone set takes effect.
    pub addr: u128,
    /// The zone set active from `addr` up to (not including) the next
    /// entry's address — see module docs for the exact run semantics.
    pub zones: ZoneSet,
}

/// Linearize a disjoint prefix set into a compressed, sorted sequence of
/// `FibEntry` breakpoints.
///
/// Step 1 sorts by first address. Step 2 emits a start point for every
/// prefix and, unless it is a single-address prefix, an end point too. Step
/// 3 compresses consecutive runs that share a zone set down to at most two
/// entries, keeping only transition points (plus an end-of-run marker where
/// needed) and a final point that caps the list at `2^L - 1`.
pub fn linearize<A: Afi>(big_map: &BTreeMap<Prefix<A>, ZoneSet>) -> Vec<FibEntry> {
    let mut prefixes: Vec<&Prefix<A>> = big_map.keys().collect();
    prefixes.sort_by_key(|p| p.first_addr());

    let mut raw: Vec<FibEntry> = Vec::with_capacity(prefixes.len() * 2);
    for prefix in prefixes {
        let zones = big_map.get(prefix).expect("key from big_map").clone();
        let first = prefix.first_addr();
        let last = prefix.last_addr();
        raw.push(FibEntry {
            addr: first,
            zones: zones.clone(),
        });
        if last != first {
            raw.push(FibEntry { addr: last, zones });
        }
    }

    if raw.is_empty() {
        return raw;
    }

    let mut kept: Vec<FibEntry> = Vec::with_capacity(raw.len());
    let mut running = raw[0].zones.clone();

    for (idx, point) in raw.iter().enumerate() {
        let is_transition = idx == 0 || point.zones != running;
        if !is_transition {
            continue;
        }
        if idx > 0 {
            let prior = &raw[idx - 1];
            let last_kept_is_prior = kept.last().is_some_and(|k| k.addr == prior.addr);
            if kept.len() >= 2 && !last_kept_is_prior {
                kept.push(prior.clone());
            }
        }
        kept.push(point.clone());
        running = point.zones.clone();
    }

    let last_raw = raw.last().expect("checked non-empty above");
    if kept.last().map(|k| k.addr) != Some(last_raw.addr) {
        kept.push(last_raw.clone());
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Ipv4;
    use crate::prefix::Prefix;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<Prefix<Ipv4>, ZoneSet> {
        pairs
            .iter()
            .map(|(p, z)| (p.parse().unwrap(), ZoneSet::single(*z)))
            .collect()
    }

    #[test]
    fn default_plus_more_specific_fib() {
        let mut ribs = crate::rib::ingest(["0.0.0.0/0,e1", "192.0.2.0/24,e2"], ',').unwrap();
        let big_map = crate::coalesce::coalesce(&mut ribs.v4);
        let entries = linearize(&big_map);
        assert_eq!(entries.first().unwrap().addr, 0);
        assert_eq!(entries.last().unwrap().addr, u128::from(u32::MAX));
        let narrow: Prefix<Ipv4> = "192.0.2.0/24".parse().unwrap();
        assert!(entries
            .iter()
            .any(|e| e.addr == narrow.first_addr() && e.zones == ZoneSet::single("e2")));
    }

    #[test]
    fn full_coverage_invariant() {
        let big_map = map(&[("0.0.0.0/1", "a"), ("128.0.0.0/1", "b")]);
        let entries = linearize(&big_map);
        assert_eq!(entries.first().unwrap().addr, 0);
        assert_eq!(entries.last().unwrap().addr, u128::from(u32::MAX));
    }

    #[test]
    fn no_three_consecutive_entries_share_zones() {
        let big_map = map(&[
            ("0.0.0.0/2", "a"),
            ("64.0.0.0/2", "a"),
            ("128.0.0.0/2", "a"),
            ("192.0.0.0/2", "b"),
        ]);
        let entries = linearize(&big_map);
        for w in entries.windows(3) {
            assert!(!(w[0].zones == w[1].zones && w[1].zones == w[2].zones));
        }
    }

    #[test]
    fn single_host_prefix_emits_one_point() {
        let big_map = map(&[("0.0.0.0/0", "default"), ("192.0.2.1/32", "host")]);
        let entries = linearize(&big_map);
        let host_point = entries.iter().find(|e| e.zones == ZoneSet::single("host"));
        assert!(host_point.is_some());
    }
}
