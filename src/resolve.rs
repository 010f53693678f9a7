//! Zone resolver: answer `prefix → zone_set` by interval search over the
//! linearized FIB.

use crate::linearize::FibEntry;
use crate::prefix::Prefix;
use crate::family::Afi;
use crate::zone::ZoneSet;

/// Resolve a prefix against a linearized, sorted FIB for its family.
///
/// `total_zones` is the union of every zone in the FIB, used as the
/// short-circuit answer for `prefixlen == 0` (a query covering the whole
/// address space necessarily touches every zone).
pub fn resolve<A: Afi>(fib: &[FibEntry], total_zones: &ZoneSet, net: &Prefix<A>) -> ZoneSet {
    if net.length() == 0 {
        return total_zones.clone();
    }

    let s = net.first_addr();
    let e = net.last_addr();

    let mut slice_start = 0usize;
    let mut start_found = false;
    let mut slice_end = None;

    for (idx, entry) in fib.iter().enumerate() {
        if !start_found {
            if s < entry.addr {
                slice_start = idx.saturating_sub(1);
                start_found = true;
            } else if s == entry.addr {
                slice_start = idx;
                start_found = true;
            }
        }
        if start_found {
            if e < entry.addr {
                slice_end = Some(idx);
                break;
            } else if e == entry.addr {
                slice_end = Some(idx + 1);
                break;
            }
        }
    }

    let mut slice_end = slice_end.unwrap_or(fib.len());
    if slice_end == slice_start {
        slice_end += 1;
    }

    let mut zones = ZoneSet::new();
    for entry in &fib[slice_start..slice_end.min(fib.len())] {
        zones.union_with(&entry.zones);
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalesce::coalesce;
    use crate::family::Ipv4;
    use crate::linearize::linearize;
    use crate::rib::ingest;

    fn build(rows: &[&str]) -> (Vec<FibEntry>, ZoneSet) {
        let mut ribs = ingest(rows.iter().copied(), ',').unwrap();
        let big_map = coalesce(&mut ribs.v4);
        let fib = linearize(&big_map);
        let mut total = ZoneSet::new();
        for (_, zones) in &big_map {
            total.union_with(zones);
        }
        (fib, total)
    }

    fn p(s: &str) -> Prefix<Ipv4> {
        s.parse().unwrap()
    }

    #[test]
    fn s1_default_plus_more_specific() {
        let (fib, total) = build(&["0.0.0.0/0,e1", "192.0.2.0/24,e2"]);
        assert_eq!(resolve(&fib, &total, &p("192.0.2.5")), ZoneSet::single("e2"));
        assert_eq!(resolve(&fib, &total, &p("192.0.3.5")), ZoneSet::single("e1"));
        let both = resolve(&fib, &total, &p("192.0.2.0/23"));
        assert_eq!(both, ZoneSet::single("e1").union(&ZoneSet::single("e2")));
    }

    #[test]
    fn s2_ecmp() {
        let (fib, total) = build(&["10.0.0.0/8,a", "10.0.0.0/8,b"]);
        let zones = resolve(&fib, &total, &p("10.0.0.0/8"));
        assert_eq!(zones, ZoneSet::single("a").union(&ZoneSet::single("b")));
    }

    #[test]
    fn s3_nested_override() {
        let (fib, total) = build(&[
            "0.0.0.0/0,default",
            "10.0.0.0/8,a",
            "10.1.0.0/16,b",
            "10.1.2.0/24,c",
        ]);
        assert_eq!(
            resolve(&fib, &total, &p("10.1.0.0/16")),
            ZoneSet::single("b").union(&ZoneSet::single("c"))
        );
        assert_eq!(
            resolve(&fib, &total, &p("10.0.0.0/8")),
            ZoneSet::single("a")
                .union(&ZoneSet::single("b"))
                .union(&ZoneSet::single("c"))
        );
        assert_eq!(resolve(&fib, &total, &p("10.2.0.0/16")), ZoneSet::single("a"));
    }

    #[test]
    fn s5_no_default_yields_null_route() {
        let (fib, total) = build(&["192.0.2.0/24,e2"]);
        assert_eq!(resolve(&fib, &total, &p("10.0.0.0/8")), ZoneSet::null_route());
    }

    #[test]
    fn prefixlen_zero_short_circuits_to_total_zones() {
        let (fib, total) = build(&["0.0.0.0/0,e1", "192.0.2.0/24,e2"]);
        assert_eq!(resolve(&fib, &total, &p("0.0.0.0/0")), total);
    }
}
