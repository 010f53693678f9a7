//! Prefix coalescer: eliminate overlap in a per-family RIB by fragmenting
//! supernets around the more-specific routes they contain, producing a
//! disjoint `Prefix → ZoneSet` mapping that still covers the whole address
//! space.

use std::collections::{BTreeMap, HashMap};

use crate::family::Afi;
use crate::prefix::exclude::address_exclude;
use crate::prefix::Prefix;
use crate::rib::Rib;
use crate::zone::ZoneSet;

/// Coalesce `rib` in place and return the resulting disjoint prefix set.
///
/// Works top-down by prefix length: each route at `plen` searches its
/// ancestor levels (`plen - 1` down to `0`) for the nearest remaining
/// supernet that still covers it, fragments that supernet around the route
/// via [`address_exclude`], and stops. A route never needs to fragment more
/// than one ancestor, because any supernet further up the chain gets its own
/// turn to fragment — around whichever more-specific route covers it — once
/// the outer pass reaches that supernet's own length.
pub fn coalesce<A: Afi>(rib: &mut Rib<A>) -> BTreeMap<Prefix<A>, ZoneSet> {
    for plen in (1..=A::MAX_LENGTH).rev() {
        let routes: Vec<Prefix<A>> = rib.level(plen).keys().copied().collect();

        for route in routes {
            let mut supernet_cache: HashMap<u8, Prefix<A>> = HashMap::new();

            for lvl in (0..plen).rev() {
                let supernet = *supernet_cache
                    .entry(lvl)
                    .or_insert_with(|| route.supernet(lvl).expect("lvl <= route.length()"));

                if !rib.level(lvl).contains_key(&supernet) {
                    continue;
                }

                tracing::debug!(?route, ?supernet, level = lvl, "fragmenting supernet");
                let zones = rib
                    .level(lvl)
                    .get(&supernet)
                    .expect("just checked presence")
                    .clone();

                let siblings = address_exclude(supernet, route)
                    .expect("route is contained in its own ancestor supernet by construction");

                for sibling in siblings {
                    rib.level_mut(sibling.length())
                        .insert(sibling, zones.clone());
                }
                rib.level_mut(lvl).remove(&supernet);
                break;
            }
        }
    }

    let mut big_map = BTreeMap::new();
    for plen in (0..=A::MAX_LENGTH).rev() {
        for (prefix, zones) in rib.level(plen) {
            big_map.entry(*prefix).or_insert_with(|| zones.clone());
        }
    }
    big_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Ipv4;
    use crate::rib;

    fn coalesced(rows: &[&str]) -> BTreeMap<Prefix<Ipv4>, ZoneSet> {
        let mut ribs = rib::ingest(rows.iter().copied(), ',').unwrap();
        coalesce(&mut ribs.v4)
    }

    fn is_disjoint_and_complete(big_map: &BTreeMap<Prefix<Ipv4>, ZoneSet>) {
        let mut covered: u128 = 0;
        let mut prefixes: Vec<_> = big_map.keys().copied().collect();
        prefixes.sort_by_key(Prefix::first_addr);
        let mut expect_next = 0u128;
        for p in &prefixes {
            assert_eq!(p.first_addr(), expect_next, "gap or overlap before {p:?}");
            expect_next = p.last_addr() + 1;
            covered += p.last_addr() - p.first_addr() + 1;
        }
        assert_eq!(covered, u128::from(u32::MAX) + 1);
    }

    #[test]
    fn default_plus_more_specific_is_disjoint() {
        let big_map = coalesced(&["0.0.0.0/0,e1", "192.0.2.0/24,e2"]);
        is_disjoint_and_complete(&big_map);
        let narrow: Prefix<Ipv4> = "192.0.2.0/24".parse().unwrap();
        assert_eq!(big_map.get(&narrow).unwrap(), &ZoneSet::single("e2"));
    }

    #[test]
    fn nested_override_preserves_lpm() {
        let big_map = coalesced(&[
            "0.0.0.0/0,default",
            "10.0.0.0/8,a",
            "10.1.0.0/16,b",
            "10.1.2.0/24,c",
        ]);
        is_disjoint_and_complete(&big_map);
        let inner: Prefix<Ipv4> = "10.1.2.0/24".parse().unwrap();
        assert_eq!(big_map.get(&inner).unwrap(), &ZoneSet::single("c"));
    }

    #[test]
    fn already_disjoint_rib_is_a_no_op() {
        let rows = ["0.0.0.0/0,e1", "128.0.0.0/1,e2"];
        let big_map = coalesced(&rows);
        assert_eq!(big_map.len(), 2);
        is_disjoint_and_complete(&big_map);
    }
}
