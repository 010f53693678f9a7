//! Containment cache: amortize resolver calls over a batch of queries
//! using prefix containment — a shorter prefix that resolves to a single
//! zone guarantees the same answer for every more-specific prefix it
//! contains.

use std::collections::HashMap;

use crate::family::Afi;
use crate::linearize::FibEntry;
use crate::prefix::Prefix;
use crate::resolve::resolve;
use crate::zone::ZoneSet;

/// A per-family containment cache, live for one batch resolution pass.
pub struct ContainmentCache<A: Afi> {
    cache: HashMap<Prefix<A>, ZoneSet>,
}

impl<A: Afi> ContainmentCache<A> {
    /// Resolve every prefix in `queries` (assumed de-duplicated) against
    /// `fib`, short-circuiting more-specific prefixes contained in a
    /// shorter, singleton-zone prefix already resolved earlier in the same
    /// batch.
    pub fn resolve_batch(
        fib: &[FibEntry],
        total_zones: &ZoneSet,
        queries: &[Prefix<A>],
    ) -> Self {
        let mut sorted = queries.to_vec();
        sorted.sort_by_key(Prefix::length);
        let n = sorted.len();

        let mut cache: HashMap<Prefix<A>, ZoneSet> = HashMap::new();
        let mut done: Vec<bool> = vec![false; n];
        let mut prev_group: Option<(usize, usize)> = None;

        let mut idx = 0;
        while idx < n {
            let cur_plen = sorted[idx].length();
            let group_start = idx;
            while idx < n && sorted[idx].length() == cur_plen {
                idx += 1;
            }
            let group_end = idx;

            if let Some((prev_start, prev_end)) = prev_group {
                for pidx in prev_start..prev_end {
                    let ob = sorted[pidx];
                    let Some(ob_zones) = cache.get(&ob).cloned() else {
                        continue;
                    };
                    if ob_zones.len() != 1 {
                        continue;
                    }
                    for oidx in group_start..n {
                        if done[oidx] {
                            continue;
                        }
                        let candidate = sorted[oidx];
                        if ob.contains(&candidate) {
                            cache.insert(candidate, ob_zones.clone());
                            done[oidx] = true;
                        }
                    }
                }
            }

            for gidx in group_start..group_end {
                if !done[gidx] {
                    let prefix = sorted[gidx];
                    let zones = resolve(fib, total_zones, &prefix);
                    cache.insert(prefix, zones);
                    done[gidx] = true;
                }
            }

            prev_group = Some((group_start, group_end));
        }

        Self { cache }
    }

    /// Look up the resolved zone set for `prefix`, if it was part of the
    /// batch this cache was built from.
    #[must_use]
    pub fn get(&self, prefix: &Prefix<A>) -> Option<&ZoneSet> {
        self.cache.get(prefix)
    }
}
