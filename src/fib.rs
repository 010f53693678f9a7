//! Top-level assembly: wires RIB ingestion through coalescing, linearizing,
//! and resolution into the two public entry points external glue is
//! expected to call.

use std::collections::{HashMap, HashSet};

use crate::cache::ContainmentCache;
use crate::coalesce::coalesce;
use crate::error::Error;
use crate::family::{Afi, Ipv4, Ipv6};
use crate::linearize::{linearize, FibEntry};
use crate::prefix::Prefix;
use crate::query::{summarize_expression, AnyPrefix};
use crate::resolve::resolve;
use crate::rib;
use crate::zone::ZoneSet;

/// The linearized FIB and derived totals for a single address family.
#[derive(Clone, Debug)]
pub struct FamilyFib<A: Afi> {
    /// Sorted, compressed breakpoint entries — see [`crate::linearize`].
    pub entries: Vec<FibEntry>,
    /// Union of every zone present in this family's FIB, `NULL_ROUTE`
    /// included if any address space was left unrouted.
    pub total_zones: ZoneSet,
    /// `total_zones` with `NULL_ROUTE` removed.
    pub total_zones_stripped: ZoneSet,
    _family: std::marker::PhantomData<A>,
}

impl<A: Afi> FamilyFib<A> {
    /// Reassemble a `FamilyFib` from its parts — used when restoring a FIB
    /// persisted to disk by external glue.
    #[must_use]
    pub fn from_parts(entries: Vec<FibEntry>, total_zones: ZoneSet, total_zones_stripped: ZoneSet) -> Self {
        Self {
            entries,
            total_zones,
            total_zones_stripped,
            _family: std::marker::PhantomData,
        }
    }

    fn from_big_map(big_map: std::collections::BTreeMap<Prefix<A>, ZoneSet>) -> Self {
        let mut total_zones = ZoneSet::new();
        for zones in big_map.values() {
            total_zones.union_with(zones);
        }
        let total_zones_stripped = total_zones.without_null_route();
        let entries = linearize(&big_map);
        Self {
            entries,
            total_zones,
            total_zones_stripped,
            _family: std::marker::PhantomData,
        }
    }
}

/// The immutable, two-family forwarding table built from a RIB snapshot.
pub struct Fib {
    /// IPv4 FIB.
    pub v4: FamilyFib<Ipv4>,
    /// IPv6 FIB.
    pub v6: FamilyFib<Ipv6>,
}

impl Fib {
    /// Build a [`Fib`] from RIB rows (`"prefix<sep>zone"` lines, optional
    /// header, auto-detected).
    pub fn build<I, S>(rib_rows: I, field_separator: char) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ribs = rib::ingest(rib_rows, field_separator)?;
        tracing::info!("coalescing IPv4 RIB");
        let v4_big = coalesce(&mut ribs.v4);
        tracing::info!("coalescing IPv6 RIB");
        let v6_big = coalesce(&mut ribs.v6);
        Ok(Self {
            v4: FamilyFib::from_big_map(v4_big),
            v6: FamilyFib::from_big_map(v6_big),
        })
    }

    /// Summarize `text` (a bare host, CIDR prefix, or inclusive `A-B`
    /// range) and union the resolved zone set across every summarized
    /// prefix.
    pub fn resolve_expression(&self, text: &str) -> Result<ZoneSet, Error> {
        let prefixes = summarize_expression(text)?;
        let mut zones = ZoneSet::new();
        for prefix in prefixes {
            match prefix {
                AnyPrefix::V4(p) => zones.union_with(&resolve(&self.v4.entries, &self.v4.total_zones, &p)),
                AnyPrefix::V6(p) => zones.union_with(&resolve(&self.v6.entries, &self.v6.total_zones, &p)),
            }
        }
        Ok(zones)
    }

    /// Resolve a batch of query expressions, applying the containment
    /// cache once per family. Parse errors attach to their own expression
    /// and do not abort the rest of the batch.
    #[must_use]
    pub fn resolve_batch<'a, I>(&self, expressions: I) -> HashMap<String, Result<ZoneSet, Error>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let expressions: Vec<&str> = expressions.into_iter().collect();

        let mut parsed: HashMap<&str, Vec<AnyPrefix>> = HashMap::new();
        let mut errors: HashMap<&str, Error> = HashMap::new();
        let mut v4_set: HashSet<Prefix<Ipv4>> = HashSet::new();
        let mut v6_set: HashSet<Prefix<Ipv6>> = HashSet::new();

        for &expr in &expressions {
            match summarize_expression(expr) {
                Ok(prefixes) => {
                    for p in &prefixes {
                        match p {
                            AnyPrefix::V4(p) => {
                                v4_set.insert(*p);
                            }
                            AnyPrefix::V6(p) => {
                                v6_set.insert(*p);
                            }
                        }
                    }
                    parsed.insert(expr, prefixes);
                }
                Err(e) => {
                    tracing::warn!(expression = expr, error = %e, "query failed to parse");
                    errors.insert(expr, e);
                }
            }
        }

        let v4_queries: Vec<Prefix<Ipv4>> = v4_set.into_iter().collect();
        let v6_queries: Vec<Prefix<Ipv6>> = v6_set.into_iter().collect();

        tracing::info!(count = expressions.len(), "resolving query batch");
        let v4_cache = ContainmentCache::resolve_batch(&self.v4.entries, &self.v4.total_zones, &v4_queries);
        let v6_cache = ContainmentCache::resolve_batch(&self.v6.entries, &self.v6.total_zones, &v6_queries);

        let mut out = HashMap::with_capacity(expressions.len());
        for &expr in &expressions {
            if let Some(err) = errors.get(expr) {
                out.insert(expr.to_string(), Err(err.clone()));
                continue;
            }
            let prefixes = parsed.get(expr).expect("every non-errored expression was parsed");
            let mut zones = ZoneSet::new();
            for p in prefixes {
                match p {
                    AnyPrefix::V4(p) => {
                        if let Some(z) = v4_cache.get(p) {
                            zones.union_with(z);
                        }
                    }
                    AnyPrefix::V6(p) => {
                        if let Some(z) = v6_cache.get(p) {
                            zones.union_with(z);
                        }
                    }
                }
            }
            out.insert(expr.to_string(), Ok(zones));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_s1_and_s6() {
        let fib = Fib::build(
            [
                "0.0.0.0/0,e1",
                "192.0.2.0/24,e2",
                "::/0,f1",
                "2001:db8::/32,f2",
            ],
            ',',
        )
        .unwrap();

        assert_eq!(
            fib.resolve_expression("192.0.2.5").unwrap(),
            ZoneSet::single("e2")
        );
        assert_eq!(
            fib.resolve_expression("192.0.3.5").unwrap(),
            ZoneSet::single("e1")
        );
        assert_eq!(
            fib.resolve_expression("2001:db8::1").unwrap(),
            ZoneSet::single("f2")
        );
        assert_eq!(
            fib.resolve_expression("2001:db9::/32").unwrap(),
            ZoneSet::single("f1")
        );
    }

    #[test]
    fn resolve_batch_does_not_abort_on_bad_expression() {
        let fib = Fib::build(["0.0.0.0/0,e1"], ',').unwrap();
        let results = fib.resolve_batch(["192.0.2.1", "not-an-address"]);
        assert!(results["192.0.2.1"].is_ok());
        assert!(results["not-an-address"].is_err());
    }

    #[test]
    fn range_equivalence() {
        let fib = Fib::build(["0.0.0.0/0,e1", "192.0.2.0/24,e2"], ',').unwrap();
        let direct = fib.resolve_expression("192.0.1.250-192.0.2.10").unwrap();
        assert_eq!(direct, ZoneSet::single("e1").union(&ZoneSet::single("e2")));
    }
}
