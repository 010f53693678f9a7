//! `address_exclude`: the disjoint set of prefixes covering `supernet \
//! subnet`, used by the coalescer to fragment a supernet around a
//! more-specific route it contains.

use crate::address::Address;
use crate::error::Error;
use crate::family::Afi;
use crate::prefix::Prefix;

/// Yield the prefixes covering `supernet` minus `subnet`, in ascending
/// address order. `subnet` must be contained in `supernet` (including the
/// degenerate case `subnet == supernet`, which yields no siblings).
///
/// Deterministic bisection: repeatedly split the prefix that still contains
/// `subnet` in two, keep the half that doesn't, and recurse into the half
/// that does, until the containing half collapses onto `subnet` itself.
pub fn address_exclude<A: Afi>(
    supernet: Prefix<A>,
    subnet: Prefix<A>,
) -> Result<Vec<Prefix<A>>, Error> {
    if !supernet.contains(&subnet) {
        return Err(Error::InvalidRange {
            start: format!("{}/{}", supernet.network().value(), supernet.length()),
            end: format!("{}/{}", subnet.network().value(), subnet.length()),
            reason: "subnet is not contained in supernet",
        });
    }

    let mut siblings = Vec::new();
    let mut current = supernet;

    while current.length() < subnet.length() {
        let new_len = current.length() + 1;
        let lower = Prefix::new(current.network(), new_len)?;
        let bit = 1u128 << (A::MAX_LENGTH - new_len);
        let upper = Prefix::new(Address::new(current.network().value() | bit), new_len)?;

        if lower.contains(&subnet) {
            siblings.push(upper);
            current = lower;
        } else {
            siblings.push(lower);
            current = upper;
        }
    }

    siblings.sort_by_key(Prefix::first_addr);
    Ok(siblings)
}
