//! Address-range summarization: `A-B` → the minimal set of prefixes whose
//! union is exactly `[A, B]`.

use crate::address::Address;
use crate::error::Error;
use crate::family::Afi;
use crate::prefix::Prefix;

/// Summarize the inclusive range `[start, end]` into the minimal covering
/// set of prefixes, in ascending address order.
///
/// Greedy: at each step, emit the largest prefix whose network address is
/// the current position and that does not run past `end`, then advance past
/// it. Mirrors `ipaddress.summarize_address_range` in the original tool.
pub fn summarize_range<A: Afi>(start: Address<A>, end: Address<A>) -> Result<Vec<Prefix<A>>, Error> {
    if start.value() > end.value() {
        return Err(Error::InvalidRange {
            start: start.value().to_string(),
            end: end.value().to_string(),
            reason: "range start is greater than range end",
        });
    }
    let last = end.value();
    let mut cur = start.value();
    let mut out = Vec::new();

    loop {
        if cur == 0 && last == Address::<A>::max_value() {
            out.push(Prefix::default_route());
            break;
        }

        let max_zeros = if cur == 0 {
            A::MAX_LENGTH - 1
        } else {
            cur.trailing_zeros().min(u32::from(A::MAX_LENGTH) - 1) as u8
        };

        let mut nbits = max_zeros;
        let block = loop {
            let size = 1u128 << nbits;
            let fits = cur.checked_add(size - 1).is_some_and(|hi| hi <= last);
            if fits {
                break size;
            }
            if nbits == 0 {
                break 1;
            }
            nbits -= 1;
        };

        let length = A::MAX_LENGTH - nbits;
        out.push(Prefix::new(Address::new(cur), length)?);

        match cur.checked_add(block) {
            Some(next) if next <= last => cur = next,
            _ => break,
        }
    }

    Ok(out)
}
