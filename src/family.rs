//! Address-family marker types.
//!
//! `Ipv4`/`Ipv6` are zero-sized types implementing a shared `Afi` trait;
//! every address of either family is carried as a `u128`, and `Afi` only
//! needs to say how wide the address space is.

use core::fmt::Debug;
use core::hash::Hash;

/// An IP address family: [`Ipv4`] or [`Ipv6`].
pub trait Afi: Copy + Clone + Debug + Eq + Ord + Hash + 'static {
    /// Number of bits in an address of this family (32 or 128).
    const MAX_LENGTH: u8;
    /// Human-readable family name, used in error messages.
    const NAME: &'static str;
    /// The enum discriminant for this family, for use where a family needs
    /// to be carried at runtime rather than as a type parameter.
    const FAMILY: Family;
}

/// IPv4 address family marker type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4;

impl Afi for Ipv4 {
    const MAX_LENGTH: u8 = 32;
    const NAME: &'static str = "IPv4";
    const FAMILY: Family = Family::V4;
}

/// IPv6 address family marker type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv6;

impl Afi for Ipv6 {
    const MAX_LENGTH: u8 = 128;
    const NAME: &'static str = "IPv6";
    const FAMILY: Family = Family::V6;
}

/// Runtime discriminant for an address family, used where dynamic dispatch
/// across families is unavoidable (RIB rows, policy queries).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}
