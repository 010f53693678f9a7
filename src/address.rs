//! IP addresses represented as unsigned integers, generic over address
//! family.

use std::fmt;
use std::marker::PhantomData;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::Error;
use crate::family::{Afi, Ipv4, Ipv6};

/// An address of family `A`, stored as the integer value of its bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address<A: Afi> {
    value: u128,
    _family: PhantomData<A>,
}

impl<A: Afi> fmt::Debug for Address<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address<{}>({})", A::NAME, self.value)
    }
}

impl<A: Afi> Address<A> {
    /// The all-zeros address.
    pub const ZERO: Self = Self {
        value: 0,
        _family: PhantomData,
    };

    /// Construct an address from its integer value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self {
            value,
            _family: PhantomData,
        }
    }

    /// The integer value of this address.
    #[must_use]
    pub const fn value(self) -> u128 {
        self.value
    }

    /// The all-ones value for this family (`2^MAX_LENGTH - 1`).
    #[must_use]
    pub fn max_value() -> u128 {
        if A::MAX_LENGTH == 128 {
            u128::MAX
        } else {
            (1u128 << A::MAX_LENGTH) - 1
        }
    }
}

impl Address<Ipv4> {
    /// Construct from a standard library [`Ipv4Addr`].
    #[must_use]
    pub fn from_std(addr: Ipv4Addr) -> Self {
        Self::new(u32::from(addr) as u128)
    }

    /// Convert to a standard library [`Ipv4Addr`].
    #[must_use]
    pub fn to_std(self) -> Ipv4Addr {
        Ipv4Addr::from(self.value as u32)
    }
}

impl Address<Ipv6> {
    /// Construct from a standard library [`Ipv6Addr`].
    #[must_use]
    pub fn from_std(addr: Ipv6Addr) -> Self {
        Self::new(u128::from(addr))
    }

    /// Convert to a standard library [`Ipv6Addr`].
    #[must_use]
    pub fn to_std(self) -> Ipv6Addr {
        Ipv6Addr::from(self.value)
    }
}

impl From<Ipv4Addr> for Address<Ipv4> {
    fn from(addr: Ipv4Addr) -> Self {
        Self::from_std(addr)
    }
}

impl From<Ipv6Addr> for Address<Ipv6> {
    fn from(addr: Ipv6Addr) -> Self {
        Self::from_std(addr)
    }
}

impl FromStr for Address<Ipv4> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Self::from_std)
            .map_err(|_| Error::parse("IPv4 address", s))
    }
}

impl FromStr for Address<Ipv6> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv6Addr>()
            .map(Self::from_std)
            .map_err(|_| Error::parse("IPv6 address", s))
    }
}

impl fmt::Display for Address<Ipv4> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_std())
    }
}

impl fmt::Display for Address<Ipv6> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_std())
    }
}
