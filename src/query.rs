//! Dynamic dispatch across address families: queries and RIB prefixes do
//! not know their family until parsed, so this module provides the small
//! enum wrapper the rest of the crate routes through.

use crate::address::Address;
use crate::error::Error;
use crate::family::{Family, Ipv4, Ipv6};
use crate::prefix::range::summarize_range;
use crate::prefix::Prefix;

/// A prefix of either address family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnyPrefix {
    /// An IPv4 prefix.
    V4(Prefix<Ipv4>),
    /// An IPv6 prefix.
    V6(Prefix<Ipv6>),
}

impl AnyPrefix {
    /// Which family this prefix belongs to.
    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::V4(_) => Family::V4,
            Self::V6(_) => Family::V6,
        }
    }
}

impl std::fmt::Display for AnyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V4(p) => write!(f, "{p}"),
            Self::V6(p) => write!(f, "{p}"),
        }
    }
}

/// Parse `text` as a prefix or bare host of either family, trying IPv4 first.
pub fn parse_any_prefix(text: &str) -> Result<AnyPrefix, Error> {
    let text = text.trim();
    if let Ok(p) = text.parse::<Prefix<Ipv4>>() {
        return Ok(AnyPrefix::V4(p));
    }
    if let Ok(p) = text.parse::<Prefix<Ipv6>>() {
        return Ok(AnyPrefix::V6(p));
    }
    Err(Error::parse("prefix", text))
}

/// Summarize a query expression — a bare host, a CIDR prefix, or an
/// inclusive `A-B` range — into the minimal covering set of same-family
/// prefixes.
pub fn summarize_expression(text: &str) -> Result<Vec<AnyPrefix>, Error> {
    let text = text.trim();

    if let Some((start, end)) = text.split_once('-') {
        let (start, end) = (start.trim(), end.trim());
        if let (Ok(s), Ok(e)) = (start.parse::<Address<Ipv4>>(), end.parse::<Address<Ipv4>>()) {
            return Ok(summarize_range(s, e)?
                .into_iter()
                .map(AnyPrefix::V4)
                .collect());
        }
        if let (Ok(s), Ok(e)) = (start.parse::<Address<Ipv6>>(), end.parse::<Address<Ipv6>>()) {
            return Ok(summarize_range(s, e)?
                .into_iter()
                .map(AnyPrefix::V6)
                .collect());
        }
        return Err(Error::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
            reason: "range endpoints are not valid same-family addresses",
        });
    }

    Ok(vec![parse_any_prefix(text)?])
}
