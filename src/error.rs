//! Error types shared by every stage of the FIB build and resolution pipeline.

use crate::family::Afi;

/// Errors produced while building or querying a [`Fib`](crate::fib::Fib).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A prefix, address, or range literal failed to parse.
    #[error("failed to parse {kind} {input:?}")]
    ParseError {
        /// What we were trying to parse (`"prefix"`, `"address"`, `"range"`).
        kind: &'static str,
        /// The offending input.
        input: String,
    },

    /// A RIB row had an empty zone field. Not fatal: the caller should log a
    /// warning and skip the row.
    #[error("RIB row for {prefix} has no zone, skipping")]
    EmptyZoneError {
        /// The prefix text of the offending row.
        prefix: String,
    },

    /// Input contained the reserved `NULL_ROUTE` sentinel literal.
    #[error("input contains the reserved token {token:?}")]
    ReservedTokenError {
        /// The literal reserved token that was found.
        token: &'static str,
    },

    /// An `A-B` range was malformed: reversed, or mixed address families.
    #[error("invalid range {start}-{end}: {reason}")]
    InvalidRange {
        /// The textual start of the range.
        start: String,
        /// The textual end of the range.
        end: String,
        /// Human-readable reason.
        reason: &'static str,
    },

    /// A prefix length fell outside `0..=A::MAX_LENGTH`.
    #[error("prefix length {length} out of bounds for {family} (max {max})")]
    PrefixLength {
        /// The offending length.
        length: u8,
        /// The address family name.
        family: &'static str,
        /// The family's maximum prefix length.
        max: u8,
    },
}

impl Error {
    pub(crate) fn prefix_length<A: Afi>(length: u8) -> Self {
        Self::PrefixLength {
            length,
            family: A::NAME,
            max: A::MAX_LENGTH,
        }
    }

    pub(crate) fn parse(kind: &'static str, input: impl Into<String>) -> Self {
        Self::ParseError {
            kind,
            input: input.into(),
        }
    }
}
