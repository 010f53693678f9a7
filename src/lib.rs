//! Linearized-FIB builder and zone resolver for firewall-policy interface
//! annotation.
//!
//! Given an overlapping routing table (a RIB) mapping IPv4/IPv6 prefixes to
//! zone labels, this crate flattens it into a disjoint, longest-prefix-
//! correct coverage of the address space (a [`fib::Fib`]), then answers
//! "which zones would forward a packet to this address, prefix, or range"
//! queries against it — singly via [`fib::Fib::resolve_expression`], or in
//! bulk via [`fib::Fib::resolve_batch`], which amortizes repeated
//! resolution using prefix containment.
//!
//! CSV parsing, CLI argument handling, and disk caching are not part of
//! this crate; see the `zonefib` binary.

pub mod address;
pub mod cache;
pub mod coalesce;
pub mod error;
pub mod family;
pub mod fib;
pub mod linearize;
pub mod prefix;
pub mod query;
pub mod resolve;
pub mod rib;
pub mod serialize;
pub mod zone;

pub use error::Error;
pub use fib::Fib;
pub use query::{parse_any_prefix, summarize_expression, AnyPrefix};
pub use zone::ZoneSet;
