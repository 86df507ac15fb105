//! Inbound adapters translating external requests into domain service calls.
//!
//! Framework details stay at this edge; handlers depend only on driving ports.

pub mod http;
