//! Routing-service adapters for the scenic route engine.
//!
//! The [`routing`] module turns HTTP responses from an OSRM-compatible Route
//! service into candidate routes the scorer understands.

#![forbid(unsafe_code)]

pub mod routing;
