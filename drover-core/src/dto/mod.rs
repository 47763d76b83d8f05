//! Data Transfer Objects for the orchestration service API
//!
//! Request and response bodies exchanged with the service over HTTP.
//! These are lightweight typed schemas; decoding failures surface as
//! errors in the client rather than runtime key lookups.

pub mod job;
