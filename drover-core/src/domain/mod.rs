//! Core domain types
//!
//! This module contains the domain structures the orchestration service
//! reports back to clients. They are decoded from JSON response bodies
//! and shared by everything that inspects job progress.

pub mod job;
