//! Drover Core
//!
//! Core types for talking to the job-orchestration service.
//!
//! This crate contains:
//! - Domain types: entities reported by the service (job status reports)
//! - DTOs: request/response bodies exchanged with the service API

pub mod domain;
pub mod dto;
