//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Requests are
//! mapped onto domain commands, results back onto the DTOs in `shared`.

pub mod rest;
