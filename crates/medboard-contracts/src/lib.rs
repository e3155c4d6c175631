//! # medboard-contracts
//!
//! Shared types, row vocabulary, and errors for the MEDBOARD dashboard core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, decoding at the row boundary, and
//! error types.

pub mod calendar;
pub mod chart;
pub mod doctor;
pub mod error;
pub mod notification;
pub mod patient;
pub mod row;
pub mod session;
