//! Data Transfer Objects for request/response serialization.
//!
//! Aggregated views ([`crate::domain::ScoreTable`],
//! [`crate::domain::StudentEvents`]) and raw events serialize directly;
//! only request shapes and admin-specific responses live here.

pub mod admin_dto;
pub mod student_dto;

pub use admin_dto::*;
pub use student_dto::*;
