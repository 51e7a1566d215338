//! DTOs de entrada del dashboard

pub mod snapshot_dto;

pub use snapshot_dto::*;
