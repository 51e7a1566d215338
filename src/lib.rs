//! Núcleo de analítica y timeline del dashboard de viajes compartidos

pub mod config;
pub mod controllers;
pub mod dto;
pub mod models;
pub mod services;
pub mod utils;

pub use config::DashboardConfig;
pub use controllers::{DashboardController, TooltipController};
pub use dto::{DashboardRequest, DashboardSnapshot, FilterRequest};
pub use models::{DashboardView, TimeRange};
pub use services::{DashboardService, FilterSet};
pub use utils::errors::{AppError, AppResult};
