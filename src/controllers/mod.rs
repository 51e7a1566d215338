//! Controllers con estado de la UI del dashboard

pub mod dashboard_controller;
pub mod tooltip_controller;

pub use dashboard_controller::{DashboardController, TripDetailsHandler};
pub use tooltip_controller::{
    place_tooltip, TooltipAnchor, TooltipController, TooltipPlacement, TooltipState, Viewport,
};
