//! Services module
//!
//! Este módulo contiene la lógica del dashboard. Todos los servicios son
//! funciones puras sobre colecciones ya cargadas: no hacen I/O ni guardan
//! estado entre recálculos.

pub mod aggregation_service;
pub mod dashboard_service;
pub mod notification_service;
pub mod record_filter_service;
pub mod time_window_service;
pub mod timeline_layout_service;

pub use aggregation_service::AggregationService;
pub use dashboard_service::DashboardService;
pub use notification_service::NotificationService;
pub use record_filter_service::{Facet, FilterSet, FilterSubject, RecordFilterService};
pub use time_window_service::TimeWindowService;
pub use timeline_layout_service::TimelineLayoutService;
