//! Servicio del dashboard
//!
//! Orquesta el pipeline completo: ventana de tiempo, filtros, agregaciones y
//! timeline. Es una función pura de (snapshot, filtros, rango, now).

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::DashboardConfig;
use crate::dto::snapshot_dto::DashboardSnapshot;
use crate::models::analytics::{DashboardView, TimeRange};
use crate::models::booking::Booking;
use crate::models::trip::Trip;
use crate::services::aggregation_service::AggregationService;
use crate::services::notification_service::NotificationService;
use crate::services::record_filter_service::{FilterSet, FilterSubject, RecordFilterService};
use crate::services::time_window_service::TimeWindowService;
use crate::services::timeline_layout_service::TimelineLayoutService;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone)]
pub struct DashboardService {
    config: DashboardConfig,
    windows: TimeWindowService,
    timeline: TimelineLayoutService,
}

impl DashboardService {
    pub fn new(config: DashboardConfig) -> AppResult<Self> {
        Ok(Self {
            windows: TimeWindowService::from_config(&config)?,
            timeline: TimelineLayoutService::from_config(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Calcula el view model completo para el estado actual de la UI
    pub fn build(
        &self,
        snapshot: &DashboardSnapshot,
        filters: &FilterSet,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> DashboardView {
        let window = self.windows.resolve(range, now);

        let bookings: Vec<&Booking> = snapshot
            .bookings
            .iter()
            .filter(|booking| window.contains_creation(booking))
            .filter(|booking| RecordFilterService::matches(FilterSubject::booking(*booking), filters))
            .collect();

        let trips: Vec<&Trip> = snapshot
            .trips
            .iter()
            .filter(|trip| window.contains_departure(trip))
            .filter(|trip| RecordFilterService::matches(FilterSubject::Trip(*trip), filters))
            .collect();

        let scheduled: Vec<&Trip> = trips
            .iter()
            .copied()
            .filter(|trip| !trip.is_cancelled())
            .collect();

        let view = DashboardView {
            window,
            summary: AggregationService::summary(&bookings, &trips),
            revenue_by_date: AggregationService::revenue_by_date(&bookings, &window),
            revenue_by_driver: AggregationService::revenue_by_driver(&bookings, self.config.top_drivers),
            revenue_by_vehicle_class: AggregationService::revenue_by_vehicle_class(&bookings),
            timeline: self.timeline.layout(&scheduled),
            facet_options: AggregationService::facet_options(&snapshot.trips, &snapshot.bookings),
            notifications: NotificationService::summarize(&snapshot.notifications),
        };

        debug!(
            "📊 Dashboard {:?}: {} reservas, {} viajes, {} días en timeline",
            range,
            bookings.len(),
            trips.len(),
            view.timeline.len()
        );

        view
    }
}
