//! Modelos de Analytics
//!
//! Este módulo contiene los view models derivados que el dashboard expone a
//! la capa de render: series de ingresos, rankings y filas del timeline.
//! Se recalculan completos en cada cambio de entradas.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::notification::{Notification, NotificationCategory};
use crate::models::trip::{Trip, TripStatus};
use crate::models::vehicle::{VehicleClass, VehicleKey};

/// Rango de tiempo seleccionado en el dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeRange {
    #[serde(rename = "LAST_7D")]
    Last7Days,
    #[serde(rename = "LAST_30D")]
    Last30Days,
    #[default]
    #[serde(rename = "THIS_MONTH")]
    ThisMonth,
    #[serde(rename = "ALL")]
    All,
}

impl TimeRange {
    /// Ventanas móviles: la cota superior de reservas se recorta a `now`
    pub fn is_rolling(&self) -> bool {
        matches!(self, TimeRange::Last7Days | TimeRange::Last30Days)
    }
}

/// Ventana concreta resuelta contra un `now`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    pub range: TimeRange,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Cota superior para `created_at` de reservas
    pub booking_end: DateTime<Utc>,
    /// Offset usado para los cálculos de día calendario
    pub utc_offset_minutes: i32,
}

/// Punto de la serie de ingresos por día
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub bookings: usize,
}

/// Fila del ranking de conductores
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverRevenue {
    pub driver_name: String,
    pub revenue: Decimal,
    pub trips: usize,
}

/// Fila del reparto por clase de vehículo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleClassRevenue {
    pub class: VehicleClass,
    pub label: String,
    pub revenue: Decimal,
    pub bookings: usize,
    /// Porcentaje sobre el total de ingresos del periodo
    pub share_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCount {
    pub status: TripStatus,
    pub count: usize,
}

/// Resumen de KPIs del periodo filtrado
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_revenue: Decimal,
    pub booking_count: usize,
    pub seats_booked: i64,
    pub trip_count: usize,
    pub trips_by_status: Vec<StatusCount>,
}

/// Valores disponibles para los selectores de filtros
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FacetOptions {
    pub drivers: Vec<String>,
    pub vehicles: Vec<VehicleKey>,
    pub statuses: Vec<TripStatus>,
}

/// Barra posicionada de un viaje en el eje de 24 horas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineBar {
    pub trip: Trip,
    pub left_pct: f64,
    pub width_pct: f64,
    /// Ancho recortado al final del día
    pub visible_width_pct: f64,
    pub duration_hours: f64,
    pub overflows_day: bool,
}

/// Fila de un día del timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineDay {
    pub date: NaiveDate,
    pub bars: Vec<TimelineBar>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: NotificationCategory,
    pub unread: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationSummary {
    pub unread: usize,
    pub unread_by_category: Vec<CategoryCount>,
    /// Más recientes primero
    pub items: Vec<Notification>,
}

/// View model completo del dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub window: TimeWindow,
    pub summary: DashboardSummary,
    pub revenue_by_date: Vec<RevenuePoint>,
    pub revenue_by_driver: Vec<DriverRevenue>,
    pub revenue_by_vehicle_class: Vec<VehicleClassRevenue>,
    pub timeline: Vec<TimelineDay>,
    pub facet_options: FacetOptions,
    pub notifications: NotificationSummary,
}

impl DashboardView {
    /// Busca un viaje presente en el timeline actual
    pub fn find_trip(&self, trip_id: uuid::Uuid) -> Option<&Trip> {
        self.timeline
            .iter()
            .flat_map(|day| day.bars.iter())
            .map(|bar| &bar.trip)
            .find(|trip| trip.id == trip_id)
    }

    pub fn is_empty(&self) -> bool {
        self.summary.booking_count == 0 && self.timeline.is_empty()
    }
}
