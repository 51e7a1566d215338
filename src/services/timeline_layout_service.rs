//! Layout del timeline de viajes
//!
//! Coloca cada viaje como una barra horizontal sobre un eje de 24 horas, una
//! fila por día calendario entre la primera y la última salida.

use std::collections::HashMap;

use chrono::{FixedOffset, NaiveDate, Timelike};

use crate::config::DashboardConfig;
use crate::models::analytics::{TimelineBar, TimelineDay};
use crate::models::trip::Trip;
use crate::services::time_window_service::local_date;
use crate::utils::errors::AppResult;

const HOURS_PER_DAY: f64 = 24.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Servicio de layout del timeline
#[derive(Debug, Clone, Copy)]
pub struct TimelineLayoutService {
    offset: FixedOffset,
    default_trip_hours: f64,
    min_bar_hours: f64,
}

impl TimelineLayoutService {
    pub fn new(offset: FixedOffset, default_trip_hours: f64, min_bar_hours: f64) -> Self {
        Self {
            offset,
            default_trip_hours,
            min_bar_hours,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> AppResult<Self> {
        Ok(Self::new(
            config.utc_offset()?,
            config.default_trip_hours,
            config.min_bar_hours,
        ))
    }

    /// Una fila por día entre la salida más temprana y la más tardía.
    ///
    /// Cada viaje cae en el día de su salida, aunque llegue al día siguiente.
    pub fn layout(&self, trips: &[&Trip]) -> Vec<TimelineDay> {
        let Some(first) = trips.iter().map(|trip| self.departure_date(trip)).min() else {
            return Vec::new();
        };
        let last = trips
            .iter()
            .map(|trip| self.departure_date(trip))
            .max()
            .unwrap_or(first);

        let mut by_day: HashMap<NaiveDate, Vec<&Trip>> = HashMap::new();
        for &trip in trips {
            by_day.entry(self.departure_date(trip)).or_default().push(trip);
        }

        first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|date| {
                let mut day_trips = by_day.remove(&date).unwrap_or_default();
                day_trips.sort_by_key(|trip| trip.departure_time);

                TimelineDay {
                    date,
                    bars: day_trips.into_iter().map(|trip| self.position(trip)).collect(),
                }
            })
            .collect()
    }

    /// Posición y ancho de la barra en porcentaje del día
    pub fn position(&self, trip: &Trip) -> TimelineBar {
        let duration_hours = self.duration_hours(trip);
        let left_pct = self.departure_hour_fraction(trip) / HOURS_PER_DAY * 100.0;
        let width_pct = duration_hours / HOURS_PER_DAY * 100.0;
        let visible_width_pct = width_pct.min(100.0 - left_pct).max(0.0);

        TimelineBar {
            trip: trip.clone(),
            left_pct,
            width_pct,
            visible_width_pct,
            duration_hours,
            overflows_day: left_pct + width_pct > 100.0,
        }
    }

    /// Duración en horas: llegada - salida, +24 si es negativa, con piso mínimo
    pub fn duration_hours(&self, trip: &Trip) -> f64 {
        let hours = match trip.arrival_time {
            Some(arrival) => {
                let hours = (arrival - trip.departure_time).num_milliseconds() as f64 / MILLIS_PER_HOUR;
                if hours < 0.0 {
                    hours + HOURS_PER_DAY
                } else {
                    hours
                }
            }
            None => self.default_trip_hours,
        };

        hours.max(self.min_bar_hours)
    }

    fn departure_hour_fraction(&self, trip: &Trip) -> f64 {
        let local = trip.departure_time.with_timezone(&self.offset);
        f64::from(local.hour())
            + f64::from(local.minute()) / 60.0
            + f64::from(local.second()) / 3600.0
    }

    fn departure_date(&self, trip: &Trip) -> NaiveDate {
        local_date(trip.departure_time, self.offset)
    }
}
