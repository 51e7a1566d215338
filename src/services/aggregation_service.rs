//! Agregaciones de ingresos
//!
//! Reducciones independientes sobre las reservas ya filtradas: ingresos por
//! día, ranking de conductores y reparto por clase de vehículo. Los montos se
//! suman en `Decimal`.

use std::collections::{BTreeSet, HashMap};

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::analytics::{
    DashboardSummary, DriverRevenue, FacetOptions, RevenuePoint, StatusCount, TimeWindow,
    VehicleClassRevenue,
};
use crate::models::booking::Booking;
use crate::models::trip::{Trip, TripStatus};
use crate::services::time_window_service::local_date;

/// Etiqueta para reservas cuyo viaje no tiene conductor identificable
pub const UNKNOWN_DRIVER_LABEL: &str = "Tài xế không xác định";

/// Servicio de agregación del dashboard
pub struct AggregationService;

impl AggregationService {
    /// Ingresos por día calendario.
    ///
    /// Con ventana acotada la serie se rellena con ceros y queda cronológica;
    /// con `ALL` solo aparecen los días con reservas, en orden de aparición.
    pub fn revenue_by_date(bookings: &[&Booking], window: &TimeWindow) -> Vec<RevenuePoint> {
        let offset = window.offset();
        let seeded = window.days();
        let fixed_days = seeded.is_some();

        let mut points: Vec<RevenuePoint> = seeded
            .unwrap_or_default()
            .into_iter()
            .map(|date| RevenuePoint {
                date,
                revenue: Decimal::ZERO,
                bookings: 0,
            })
            .collect();
        let mut index: HashMap<_, usize> = points
            .iter()
            .enumerate()
            .map(|(i, point)| (point.date, i))
            .collect();

        for booking in bookings {
            let date = local_date(booking.created_at, offset);

            let slot = match index.get(&date) {
                Some(slot) => *slot,
                // Fuera de la serie rellenada: no debería pasar tras filtrar por ventana
                None if fixed_days => continue,
                None => {
                    points.push(RevenuePoint {
                        date,
                        revenue: Decimal::ZERO,
                        bookings: 0,
                    });
                    index.insert(date, points.len() - 1);
                    points.len() - 1
                }
            };

            points[slot].revenue += booking.total_price;
            points[slot].bookings += 1;
        }

        points
    }

    /// Ranking de conductores por ingresos, top `top_n`, orden estable en empates
    pub fn revenue_by_driver(bookings: &[&Booking], top_n: usize) -> Vec<DriverRevenue> {
        let mut rows: Vec<DriverRevenue> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for booking in bookings {
            let Some(trip) = booking.governing_trip() else {
                continue;
            };

            let name = match trip.driver_display_name() {
                "" => UNKNOWN_DRIVER_LABEL,
                name => name,
            };

            let slot = *index.entry(name.to_string()).or_insert_with(|| {
                rows.push(DriverRevenue {
                    driver_name: name.to_string(),
                    revenue: Decimal::ZERO,
                    trips: 0,
                });
                rows.len() - 1
            });

            rows[slot].revenue += booking.total_price;
            rows[slot].trips += 1;
        }

        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        rows.truncate(top_n);
        rows
    }

    /// Reparto de ingresos por clase canónica de vehículo, orden descendente
    pub fn revenue_by_vehicle_class(bookings: &[&Booking]) -> Vec<VehicleClassRevenue> {
        let mut rows: Vec<VehicleClassRevenue> = Vec::new();

        for booking in bookings {
            let Some(trip) = booking.governing_trip() else {
                continue;
            };
            let class = trip.vehicle_info.class();

            match rows.iter_mut().find(|row| row.class == class) {
                Some(row) => {
                    row.revenue += booking.total_price;
                    row.bookings += 1;
                }
                None => rows.push(VehicleClassRevenue {
                    class,
                    label: class.label().to_string(),
                    revenue: booking.total_price,
                    bookings: 1,
                    share_pct: 0.0,
                }),
            }
        }

        let total: Decimal = rows.iter().map(|row| row.revenue).sum();
        if !total.is_zero() {
            for row in rows.iter_mut() {
                row.share_pct = (row.revenue * Decimal::ONE_HUNDRED / total)
                    .to_f64()
                    .unwrap_or(0.0);
            }
        }

        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        rows
    }

    /// KPIs del periodo filtrado
    pub fn summary(bookings: &[&Booking], trips: &[&Trip]) -> DashboardSummary {
        let trips_by_status = TripStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: trips.iter().filter(|trip| trip.status == status).count(),
            })
            .collect();

        DashboardSummary {
            total_revenue: bookings.iter().map(|booking| booking.total_price).sum(),
            booking_count: bookings.len(),
            seats_booked: bookings
                .iter()
                .map(|booking| i64::from(booking.seats_booked))
                .sum(),
            trip_count: trips.len(),
            trips_by_status,
        }
    }

    /// Valores distintos presentes en los datos para los selectores de filtros
    pub fn facet_options(trips: &[Trip], bookings: &[Booking]) -> FacetOptions {
        let all_trips = trips
            .iter()
            .chain(bookings.iter().filter_map(Booking::governing_trip));

        let mut drivers = BTreeSet::new();
        let mut vehicles = BTreeSet::new();

        for trip in all_trips {
            let name = trip.driver_display_name();
            if !name.is_empty() {
                drivers.insert(name.to_string());
            }
            if let Some(key) = trip.vehicle_key() {
                vehicles.insert(key);
            }
        }

        FacetOptions {
            drivers: drivers.into_iter().collect(),
            vehicles: vehicles.into_iter().collect(),
            statuses: TripStatus::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analytics::TimeRange;
    use crate::models::booking::BookingStatus;
    use crate::models::vehicle::VehicleClass;
    use crate::services::time_window_service::TimeWindowService;
    use chrono::{DateTime, FixedOffset, Utc};
    use serde_json::json;

    fn utc(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn trip(driver: &str, vehicle: &str) -> Trip {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "driver_name": driver,
            "departure_time": "2024-03-15T01:00:00Z",
            "price": "100",
            "seats": 4,
            "available_seats": 0,
            "vehicle_info": vehicle,
            "status": "COMPLETED"
        }))
        .unwrap()
    }

    fn booking(created_at: &str, price: i64, trip: Option<Trip>) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4(),
            trip_id: uuid::Uuid::new_v4(),
            passenger_id: None,
            passenger_phone: None,
            seats_booked: 2,
            total_price: Decimal::from(price),
            status: BookingStatus::Confirmed,
            created_at: utc(created_at),
            trip,
        }
    }

    fn window(range: TimeRange, now: &str) -> TimeWindow {
        TimeWindowService::new(FixedOffset::east_opt(0).unwrap()).resolve(range, utc(now))
    }

    #[test]
    fn test_revenue_by_date_zero_fills_rolling_window() {
        let trip = trip("A", "Sedan (1)");
        let bookings = vec![
            booking("2024-03-10T08:00:00Z", 100, Some(trip.clone())),
            booking("2024-03-10T09:00:00Z", 50, Some(trip.clone())),
            booking("2024-03-15T09:00:00Z", 30, Some(trip)),
        ];
        let refs: Vec<&Booking> = bookings.iter().collect();

        let series = AggregationService::revenue_by_date(&refs, &window(TimeRange::Last7Days, "2024-03-15T10:00:00Z"));

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date.to_string(), "2024-03-09");
        assert_eq!(series[0].revenue, Decimal::ZERO);
        assert_eq!(series[1].revenue, Decimal::from(150));
        assert_eq!(series[1].bookings, 2);
        assert_eq!(series[6].revenue, Decimal::from(30));
        assert!(series.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn test_revenue_by_date_empty_input_still_has_every_day() {
        let series = AggregationService::revenue_by_date(&[], &window(TimeRange::ThisMonth, "2024-02-10T00:00:00Z"));
        assert_eq!(series.len(), 29);
        assert!(series.iter().all(|point| point.revenue.is_zero()));

        let series = AggregationService::revenue_by_date(&[], &window(TimeRange::Last30Days, "2024-02-10T00:00:00Z"));
        assert_eq!(series.len(), 30);
    }

    #[test]
    fn test_revenue_by_date_all_uses_discovery_order() {
        let trip = trip("A", "Sedan (1)");
        let bookings = vec![
            booking("2024-03-12T08:00:00Z", 10, Some(trip.clone())),
            booking("2024-01-01T08:00:00Z", 20, Some(trip.clone())),
            booking("2024-03-12T20:00:00Z", 5, Some(trip)),
        ];
        let refs: Vec<&Booking> = bookings.iter().collect();

        let series = AggregationService::revenue_by_date(&refs, &window(TimeRange::All, "2024-03-15T10:00:00Z"));

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.to_string(), "2024-03-12");
        assert_eq!(series[0].revenue, Decimal::from(15));
        assert_eq!(series[1].date.to_string(), "2024-01-01");
    }

    #[test]
    fn test_revenue_by_driver_is_stable_and_truncated() {
        let revenues = [("D1", 100), ("D2", 100), ("D3", 50), ("D4", 50), ("D5", 10), ("D6", 5)];
        let bookings: Vec<Booking> = revenues
            .iter()
            .map(|(driver, price)| booking("2024-03-12T08:00:00Z", *price, Some(trip(driver, "Sedan (1)"))))
            .collect();
        let refs: Vec<&Booking> = bookings.iter().collect();

        let ranking = AggregationService::revenue_by_driver(&refs, 5);
        let names: Vec<&str> = ranking.iter().map(|row| row.driver_name.as_str()).collect();

        assert_eq!(names, vec!["D1", "D2", "D3", "D4", "D5"]);
    }

    #[test]
    fn test_revenue_by_driver_groups_and_labels_unknown() {
        let bookings = vec![
            booking("2024-03-12T08:00:00Z", 10, Some(trip("", "Sedan (1)"))),
            booking("2024-03-12T08:00:00Z", 30, Some(trip("B", "Sedan (1)"))),
            booking("2024-03-12T09:00:00Z", 15, Some(trip("", "SUV (2)"))),
        ];
        let refs: Vec<&Booking> = bookings.iter().collect();

        let ranking = AggregationService::revenue_by_driver(&refs, 5);

        assert_eq!(ranking[0].driver_name, "B");
        assert_eq!(ranking[1].driver_name, UNKNOWN_DRIVER_LABEL);
        assert_eq!(ranking[1].revenue, Decimal::from(25));
        assert_eq!(ranking[1].trips, 2);
    }

    #[test]
    fn test_revenue_by_vehicle_class() {
        let bookings = vec![
            booking("2024-03-12T08:00:00Z", 100, Some(trip("A", "Sedan 4 chỗ (51A-1)"))),
            booking("2024-03-12T08:00:00Z", 300, Some(trip("B", "Limousine (29B-2)"))),
            booking("2024-03-12T08:00:00Z", 50, Some(trip("C", "Xe buýt (30A-3)"))),
            booking("2024-03-12T08:00:00Z", 50, Some(trip("D", "sedan (30A-4)"))),
            booking("2024-03-12T08:00:00Z", 999, None),
        ];
        let refs: Vec<&Booking> = bookings.iter().collect();

        let rows = AggregationService::revenue_by_vehicle_class(&refs);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Limousine");
        assert_eq!(rows[0].share_pct, 60.0);
        assert_eq!(rows[1].class, VehicleClass::Sedan4);
        assert_eq!(rows[1].revenue, Decimal::from(150));
        assert_eq!(rows[1].bookings, 2);
        assert_eq!(rows[2].class, VehicleClass::Other);
    }

    #[test]
    fn test_summary_and_facet_options() {
        let trips = vec![trip("B", "Sedan (51A-1)"), trip("A", "SUV (30G-2)"), trip("A", "SUV 7 chỗ")];
        let bookings = vec![booking("2024-03-12T08:00:00Z", 40, Some(trips[0].clone()))];
        let booking_refs: Vec<&Booking> = bookings.iter().collect();
        let trip_refs: Vec<&Trip> = trips.iter().collect();

        let summary = AggregationService::summary(&booking_refs, &trip_refs);
        assert_eq!(summary.total_revenue, Decimal::from(40));
        assert_eq!(summary.seats_booked, 2);
        assert_eq!(summary.trip_count, 3);
        let completed = summary
            .trips_by_status
            .iter()
            .find(|row| row.status == TripStatus::Completed)
            .unwrap();
        assert_eq!(completed.count, 3);

        let options = AggregationService::facet_options(&trips, &bookings);
        assert_eq!(options.drivers, vec!["A".to_string(), "B".to_string()]);
        let keys: Vec<String> = options.vehicles.iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["30G-2 ✧ A", "51A-1 ✧ B"]);
        assert_eq!(options.statuses.len(), 6);
    }
}
