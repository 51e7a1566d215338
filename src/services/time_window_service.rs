//! Resolución de ventanas de tiempo
//!
//! Convierte el rango seleccionado en el dashboard (últimos 7 días, últimos
//! 30 días, mes actual, todo) en instantes concretos anclados a un `now`
//! inyectado. Los días calendario se calculan en un offset fijo.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::config::DashboardConfig;
use crate::models::analytics::{TimeRange, TimeWindow};
use crate::models::booking::Booking;
use crate::models::trip::Trip;
use crate::utils::errors::AppResult;

/// Resolver de ventanas de tiempo
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowService {
    offset: FixedOffset,
}

impl TimeWindowService {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_config(config: &DashboardConfig) -> AppResult<Self> {
        Ok(Self::new(config.utc_offset()?))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Resuelve `range` contra `now`.
    ///
    /// Las ventanas móviles empiezan al inicio del día N-1 días atrás y
    /// terminan al final de hoy para viajes, pero en `now` para reservas.
    pub fn resolve(&self, range: TimeRange, now: DateTime<Utc>) -> TimeWindow {
        let today = local_date(now, self.offset);

        let (start, end) = match range {
            TimeRange::Last7Days | TimeRange::Last30Days => {
                let span = if range == TimeRange::Last7Days { 7 } else { 30 };
                let first_day = today - Duration::days(span - 1);
                (start_of_day(first_day, self.offset), end_of_day(today, self.offset))
            }
            TimeRange::ThisMonth => {
                let first_day = today - Duration::days(i64::from(today.day0()));
                // Solo falla en diciembre del último año representable
                let last_day = first_day
                    .checked_add_months(Months::new(1))
                    .and_then(|next_month| next_month.pred_opt())
                    .unwrap_or_else(|| first_day + Duration::days(30));
                (start_of_day(first_day, self.offset), end_of_day(last_day, self.offset))
            }
            TimeRange::All => (DateTime::<Utc>::from(std::time::UNIX_EPOCH), far_future()),
        };

        let booking_end = if range.is_rolling() { now.min(end) } else { end };

        TimeWindow {
            range,
            start,
            end,
            booking_end,
            utc_offset_minutes: self.offset.local_minus_utc() / 60,
        }
    }
}

impl TimeWindow {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Cotas inclusivas para `departure_time` de viajes
    pub fn trip_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Cotas inclusivas para `created_at` de reservas
    pub fn booking_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.booking_end)
    }

    pub fn contains_departure(&self, trip: &Trip) -> bool {
        let (start, end) = self.trip_bounds();
        trip.departure_time >= start && trip.departure_time <= end
    }

    pub fn contains_creation(&self, booking: &Booking) -> bool {
        let (start, end) = self.booking_bounds();
        booking.created_at >= start && booking.created_at <= end
    }

    /// Días a rellenar con cero en la serie de ingresos; `None` para `ALL`
    pub fn days(&self) -> Option<Vec<NaiveDate>> {
        if self.range == TimeRange::All {
            return None;
        }

        let offset = self.offset();
        let first = local_date(self.start, offset);
        let last = local_date(self.end, offset);

        Some(first.iter_days().take_while(|day| *day <= last).collect())
    }
}

/// Centinela 9999-12-31T23:59:59.999Z para la ventana `ALL`
pub fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .map(|instant| instant + Duration::milliseconds(999))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub(crate) fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

pub(crate) fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))))
}

fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    start_of_day(date + Duration::days(1), offset) - Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn service() -> TimeWindowService {
        TimeWindowService::new(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_this_month_bounds_for_every_month_length() {
        let cases = [
            ("2024-02-10T08:00:00Z", "2024-02-01T00:00:00Z", "2024-02-29T23:59:59.999Z"),
            ("2023-02-10T08:00:00Z", "2023-02-01T00:00:00Z", "2023-02-28T23:59:59.999Z"),
            ("2024-04-30T23:00:00Z", "2024-04-01T00:00:00Z", "2024-04-30T23:59:59.999Z"),
            ("2024-12-01T00:00:00Z", "2024-12-01T00:00:00Z", "2024-12-31T23:59:59.999Z"),
        ];

        for (now, start, end) in cases {
            let window = service().resolve(TimeRange::ThisMonth, utc(now));
            assert_eq!(window.start, utc(start), "start for {}", now);
            assert_eq!(window.end, utc(end), "end for {}", now);
            assert_eq!(window.booking_end, window.end);
        }
    }

    #[test]
    fn test_last_7_days_booking_clamp() {
        let window = service().resolve(TimeRange::Last7Days, utc("2024-03-15T10:00:00Z"));

        assert_eq!(window.start, utc("2024-03-09T00:00:00Z"));
        assert_eq!(window.end, utc("2024-03-15T23:59:59.999Z"));
        assert_eq!(window.booking_end, utc("2024-03-15T10:00:00Z"));
    }

    #[test]
    fn test_last_30_days_starts_29_days_back() {
        let window = service().resolve(TimeRange::Last30Days, utc("2024-03-15T10:00:00Z"));
        assert_eq!(window.start, utc("2024-02-15T00:00:00Z"));
        assert_eq!(window.days().unwrap().len(), 30);
    }

    #[test]
    fn test_all_window_is_unbounded() {
        let window = service().resolve(TimeRange::All, utc("2024-03-15T10:00:00Z"));
        assert_eq!(window.start, utc("1970-01-01T00:00:00Z"));
        assert_eq!(window.end, utc("9999-12-31T23:59:59.999Z"));
        assert_eq!(window.booking_end, window.end);
        assert!(window.days().is_none());
    }

    #[test]
    fn test_days_match_window_length() {
        let now = utc("2024-02-10T08:00:00Z");
        assert_eq!(service().resolve(TimeRange::Last7Days, now).days().unwrap().len(), 7);
        assert_eq!(service().resolve(TimeRange::ThisMonth, now).days().unwrap().len(), 29);
    }

    #[test]
    fn test_windows_follow_configured_offset() {
        // 2024-03-14T20:00Z ya es 15/03 en UTC+07:00
        let service = TimeWindowService::new(FixedOffset::east_opt(7 * 3600).unwrap());
        let window = service.resolve(TimeRange::Last7Days, utc("2024-03-14T20:00:00Z"));

        assert_eq!(window.start, utc("2024-03-08T17:00:00Z"));
        assert_eq!(window.end, utc("2024-03-15T16:59:59.999Z"));
        assert_eq!(window.offset().local_minus_utc(), 7 * 3600);

        let days = window.days().unwrap();
        assert_eq!(days.first().unwrap().to_string(), "2024-03-09");
        assert_eq!(days.last().unwrap().to_string(), "2024-03-15");
        assert_eq!(window.end.with_timezone(&service.offset()).hour(), 23);
    }

    #[test]
    fn test_this_month_handles_century_leap_rules() {
        let window = service().resolve(TimeRange::ThisMonth, utc("1900-02-10T08:00:00Z"));
        assert_eq!(window.end, utc("1900-02-28T23:59:59.999Z"));

        let window = service().resolve(TimeRange::ThisMonth, utc("2000-02-10T08:00:00Z"));
        assert_eq!(window.end, utc("2000-02-29T23:59:59.999Z"));
        assert_eq!(window.days().unwrap().len(), 29);
    }
}
