//! Utilidades de validación
//!
//! Chequeos de calidad de datos sobre los registros del snapshot. El núcleo
//! no los exige: quien ingiere el snapshot registra las violaciones y conserva
//! el registro.

use chrono::Duration;
use serde::Serialize;
use validator::ValidationError;

use crate::models::booking::Booking;
use crate::models::trip::Trip;

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar asientos y horarios de un viaje
pub fn validate_trip(trip: &Trip) -> Result<(), ValidationError> {
    validate_non_negative(trip.seats)?;
    validate_range(trip.available_seats, 0, trip.seats)?;
    validate_non_negative(trip.price)?;

    if let Some(arrival) = trip.arrival_time {
        // Llegadas "antes" de la salida solo se toleran como viaje nocturno
        if arrival < trip.departure_time - Duration::hours(24) {
            let mut error = ValidationError::new("arrival_time");
            error.add_param("departure_time".into(), &trip.departure_time.to_rfc3339());
            error.add_param("arrival_time".into(), &arrival.to_rfc3339());
            return Err(error);
        }
    }

    Ok(())
}

/// Validar asientos y monto de una reserva
pub fn validate_booking(booking: &Booking) -> Result<(), ValidationError> {
    validate_positive(booking.seats_booked)?;
    validate_non_negative(booking.total_price)?;

    if let Some(trip) = &booking.trip {
        if trip.id != booking.trip_id {
            let mut error = ValidationError::new("trip_id");
            error.add_param("trip_id".into(), &booking.trip_id.to_string());
            error.add_param("embedded_trip_id".into(), &trip.id.to_string());
            return Err(error);
        }
    }

    Ok(())
}
