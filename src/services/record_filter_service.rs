//! Filtro de registros del dashboard
//!
//! Decide si un viaje o una reserva entra en las vistas según la búsqueda
//! libre y los filtros por conductor, vehículo y estado. Todos los
//! predicados se combinan con AND.

use std::collections::HashSet;
use std::hash::Hash;

use crate::models::booking::Booking;
use crate::models::trip::{Trip, TripStatus};
use crate::models::vehicle::VehicleKey;

/// Filtro por faceta: todo, o un subconjunto cerrado de valores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet<T: Eq + Hash> {
    All,
    Only(HashSet<T>),
}

impl<T: Eq + Hash> Default for Facet<T> {
    fn default() -> Self {
        Facet::All
    }
}

impl<T: Eq + Hash> Facet<T> {
    pub fn only<I: IntoIterator<Item = T>>(values: I) -> Self {
        Facet::Only(values.into_iter().collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }

    /// `All` acepta todo; `Only` exige un valor presente en el conjunto
    pub fn accepts(&self, value: Option<&T>) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(values) => value.map_or(false, |v| values.contains(v)),
        }
    }
}

/// Conjunto de filtros activos en el dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Búsqueda libre, vacía = sin restricción
    pub search: String,
    pub drivers: Facet<String>,
    pub vehicles: Facet<VehicleKey>,
    pub statuses: Facet<TripStatus>,
}

/// Registro a filtrar, con su viaje gobernante explícito
#[derive(Debug, Clone, Copy)]
pub enum FilterSubject<'a> {
    Trip(&'a Trip),
    Booking {
        booking: &'a Booking,
        trip: Option<&'a Trip>,
    },
}

impl<'a> FilterSubject<'a> {
    pub fn booking(booking: &'a Booking) -> Self {
        FilterSubject::Booking {
            booking,
            trip: booking.governing_trip(),
        }
    }

    /// Viaje que aporta conductor, vehículo y estado
    pub fn governing_trip(&self) -> Option<&'a Trip> {
        match *self {
            FilterSubject::Trip(trip) => Some(trip),
            FilterSubject::Booking { trip, .. } => trip,
        }
    }
}

/// Servicio de filtrado de registros
pub struct RecordFilterService;

impl RecordFilterService {
    /// Evalúa todos los predicados sobre el registro.
    ///
    /// Una reserva sin viaje embebido o con estado no elegible para ingresos
    /// nunca coincide.
    pub fn matches(subject: FilterSubject<'_>, filters: &FilterSet) -> bool {
        if let FilterSubject::Booking { booking, .. } = subject {
            if !booking.status.is_revenue_eligible() {
                return false;
            }
        }

        let Some(trip) = subject.governing_trip() else {
            return false;
        };

        let driver_name = trip.driver_display_name();

        Self::matches_search(trip, driver_name, &filters.search)
            && Self::matches_driver(driver_name, &filters.drivers)
            && filters.vehicles.accepts(trip.vehicle_key().as_ref())
            && filters.statuses.accepts(Some(&trip.status))
    }

    /// Búsqueda sin distinguir mayúsculas en conductor e info de vehículo
    pub fn matches_search(trip: &Trip, driver_name: &str, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        driver_name.to_lowercase().contains(&needle)
            || trip.vehicle_info.raw.to_lowercase().contains(&needle)
    }

    fn matches_driver(driver_name: &str, drivers: &Facet<String>) -> bool {
        match drivers {
            Facet::All => true,
            Facet::Only(names) => names.contains(driver_name),
        }
    }
}
