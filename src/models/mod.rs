//! Modelos del sistema
//!
//! Este módulo contiene las entidades que el dashboard consume (viajes,
//! reservas, perfiles, notificaciones) y los view models que produce.

pub mod analytics;
pub mod booking;
pub mod notification;
pub mod profile;
pub mod trip;
pub mod vehicle;

pub use analytics::*;
pub use booking::{Booking, BookingStatus};
pub use notification::{Notification, NotificationCategory, NotificationSeverity};
pub use profile::{MembershipTier, Profile, UserRole};
pub use trip::{Trip, TripStatus};
pub use vehicle::{VehicleClass, VehicleInfo, VehicleKey};
