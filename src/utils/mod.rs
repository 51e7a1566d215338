//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y validación de
//! datos ingeridos.

pub mod errors;
pub mod validation;
