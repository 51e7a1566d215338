//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del dashboard cargada desde
//! variables de entorno.

pub mod environment;

pub use environment::*;
