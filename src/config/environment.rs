//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del dashboard: zona horaria de los
//! días calendario, tamaño del ranking, geometría del timeline y del tooltip.

use std::env;
use std::str::FromStr;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::utils::errors::{config_error, AppError, AppResult};

/// Configuración del tooltip del timeline
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct TooltipConfig {
    /// Periodo de gracia antes de ocultar
    #[validate(range(min = 0, max = 10000))]
    pub hide_delay_ms: u64,

    /// Distancia entre el puntero y el tooltip
    #[validate(range(min = 0.0, max = 200.0))]
    pub offset_px: f64,

    #[validate(range(min = 1.0, max = 4000.0))]
    pub width_px: f64,

    #[validate(range(min = 1.0, max = 4000.0))]
    pub height_px: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 300,
            offset_px: 15.0,
            width_px: 320.0,
            height_px: 240.0,
        }
    }
}

/// Configuración del dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DashboardConfig {
    /// Offset de los días calendario (UTC+07:00 por defecto)
    #[validate(range(min = -720, max = 840))]
    pub utc_offset_minutes: i32,

    #[validate(range(min = 1, max = 50))]
    pub top_drivers: usize,

    /// Duración asumida cuando un viaje no tiene hora de llegada
    #[validate(range(min = 0.0, max = 24.0))]
    pub default_trip_hours: f64,

    /// Ancho mínimo visible de una barra, en horas
    #[validate(range(min = 0.0, max = 24.0))]
    pub min_bar_hours: f64,

    #[validate]
    pub tooltip: TooltipConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 7 * 60,
            top_drivers: 5,
            default_trip_hours: 3.0,
            min_bar_hours: 0.2,
            tooltip: TooltipConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Carga la configuración desde variables de entorno.
    ///
    /// Las variables ausentes toman el valor por defecto; las presentes deben
    /// parsear y quedar dentro de rango.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let config = Self {
            utc_offset_minutes: env_or("DASHBOARD_UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?,
            top_drivers: env_or("DASHBOARD_TOP_DRIVERS", defaults.top_drivers)?,
            default_trip_hours: env_or("DASHBOARD_DEFAULT_TRIP_HOURS", defaults.default_trip_hours)?,
            min_bar_hours: env_or("DASHBOARD_MIN_BAR_HOURS", defaults.min_bar_hours)?,
            tooltip: TooltipConfig {
                hide_delay_ms: env_or("TOOLTIP_HIDE_DELAY_MS", defaults.tooltip.hide_delay_ms)?,
                offset_px: env_or("TOOLTIP_OFFSET_PX", defaults.tooltip.offset_px)?,
                width_px: env_or("TOOLTIP_WIDTH_PX", defaults.tooltip.width_px)?,
                height_px: env_or("TOOLTIP_HEIGHT_PX", defaults.tooltip.height_px)?,
            },
        };

        config.validate()?;
        debug!("⚙️ Configuración del dashboard cargada: {:?}", config);
        Ok(config)
    }

    /// Offset fijo para los cálculos de día calendario
    pub fn utc_offset(&self) -> AppResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AppError::Config(format!(
                "utc offset of {} minutes is out of range",
                self.utc_offset_minutes
            ))
        })
    }
}

fn env_or<T: FromStr>(variable: &str, default: T) -> AppResult<T> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| config_error(variable, &value)),
        Err(_) => Ok(default),
    }
}
