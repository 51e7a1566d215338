//! Modelo de Vehicle
//!
//! Los viajes traen el vehículo como texto libre `"<tipo> (<matrícula>)"`.
//! Aquí se parsea una sola vez al ingerir el snapshot, y el resto del núcleo
//! trabaja con campos estructurados.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Separador de la clave de vehículo `"<matrícula> ✧ <conductor>"`
pub const VEHICLE_KEY_SEPARATOR: char = '✧';

lazy_static! {
    // Primer grupo entre paréntesis
    static ref PLATE_REGEX: Regex = Regex::new(r"\(([^)]*)\)").expect("plate regex must compile");
}

/// Información del vehículo parseada desde `vehicle_info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct VehicleInfo {
    /// Texto original, se conserva para búsqueda y re-serialización
    pub raw: String,
    /// Tipo de vehículo (texto antes del primer paréntesis)
    pub kind: String,
    /// Matrícula (texto dentro del primer paréntesis)
    pub plate: Option<String>,
}

impl VehicleInfo {
    pub fn parse(raw: &str) -> Self {
        let kind = raw.split('(').next().unwrap_or_default().trim().to_string();

        let plate = PLATE_REGEX
            .captures(raw)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|plate| !plate.is_empty());

        Self {
            raw: raw.to_string(),
            kind,
            plate,
        }
    }

    pub fn class(&self) -> VehicleClass {
        VehicleClass::classify(&self.kind)
    }
}

impl From<String> for VehicleInfo {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// `null` en el backend equivale a vehículo sin datos
impl From<Option<String>> for VehicleInfo {
    fn from(raw: Option<String>) -> Self {
        raw.map(Self::from).unwrap_or_default()
    }
}

impl From<VehicleInfo> for String {
    fn from(info: VehicleInfo) -> Self {
        info.raw
    }
}

impl fmt::Display for VehicleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Clave compuesta matrícula + conductor, usada por el filtro de vehículos
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleKey {
    pub plate: String,
    pub driver: String,
}

impl VehicleKey {
    /// Deriva la clave; `None` si falta la matrícula o el nombre del conductor
    pub fn derive(vehicle: &VehicleInfo, driver: &str) -> Option<Self> {
        let plate = vehicle.plate.as_deref()?.trim();
        let driver = driver.trim();

        if plate.is_empty() || driver.is_empty() {
            return None;
        }

        Some(Self {
            plate: plate.to_string(),
            driver: driver.to_string(),
        })
    }
}

impl fmt::Display for VehicleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.plate, VEHICLE_KEY_SEPARATOR, self.driver)
    }
}

impl FromStr for VehicleKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (plate, driver) = value
            .split_once(VEHICLE_KEY_SEPARATOR)
            .ok_or_else(|| AppError::Parse(format!("vehicle key '{}' has no separator", value)))?;

        let (plate, driver) = (plate.trim(), driver.trim());
        if plate.is_empty() || driver.is_empty() {
            return Err(AppError::Parse(format!(
                "vehicle key '{}' needs both plate and driver",
                value
            )));
        }

        Ok(Self {
            plate: plate.to_string(),
            driver: driver.to_string(),
        })
    }
}

impl TryFrom<String> for VehicleKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VehicleKey> for String {
    fn from(key: VehicleKey) -> Self {
        key.to_string()
    }
}

/// Clase canónica de vehículo para el reparto de ingresos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    Sedan4,
    Suv7,
    Limousine,
    Other,
}

impl VehicleClass {
    /// Clasifica por coincidencia de subcadena sobre el tipo de vehículo
    pub fn classify(kind: &str) -> Self {
        let kind = kind.to_lowercase();

        if kind.contains("limousine") {
            VehicleClass::Limousine
        } else if ["suv", "7 chỗ", "7 cho", "7-seat"].iter().any(|t| kind.contains(t)) {
            VehicleClass::Suv7
        } else if ["sedan", "4 chỗ", "4 cho", "4-seat"].iter().any(|t| kind.contains(t)) {
            VehicleClass::Sedan4
        } else {
            VehicleClass::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Sedan4 => "Sedan 4 chỗ",
            VehicleClass::Suv7 => "SUV 7 chỗ",
            VehicleClass::Limousine => "Limousine",
            VehicleClass::Other => "Khác",
        }
    }
}
