//! Modelo de Profile
//!
//! Perfil de usuario tal como llega del backend. El dashboard solo lo lee.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rol del usuario
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Driver,
    #[default]
    User,
}

/// Nivel de membresía
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    Standard,
    Silver,
    Gold,
    Diamond,
    Family,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub membership: MembershipTier,
    #[serde(default)]
    pub is_discount_provider: bool,
}

impl Profile {
    /// Nombre visible, `None` si está vacío
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Admin o manager
    pub fn is_staff(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Manager)
    }
}
