//! Modelo de Account
//!
//! Una cuenta cubre los tres roles del sistema (rider, driver, admin).
//! Los campos de vehículo y ubicación solo tienen sentido para conductores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Rider,
    Driver,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Rider => "rider",
            AccountRole::Driver => "driver",
            AccountRole::Admin => "admin",
        }
    }
}

/// Account - mapea a la tabla accounts
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub rating: f64,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate_number: Option<String>,
    pub vehicle_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone_number: String,
        role: AccountRole,
        vehicle: Option<(String, String, String)>,
    ) -> Self {
        let now = Utc::now();
        let (vehicle_model, vehicle_plate_number, vehicle_color) = match vehicle {
            Some((model, plate, color)) => (Some(model), Some(plate), Some(color)),
            None => (None, None, None),
        };

        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            phone_number,
            role,
            is_active: true,
            rating: 0.0,
            current_latitude: None,
            current_longitude: None,
            vehicle_model,
            vehicle_plate_number,
            vehicle_color,
            created_at: now,
            updated_at: now,
        }
    }
}
