//! DTOs de autenticación y cuentas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::account::{Account, AccountRole};

/// Datos del vehículo, requeridos al registrar un conductor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleInput {
    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 1, max = 20))]
    pub plate_number: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,
}

/// Request de registro (rider o driver según la ruta)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 5, max = 30))]
    pub phone_number: String,

    #[validate]
    pub vehicle: Option<VehicleInput>,
}

/// Request de login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request de actualización de perfil
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(length(min = 5, max = 30))]
    pub phone_number: Option<String>,

    #[validate]
    pub vehicle: Option<VehicleInput>,
}

/// Request de cambio de contraseña
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 6, max = 100))]
    pub new_password: String,
}

/// Request de creación de admin (solo admins)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 5, max = 30))]
    pub phone_number: String,
}

/// Vehículo en responses
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    pub model: String,
    pub plate_number: String,
    pub color: String,
}

/// Ubicación en responses
#[derive(Debug, Clone, Serialize)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response de cuenta (nunca incluye el hash de contraseña)
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<LocationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let current_location = match (account.current_latitude, account.current_longitude) {
            (Some(latitude), Some(longitude)) => Some(LocationResponse { latitude, longitude }),
            _ => None,
        };

        let vehicle = match (
            account.vehicle_model,
            account.vehicle_plate_number,
            account.vehicle_color,
        ) {
            (Some(model), Some(plate_number), Some(color)) => Some(VehicleResponse {
                model,
                plate_number,
                color,
            }),
            _ => None,
        };

        Self {
            id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            phone_number: account.phone_number,
            role: account.role,
            is_active: account.is_active,
            rating: account.rating,
            current_location,
            vehicle,
            created_at: account.created_at,
        }
    }
}

/// Response de registro/login: token + cuenta
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
}
