use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::Account;
use crate::utils::errors::AppError;

// Fila de la consulta de proximidad
#[derive(Debug, sqlx::FromRow)]
pub struct NearbyDriverRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub rating: f64,
    pub current_latitude: f64,
    pub current_longitude: f64,
    pub vehicle_model: Option<String>,
    pub vehicle_plate_number: Option<String>,
    pub vehicle_color: Option<String>,
    pub distance_meters: f64,
}

pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, account: &Account) -> Result<Account, AppError> {
        let result = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                id, email, password_hash, first_name, last_name, phone_number,
                role, is_active, rating, current_latitude, current_longitude,
                vehicle_model, vehicle_plate_number, vehicle_color, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.phone_number)
        .bind(account.role)
        .bind(account.is_active)
        .bind(account.rating)
        .bind(account.current_latitude)
        .bind(account.current_longitude)
        .bind(&account.vehicle_model)
        .bind(&account.vehicle_plate_number)
        .bind(&account.vehicle_color)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        phone_number: Option<String>,
        vehicle: Option<(String, String, String)>,
    ) -> Result<Account, AppError> {
        // Obtener cuenta actual y combinar con los campos nuevos
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let (vehicle_model, vehicle_plate_number, vehicle_color) = match vehicle {
            Some((model, plate, color)) => (Some(model), Some(plate), Some(color)),
            None => (
                current.vehicle_model,
                current.vehicle_plate_number,
                current.vehicle_color,
            ),
        };

        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET first_name = $2, last_name = $3, phone_number = $4,
                vehicle_model = $5, vehicle_plate_number = $6, vehicle_color = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(first_name.unwrap_or(current.first_name))
        .bind(last_name.unwrap_or(current.last_name))
        .bind(phone_number.unwrap_or(current.phone_number))
        .bind(vehicle_model)
        .bind(vehicle_plate_number)
        .bind(vehicle_color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET current_latitude = $2, current_longitude = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn update_availability(&self, id: Uuid, is_active: bool) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn update_vehicle(
        &self,
        id: Uuid,
        model: String,
        plate_number: String,
        color: String,
    ) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET vehicle_model = $2, vehicle_plate_number = $3, vehicle_color = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(model)
        .bind(plate_number)
        .bind(color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn update_rating(&self, id: Uuid, rating: f64) -> Result<(), AppError> {
        sqlx::query("UPDATE accounts SET rating = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(rating)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Listado de conductores para el panel de administración
    pub async fn list_drivers(&self, is_active: Option<bool>) -> Result<Vec<Account>, AppError> {
        let drivers = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE role = 'driver' AND ($1::boolean IS NULL OR is_active = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(is_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    /// Conductores activos dentro del radio, ordenados del más cercano al más lejano.
    ///
    /// La distancia se calcula sobre geography (metros reales) y el límite es
    /// estrictamente menor que el radio: con radio 0 la lista siempre es vacía.
    pub async fn find_nearby_drivers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Vec<NearbyDriverRow>, AppError> {
        let drivers = sqlx::query_as::<_, NearbyDriverRow>(
            r#"
            SELECT id, first_name, last_name, rating,
                   current_latitude, current_longitude,
                   vehicle_model, vehicle_plate_number, vehicle_color,
                   ST_Distance(
                       ST_SetSRID(ST_MakePoint(current_longitude, current_latitude), 4326)::geography,
                       ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography
                   ) AS distance_meters
            FROM accounts
            WHERE role = 'driver'
              AND is_active = TRUE
              AND current_latitude IS NOT NULL
              AND current_longitude IS NOT NULL
              AND ST_Distance(
                      ST_SetSRID(ST_MakePoint(current_longitude, current_latitude), 4326)::geography,
                      ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography
                  ) < $3
            ORDER BY distance_meters ASC
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(radius_meters)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }
}
