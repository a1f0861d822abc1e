use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::AccountRole;
use crate::models::ride::Ride;
use crate::utils::errors::AppError;

// Fila del feed de solicitudes cercanas (pending + resumen del rider)
#[derive(Debug, sqlx::FromRow)]
pub struct NearbyRideRow {
    pub id: Uuid,
    pub pickup_address: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub destination_address: String,
    pub fare_amount: rust_decimal::Decimal,
    pub distance_km: rust_decimal::Decimal,
    pub duration_min: rust_decimal::Decimal,
    pub distance_meters: f64,
    pub rider_first_name: String,
    pub rider_last_name: String,
    pub rider_rating: f64,
}

// Agregados de estadísticas de un conductor
#[derive(Debug, sqlx::FromRow)]
pub struct DriverStatisticsRow {
    pub completed_rides: i64,
    pub total_rides: i64,
    pub total_earnings: f64,
    pub average_rating: Option<f64>,
}

pub struct RideRepository {
    pool: PgPool,
}

impl RideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, ride: &Ride) -> Result<Ride, AppError> {
        let result = sqlx::query_as::<_, Ride>(
            r#"
            INSERT INTO rides (
                id, rider_id, driver_id,
                pickup_address, pickup_latitude, pickup_longitude,
                destination_address, destination_latitude, destination_longitude,
                status, fare_amount, fare_currency, payment_status,
                distance_km, duration_min, start_time, end_time,
                rating_from_rider, rating_from_driver,
                feedback_from_rider, feedback_from_driver,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING *
            "#,
        )
        .bind(ride.id)
        .bind(ride.rider_id)
        .bind(ride.driver_id)
        .bind(&ride.pickup_address)
        .bind(ride.pickup_latitude)
        .bind(ride.pickup_longitude)
        .bind(&ride.destination_address)
        .bind(ride.destination_latitude)
        .bind(ride.destination_longitude)
        .bind(ride.status)
        .bind(ride.fare_amount)
        .bind(&ride.fare_currency)
        .bind(ride.payment_status)
        .bind(ride.distance_km)
        .bind(ride.duration_min)
        .bind(ride.start_time)
        .bind(ride.end_time)
        .bind(ride.rating_from_rider)
        .bind(ride.rating_from_driver)
        .bind(&ride.feedback_from_rider)
        .bind(&ride.feedback_from_driver)
        .bind(ride.created_at)
        .bind(ride.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, ride_id: Uuid) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = $1")
            .bind(ride_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ride)
    }

    /// Buscar un viaje visible para un participante (rider o driver)
    pub async fn find_for_participant(
        &self,
        ride_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>(
            "SELECT * FROM rides WHERE id = $1 AND (rider_id = $2 OR driver_id = $2)",
        )
        .bind(ride_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Viajes de una cuenta según su lado de la relación, más recientes primero
    pub async fn list_for_account(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Vec<Ride>, AppError> {
        let query = match role {
            AccountRole::Driver => {
                "SELECT * FROM rides WHERE driver_id = $1 ORDER BY created_at DESC"
            }
            _ => "SELECT * FROM rides WHERE rider_id = $1 ORDER BY created_at DESC",
        };

        let rides = sqlx::query_as::<_, Ride>(query)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rides)
    }

    /// Aceptar un viaje. El UPDATE condicional sobre `status = 'pending'` es la
    /// única guarda contra dos accepts concurrentes: exactamente uno gana y el
    /// perdedor recibe `None`.
    pub async fn accept(&self, ride_id: Uuid, driver_id: Uuid) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET driver_id = $2, status = 'accepted', updated_at = $3
            WHERE id = $1 AND status = 'pending' AND driver_id IS NULL
            RETURNING *
            "#,
        )
        .bind(ride_id)
        .bind(driver_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Arrancar un viaje aceptado. Solo el conductor asignado puede hacerlo.
    pub async fn start(&self, ride_id: Uuid, driver_id: Uuid) -> Result<Option<Ride>, AppError> {
        let now = Utc::now();
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET status = 'started', start_time = $3, updated_at = $3
            WHERE id = $1 AND driver_id = $2 AND status = 'accepted'
            RETURNING *
            "#,
        )
        .bind(ride_id)
        .bind(driver_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Completar un viaje en curso. Solo el conductor asignado puede hacerlo.
    pub async fn complete(&self, ride_id: Uuid, driver_id: Uuid) -> Result<Option<Ride>, AppError> {
        let now = Utc::now();
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET status = 'completed', end_time = $3, updated_at = $3
            WHERE id = $1 AND driver_id = $2 AND status = 'started'
            RETURNING *
            "#,
        )
        .bind(ride_id)
        .bind(driver_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Cancelar un viaje. Solo el rider, y solo antes de que arranque.
    pub async fn cancel(&self, ride_id: Uuid, rider_id: Uuid) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET status = 'cancelled', updated_at = $3
            WHERE id = $1 AND rider_id = $2 AND status IN ('pending', 'accepted')
            RETURNING *
            "#,
        )
        .bind(ride_id)
        .bind(rider_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Calificación del rider hacia el conductor. Sobrescribe una
    /// calificación previa del mismo rider.
    pub async fn rate_by_rider(
        &self,
        ride_id: Uuid,
        rider_id: Uuid,
        rating: i16,
        feedback: Option<String>,
    ) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET rating_from_rider = $3, feedback_from_rider = $4, updated_at = $5
            WHERE id = $1 AND rider_id = $2 AND status = 'completed'
            RETURNING *
            "#,
        )
        .bind(ride_id)
        .bind(rider_id)
        .bind(rating)
        .bind(feedback)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Calificación del conductor hacia el rider
    pub async fn rate_by_driver(
        &self,
        ride_id: Uuid,
        driver_id: Uuid,
        rating: i16,
        feedback: Option<String>,
    ) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET rating_from_driver = $3, feedback_from_driver = $4, updated_at = $5
            WHERE id = $1 AND driver_id = $2 AND status = 'completed'
            RETURNING *
            "#,
        )
        .bind(ride_id)
        .bind(driver_id)
        .bind(rating)
        .bind(feedback)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Promedio de las calificaciones recibidas por un conductor sobre sus
    /// viajes completados y calificados. `None` si todavía no tiene ninguna.
    pub async fn average_rating_for_driver(&self, driver_id: Uuid) -> Result<Option<f64>, AppError> {
        let result: (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT AVG(rating_from_rider)::double precision
            FROM rides
            WHERE driver_id = $1 AND status = 'completed' AND rating_from_rider IS NOT NULL
            "#,
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Promedio de las calificaciones recibidas por un rider
    pub async fn average_rating_for_rider(&self, rider_id: Uuid) -> Result<Option<f64>, AppError> {
        let result: (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT AVG(rating_from_driver)::double precision
            FROM rides
            WHERE rider_id = $1 AND status = 'completed' AND rating_from_driver IS NOT NULL
            "#,
        )
        .bind(rider_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// El viaje activo de un conductor (aceptado o en curso), si existe
    pub async fn find_active_for_driver(&self, driver_id: Uuid) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>(
            "SELECT * FROM rides WHERE driver_id = $1 AND status IN ('accepted', 'started')",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ride)
    }

    /// Solicitudes pendientes con pickup dentro del radio, más cercanas primero.
    /// Mismo criterio de borde que la búsqueda de conductores: estrictamente
    /// menor que el radio.
    pub async fn find_nearby_pending(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Vec<NearbyRideRow>, AppError> {
        let rides = sqlx::query_as::<_, NearbyRideRow>(
            r#"
            SELECT r.id, r.pickup_address, r.pickup_latitude, r.pickup_longitude,
                   r.destination_address, r.fare_amount, r.distance_km, r.duration_min,
                   ST_Distance(
                       ST_SetSRID(ST_MakePoint(r.pickup_longitude, r.pickup_latitude), 4326)::geography,
                       ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography
                   ) AS distance_meters,
                   a.first_name AS rider_first_name,
                   a.last_name AS rider_last_name,
                   a.rating AS rider_rating
            FROM rides r
            JOIN accounts a ON a.id = r.rider_id
            WHERE r.status = 'pending'
              AND ST_Distance(
                      ST_SetSRID(ST_MakePoint(r.pickup_longitude, r.pickup_latitude), 4326)::geography,
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

        Ok(rides)
    }

    /// Agregados para las estadísticas del conductor, opcionalmente desde una fecha
    pub async fn statistics_for_driver(
        &self,
        driver_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<DriverStatisticsRow, AppError> {
        let stats = sqlx::query_as::<_, DriverStatisticsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_rides,
                COUNT(*) AS total_rides,
                COALESCE(SUM(fare_amount) FILTER (WHERE status = 'completed'), 0)::double precision
                    AS total_earnings,
                AVG(rating_from_rider) FILTER (
                    WHERE status = 'completed' AND rating_from_rider IS NOT NULL
                )::double precision AS average_rating
            FROM rides
            WHERE driver_id = $1 AND ($2::timestamptz IS NULL OR created_at >= $2)
            "#,
        )
        .bind(driver_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
