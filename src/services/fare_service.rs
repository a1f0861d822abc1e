//! Cálculo de tarifas
//!
//! Función pura: tarifa = base + distancia * tarifa_km + duración * tarifa_min.
//! Las entradas negativas se rechazan aguas arriba, en la validación de los
//! DTOs; aquí no hay condiciones de error.

use lazy_static::lazy_static;
use rust_decimal::Decimal;

lazy_static! {
    /// Tarifa base en USD
    static ref BASE_FARE: Decimal = Decimal::new(20, 1); // 2.0
    /// Tarifa por kilómetro
    static ref PER_KM_RATE: Decimal = Decimal::new(15, 1); // 1.5
    /// Tarifa por minuto
    static ref PER_MIN_RATE: Decimal = Decimal::new(2, 1); // 0.2
}

/// Calcular la tarifa estimada de un viaje
pub fn calculate_fare(distance_km: Decimal, duration_min: Decimal) -> Decimal {
    *BASE_FARE + distance_km * *PER_KM_RATE + duration_min * *PER_MIN_RATE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn test_base_fare_only() {
        assert_eq!(calculate_fare(Decimal::ZERO, Decimal::ZERO), Decimal::new(2, 0));
    }

    #[test]
    fn test_fare_ten_km_fifteen_min() {
        // 2.0 + 10 * 1.5 + 15 * 0.2 = 20.0
        let fare = calculate_fare(Decimal::new(10, 0), Decimal::new(15, 0));
        assert_eq!(fare, Decimal::new(20, 0));
    }

    #[test]
    fn test_fare_fractional_distance() {
        // 2.0 + 3.2 * 1.5 + 15 * 0.2 = 9.8
        let distance = Decimal::from_f64(3.2).unwrap();
        let fare = calculate_fare(distance, Decimal::new(15, 0));
        assert_eq!(fare, Decimal::new(98, 1));
    }

    #[test]
    fn test_fare_is_deterministic() {
        let d = Decimal::from_f64(7.25).unwrap();
        let t = Decimal::from_f64(22.5).unwrap();
        assert_eq!(calculate_fare(d, t), calculate_fare(d, t));
    }
}
