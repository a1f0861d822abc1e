//! Utilidades de validación
//!
//! Funciones helper para validación de datos de entrada.

use crate::utils::errors::AppError;

/// Par (longitud, latitud) ya validado
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// Validar un arreglo de coordenadas `[longitude, latitude]`
///
/// El orden es el de GeoJSON: longitud primero, latitud después.
pub fn validate_coordinates(coordinates: &[f64]) -> Result<Coordinates, AppError> {
    if coordinates.len() != 2 {
        return Err(AppError::BadRequest(
            "Invalid coordinates format. Expected [longitude, latitude]".to_string(),
        ));
    }

    let (longitude, latitude) = (coordinates[0], coordinates[1]);

    if !longitude.is_finite() || !latitude.is_finite() {
        return Err(AppError::BadRequest(
            "Invalid coordinates format. Expected [longitude, latitude]".to_string(),
        ));
    }

    if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::BadRequest(
            "Coordinates out of range: longitude must be within [-180, 180] and latitude within [-90, 90]"
                .to_string(),
        ));
    }

    Ok(Coordinates { longitude, latitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let coords = validate_coordinates(&[-58.3816, -34.6037]).unwrap();
        assert_eq!(coords.longitude, -58.3816);
        assert_eq!(coords.latitude, -34.6037);
    }

    #[test]
    fn test_wrong_arity_rejected() {
        assert!(validate_coordinates(&[1.0]).is_err());
        assert!(validate_coordinates(&[1.0, 2.0, 3.0]).is_err());
        assert!(validate_coordinates(&[]).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(validate_coordinates(&[181.0, 0.0]).is_err());
        assert!(validate_coordinates(&[0.0, 91.0]).is_err());
        assert!(validate_coordinates(&[0.0, -91.0]).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(validate_coordinates(&[f64::NAN, 0.0]).is_err());
        assert!(validate_coordinates(&[0.0, f64::INFINITY]).is_err());
    }
}
