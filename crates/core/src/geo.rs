//! Coordinate validation for map selections.

use crate::error::CoreError;

/// Maximum allowed length for a resolved street address.
pub const MAX_ADDRESS_LENGTH: usize = 500;

/// Validate a WGS84 coordinate pair.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CoreError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(CoreError::Validation(format!(
            "Latitude must be between -90 and 90, got {lat}"
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(CoreError::Validation(format!(
            "Longitude must be between -180 and 180, got {lng}"
        )));
    }
    Ok(())
}

/// Validate an optional resolved address against [`MAX_ADDRESS_LENGTH`].
pub fn validate_address(address: Option<&str>) -> Result<(), CoreError> {
    if let Some(address) = address {
        if address.len() > MAX_ADDRESS_LENGTH {
            return Err(CoreError::Validation(format!(
                "Address must not exceed {MAX_ADDRESS_LENGTH} characters, got {}",
                address.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinates() {
        assert!(validate_coordinates(45.4215, -75.6972).is_ok());
    }

    #[test]
    fn valid_coordinates_at_bounds() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        assert!(validate_coordinates(90.01, 0.0).is_err());
        assert!(validate_coordinates(-91.0, 0.0).is_err());
    }

    #[test]
    fn rejects_longitude_out_of_range() {
        assert!(validate_coordinates(0.0, 180.5).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn missing_address_is_valid() {
        assert!(validate_address(None).is_ok());
    }

    #[test]
    fn rejects_address_exceeding_max() {
        let address = "a".repeat(MAX_ADDRESS_LENGTH + 1);
        assert!(validate_address(Some(&address)).is_err());
    }
}
