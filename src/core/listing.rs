use crate::domain::model::{NewService, ServiceType};
use crate::utils::error::{ProviderError, Result};
use crate::utils::validation;

/// The backend validates coordinates against a 1-8 decimal digit constraint,
/// so always send exactly 6 fixed-point decimals.
pub fn format_coordinate(coordinate: f64) -> String {
    format!("{:.6}", coordinate)
}

#[derive(Debug, Clone, Default)]
pub struct GeocodedAddress {
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub subregion: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl GeocodedAddress {
    // street + number, then place name, then "Unknown Address"
    fn address_line(&self) -> String {
        let line = format!(
            "{} {}",
            self.street.as_deref().unwrap_or(""),
            self.street_number.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        if !line.is_empty() {
            return line;
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        "Unknown Address".to_string()
    }

    fn city_line(&self) -> String {
        self.city
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.subregion.as_deref())
            .unwrap_or("")
            .to_string()
    }
}

// build() validates before any network call is made
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub service_type: ServiceType,
    pub location: Option<(f64, f64)>,
    pub address: Option<GeocodedAddress>,
    pub hourly_rate: String,
}

impl ListingDraft {
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            location: None,
            address: None,
            hourly_rate: String::new(),
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64, address: GeocodedAddress) -> Self {
        self.location = Some((latitude, longitude));
        self.address = Some(address);
        self
    }

    pub fn with_hourly_rate(mut self, rate: impl Into<String>) -> Self {
        self.hourly_rate = rate.into();
        self
    }

    pub fn build(&self) -> Result<NewService> {
        let (latitude, longitude) = self.location.ok_or(ProviderError::MissingFieldError {
            field: "location".to_string(),
        })?;
        let address = self.address.as_ref().ok_or(ProviderError::MissingFieldError {
            field: "location".to_string(),
        })?;
        validation::validate_positive_rate("hourlyRate", &self.hourly_rate)?;

        Ok(NewService {
            service_type: self.service_type,
            status: "active".to_string(),
            address: address.address_line(),
            city: address.city_line(),
            state: address.region.clone().unwrap_or_default(),
            postal_code: address.postal_code.clone().unwrap_or_default(),
            country: address.country.clone().unwrap_or_default(),
            latitude: format_coordinate(latitude),
            longitude: format_coordinate(longitude),
            hourly_rate: self.hourly_rate.trim().to_string(),
        })
    }
}
