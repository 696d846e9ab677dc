pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::FileStorage;
pub use crate::config::ApiConfig;

pub use crate::core::gateway::ApiGateway;
pub use crate::core::listing::{format_coordinate, GeocodedAddress, ListingDraft};
pub use crate::core::session::{SessionState, SessionStore};
pub use crate::domain::model::{NewService, Provider, ServiceListing, ServiceType};
pub use crate::domain::ports::SessionStorage;
pub use crate::utils::error::{ProviderError, Result};
