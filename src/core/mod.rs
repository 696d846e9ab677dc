pub mod gateway;
pub mod listing;
pub mod session;

pub use crate::domain::model::{Provider, ServiceListing, ServiceType};
pub use crate::domain::ports::SessionStorage;
pub use crate::utils::error::Result;
