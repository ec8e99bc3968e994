//! MongoDB connection management and helpers shared by the domain repositories.

mod codec;
mod config;
mod connector;
mod errors;
mod health;

pub use codec::{to_stored_bson, to_stored_document};
pub use config::MongoConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry};
pub use errors::{DUPLICATE_KEY_CODE, is_duplicate_key};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
