pub mod load;
pub mod schema;

pub use load::{load_config, require_roles, CliOverrides};
pub use schema::{AppConfig, AwsConfig, BatchConfig};
