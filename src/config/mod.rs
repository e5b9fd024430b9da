pub mod settings;
pub mod sources;

pub use settings::*;
pub use sources::{ApiEndpoint, RetrySettings, SourcesConfig};
