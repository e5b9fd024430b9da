pub mod badge;
pub mod error;
pub mod metrics;
pub mod raw;
pub mod score;
pub mod user;

pub use badge::*;
pub use error::*;
pub use metrics::*;
pub use raw::*;
pub use score::*;
pub use user::*;
