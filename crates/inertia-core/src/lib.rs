pub mod config;
pub mod error;
pub mod forms;
pub mod rate_limit;
pub mod scroll;

pub use config::{AppConfig, FormsConfig, ScrollConfig};
pub use error::{Error, Result};
pub use rate_limit::RateLimiter;
