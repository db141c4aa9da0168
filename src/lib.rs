pub mod config;
pub mod ledger;
pub mod models;
pub mod monitor;
pub mod plugins;
pub mod policy;
pub mod probe;
pub mod tcin;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
