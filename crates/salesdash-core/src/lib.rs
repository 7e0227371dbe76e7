pub mod app_config;
pub mod config;
pub mod error;
pub mod sales;
pub mod user;

pub use app_config::{AppConfig, Environment, SalesSource};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use sales::{DailySalesRecord, InvalidSalesPeriod, SalesPeriod};
pub use user::{StoreInfo, UserInfo, UserProfile};
