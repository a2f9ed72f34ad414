mod config;
mod load_config;

pub use config::Config;
pub use load_config::{default_config_path, get_config_from_path, get_default_store_config};
