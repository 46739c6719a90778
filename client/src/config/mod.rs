mod config;
mod render_config;

pub use config::{Config, get_config_manager};
pub use render_config::RenderConfig;
