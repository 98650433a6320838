//! Configuration for fence-highlight
//!
//! This crate provides:
//! - Config file discovery (CWD, home directory, platform config directory)
//! - Application configuration (AppConfig) with highlighter options

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{find_config_file, load_config_file};
pub use paths::{config_dir, global_config_path};
