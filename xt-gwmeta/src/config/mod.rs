//! Configuration module for xt-gwmeta
//!
//! This module provides configuration types and loading utilities for the
//! `xt-gwmeta` command-line front end.
//!
//! # Example
//!
//! ```no_run
//! use xt_gwmeta::config::{load_config, Config};
//!
//! let config = load_config("/etc/xt-gwmeta/config.json").unwrap();
//! println!("Log level: {}", config.log.level);
//! ```

mod loader;
mod types;

pub use loader::{create_default_config, load_config, load_config_str, load_config_with_env};
pub use types::{Config, LogConfig, RenderConfig};
