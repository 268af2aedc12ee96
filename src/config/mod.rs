//! Configuration module for Kobis-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; [`Config::default`] targets the live site.
//!
//! # Example
//!
//! ```no_run
//! use kobis_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kobis.toml")).unwrap();
//! println!("Scraping {}", config.site.origin);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, HttpConfig, SiteConfig, UserAgentConfig, DEFAULT_ORIGIN};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
