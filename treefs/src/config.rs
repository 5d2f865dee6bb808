//! Shell configuration module.
//!
//! Loads the shell's settings from environment variables. Every variable is
//! optional; unset variables fall back to the defaults below.
//!
//! # Environment Variables
//!
//! - `TREEFS_IMAGE_PATH`: File the tree is loaded from and saved to (default: `fs.img`)
//! - `TREEFS_MAX_CONTENT_BYTES`: Largest file content accepted by `touch` (default: `1048576`)
//! - `TREEFS_BTREE_ORDER`: Minimum degree of every directory index (default: `3`)
//!
//! # Invariants
//!
//! - `order` is always at least [`Order::MIN_DEGREE`]
//! - `max_content_bytes` is always positive

use std::path::PathBuf;

use crate::index::Order;
use crate::session::{DEFAULT_MAX_CONTENT_BYTES, SessionOptions};

const IMAGE_PATH_VAR: &str = "TREEFS_IMAGE_PATH";
const MAX_CONTENT_BYTES_VAR: &str = "TREEFS_MAX_CONTENT_BYTES";
const BTREE_ORDER_VAR: &str = "TREEFS_BTREE_ORDER";

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Image file loaded at startup and written on exit.
    pub image_path: PathBuf,
    /// Largest file content accepted by `touch`, in bytes.
    pub max_content_bytes: usize,
    /// Minimum degree of every directory index.
    pub order: Order,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from(Self::DEFAULT_IMAGE_PATH),
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            order: Order::DEFAULT,
        }
    }
}

impl ShellConfig {
    /// Default image file.
    pub const DEFAULT_IMAGE_PATH: &'static str = "fs.img";

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// or `None` if it is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TREEFS_IMAGE_PATH` is set but empty
    /// - `TREEFS_MAX_CONTENT_BYTES` is set but not a positive integer
    /// - `TREEFS_BTREE_ORDER` is set but not an integer of at least 2
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let image_path = Self::load_image_path(&lookup)?;
        let max_content_bytes = Self::load_max_content_bytes(&lookup)?;
        let order = Self::load_order(&lookup)?;

        Ok(Self {
            image_path,
            max_content_bytes,
            order,
        })
    }

    /// Session options derived from this configuration.
    #[must_use]
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            order: self.order,
            max_content_bytes: self.max_content_bytes,
        }
    }

    fn load_image_path(lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
        match lookup(IMAGE_PATH_VAR) {
            Some(value) if value.is_empty() => Err(invalid(IMAGE_PATH_VAR, "must not be empty")),
            Some(value) => Ok(PathBuf::from(value)),
            None => Ok(PathBuf::from(Self::DEFAULT_IMAGE_PATH)),
        }
    }

    fn load_max_content_bytes(lookup: impl Fn(&str) -> Option<String>) -> Result<usize, ConfigError> {
        let Some(value) = lookup(MAX_CONTENT_BYTES_VAR) else {
            return Ok(DEFAULT_MAX_CONTENT_BYTES);
        };
        match value.trim().parse::<usize>() {
            Ok(bytes) if bytes > 0 => Ok(bytes),
            _ => Err(invalid(
                MAX_CONTENT_BYTES_VAR,
                format!("'{value}' is not a positive number of bytes"),
            )),
        }
    }

    fn load_order(lookup: impl Fn(&str) -> Option<String>) -> Result<Order, ConfigError> {
        let Some(value) = lookup(BTREE_ORDER_VAR) else {
            return Ok(Order::DEFAULT);
        };
        let degree = value.trim().parse::<usize>().map_err(|_| {
            invalid(BTREE_ORDER_VAR, format!("'{value}' is not a number"))
        })?;
        Order::new(degree).map_err(|e| invalid(BTREE_ORDER_VAR, e.to_string()))
    }
}

fn invalid(name: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_owned(),
        message: message.into(),
    }
}
