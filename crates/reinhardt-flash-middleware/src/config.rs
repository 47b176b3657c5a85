//! Flash middleware configuration
//!
//! Settings can be built in code or loaded from TOML, either as bare keys or
//! from a `[flash]` table:
//!
//! ```toml
//! [flash]
//! implementation = "flash_messages"
//! session_key = "app::FLASH_NEXT"
//! attribute_key = "flash"
//! ```

use crate::exception::{Error, Result};
use crate::flash::FLASH_ATTRIBUTE;
use crate::registry::DEFAULT_IMPLEMENTATION;
use reinhardt_flash_core::FLASH_NEXT;
use serde::{Deserialize, Serialize};

/// Table name looked up by [`FlashConfig::from_toml_str`]
const CONFIG_TABLE: &str = "flash";

/// Flash middleware configuration
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
	/// Registry name of the message store implementation
	pub implementation: String,
	/// Session key scheduled messages are persisted under
	pub session_key: String,
	/// Request attribute the store is published under
	pub attribute_key: String,
}

impl FlashConfig {
	/// Create a configuration with default values
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::FlashConfig;
	///
	/// let config = FlashConfig::new();
	/// assert_eq!(config.implementation, "flash_messages");
	/// assert_eq!(config.attribute_key, "flash");
	/// ```
	pub fn new() -> Self {
		Self {
			implementation: DEFAULT_IMPLEMENTATION.to_string(),
			session_key: FLASH_NEXT.to_string(),
			attribute_key: FLASH_ATTRIBUTE.to_string(),
		}
	}

	/// Set the implementation name
	pub fn with_implementation(mut self, implementation: impl Into<String>) -> Self {
		self.implementation = implementation.into();
		self
	}

	/// Set the session key
	pub fn with_session_key(mut self, session_key: impl Into<String>) -> Self {
		self.session_key = session_key.into();
		self
	}

	/// Set the request attribute name
	pub fn with_attribute_key(mut self, attribute_key: impl Into<String>) -> Self {
		self.attribute_key = attribute_key.into();
		self
	}

	/// Load configuration from TOML
	///
	/// Reads the `[flash]` table when present, otherwise the top-level keys.
	/// Missing keys keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::FlashConfig;
	///
	/// let config = FlashConfig::from_toml_str(r#"
	///     [flash]
	///     session_key = "app::FLASH_NEXT"
	/// "#).unwrap();
	///
	/// assert_eq!(config.session_key, "app::FLASH_NEXT");
	/// assert_eq!(config.attribute_key, "flash");
	/// ```
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] for invalid TOML or mistyped values.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let mut table: toml::Table =
			toml::from_str(source).map_err(|e| Error::Configuration(e.to_string()))?;

		let section = match table.remove(CONFIG_TABLE) {
			Some(toml::Value::Table(section)) => section,
			Some(other) => {
				return Err(Error::Configuration(format!(
					"`{}` must be a table, found {}",
					CONFIG_TABLE,
					other.type_str()
				)));
			}
			None => table,
		};

		toml::Value::Table(section)
			.try_into()
			.map_err(|e: toml::de::Error| Error::Configuration(e.to_string()))
	}
}

impl Default for FlashConfig {
	fn default() -> Self {
		Self::new()
	}
}
