//! Error types for the flash middleware

use reinhardt_flash_core::FlashError;
use thiserror::Error;

/// Middleware pipeline errors
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// Error raised by the flash message engine or its wiring
	#[error(transparent)]
	Flash(#[from] FlashError),
	/// Error raised by a downstream handler
	#[error("Handler error: {0}")]
	Handler(String),
	/// Request could not be built
	#[error("Invalid request: {0}")]
	InvalidRequest(String),
	/// Flash configuration could not be loaded
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Result type for middleware and handlers
pub type Result<T> = std::result::Result<T, Error>;
