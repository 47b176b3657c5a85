//! Error types for flash messages

use thiserror::Error;

/// Flash message errors
///
/// Every variant is a local precondition violation. None of them are
/// retried or recovered internally.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlashError {
	/// A message was scheduled with fewer than one hop
	#[error(
		"Hops value specified for flash message \"{key}\" was too low; must be greater than 0, received {hops}"
	)]
	InvalidHopsValue { key: String, hops: i64 },
	/// The configured store implementation is unknown to the middleware
	#[error("Cannot use \"{name}\" within {middleware}; does not implement MessageStore")]
	InvalidMessageStoreImplementation { name: String, middleware: String },
	/// The inbound request carries no session
	#[error("Unable to create flash messages in {middleware}; missing session attribute")]
	MissingSession { middleware: String },
	/// Stored messages could not be encoded or decoded
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl FlashError {
	/// Build an [`FlashError::InvalidHopsValue`] for `key`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::FlashError;
	///
	/// let err = FlashError::invalid_hops("notice", 0);
	/// assert_eq!(
	///     err.to_string(),
	///     "Hops value specified for flash message \"notice\" was too low; must be greater than 0, received 0"
	/// );
	/// ```
	pub fn invalid_hops(key: impl Into<String>, hops: i64) -> Self {
		Self::InvalidHopsValue {
			key: key.into(),
			hops,
		}
	}

	/// Build an [`FlashError::InvalidMessageStoreImplementation`]
	pub fn invalid_implementation(name: impl Into<String>, middleware: impl Into<String>) -> Self {
		Self::InvalidMessageStoreImplementation {
			name: name.into(),
			middleware: middleware.into(),
		}
	}

	/// Build an [`FlashError::MissingSession`]
	pub fn missing_session(middleware: impl Into<String>) -> Self {
		Self::MissingSession {
			middleware: middleware.into(),
		}
	}
}

impl From<serde_json::Error> for FlashError {
	fn from(err: serde_json::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

/// Result type for flash message operations
pub type Result<T> = std::result::Result<T, FlashError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0)]
	#[case(-3)]
	fn test_invalid_hops_message_carries_key_and_value(#[case] hops: i64) {
		let err = FlashError::invalid_hops("status", hops);

		assert_eq!(
			err,
			FlashError::InvalidHopsValue {
				key: "status".to_string(),
				hops,
			}
		);
		assert!(err.to_string().contains("\"status\""));
		assert!(err.to_string().ends_with(&format!("received {}", hops)));
	}

	#[rstest]
	fn test_invalid_implementation_message() {
		let err = FlashError::invalid_implementation("cookie_store", "FlashMessageMiddleware");
		assert_eq!(
			err.to_string(),
			"Cannot use \"cookie_store\" within FlashMessageMiddleware; does not implement MessageStore"
		);
	}

	#[rstest]
	fn test_missing_session_message() {
		let err = FlashError::missing_session("FlashMessageMiddleware");
		assert_eq!(
			err.to_string(),
			"Unable to create flash messages in FlashMessageMiddleware; missing session attribute"
		);
	}

	#[rstest]
	fn test_from_serde_json_error() {
		let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
		let err: FlashError = json_err.into();
		assert!(matches!(err, FlashError::Serialization(_)));
	}
}
