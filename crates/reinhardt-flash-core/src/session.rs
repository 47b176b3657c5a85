//! Session capability
//!
//! Flash message stores never own session persistence. They read and write
//! a single key through the [`Session`] trait; loading and saving the session
//! around the request is the job of whatever session layer provides it.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key/value view of a request's session
///
/// Implementations use interior mutability so that one handle can be shared
/// between the middleware, the flash store and request handlers.
pub trait Session: Send + Sync {
	/// Check if a key exists
	fn has(&self, key: &str) -> bool;

	/// Get a value
	fn get(&self, key: &str) -> Option<Value>;

	/// Get a value, falling back to `default` when the key is absent
	fn get_or(&self, key: &str, default: Value) -> Value {
		self.get(key).unwrap_or(default)
	}

	/// Set a value
	fn set(&self, key: &str, value: Value);

	/// Remove a value
	fn unset(&self, key: &str);
}

/// Shared session handle passed to message stores
pub type SessionHandle = Arc<dyn Session>;

/// In-memory session data
///
/// Cloning a `SessionData` yields another handle to the same map.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::{Session, SessionData};
/// use serde_json::json;
///
/// let session = SessionData::new();
/// session.set("user_id", json!(42));
///
/// assert!(session.has("user_id"));
/// assert_eq!(session.get("user_id"), Some(json!(42)));
///
/// session.unset("user_id");
/// assert!(!session.has("user_id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionData {
	data: Arc<RwLock<HashMap<String, Value>>>,
}

impl SessionData {
	/// Create an empty session
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a session pre-populated with `data`
	///
	/// # Examples
	///
	/// ```
	/// use std::collections::HashMap;
	/// use reinhardt_flash_core::{Session, SessionData};
	/// use serde_json::json;
	///
	/// let mut data = HashMap::new();
	/// data.insert("theme".to_string(), json!("dark"));
	///
	/// let session = SessionData::from_map(data);
	/// assert_eq!(session.get("theme"), Some(json!("dark")));
	/// ```
	pub fn from_map(data: HashMap<String, Value>) -> Self {
		Self {
			data: Arc::new(RwLock::new(data)),
		}
	}

	/// Copy of the current session contents
	pub fn snapshot(&self) -> HashMap<String, Value> {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.clone()
	}

	/// Number of keys in the session
	pub fn len(&self) -> usize {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.len()
	}

	/// Check if the session is empty
	pub fn is_empty(&self) -> bool {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.is_empty()
	}

	/// Remove every key
	pub fn clear(&self) {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.clear();
	}
}

impl Session for SessionData {
	fn has(&self, key: &str) -> bool {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.contains_key(key)
	}

	fn get(&self, key: &str) -> Option<Value> {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.get(key).cloned()
	}

	fn set(&self, key: &str, value: Value) {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.insert(key.to_string(), value);
	}

	fn unset(&self, key: &str) {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.remove(key);
	}
}
