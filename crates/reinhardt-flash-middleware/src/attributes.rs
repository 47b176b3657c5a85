//! Named request attributes
//!
//! Provides a type-checked storage mechanism for arbitrary data attached to
//! a request under a string name, so that the attribute name a middleware
//! publishes under can be configured.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Named, type-checked attribute storage
#[derive(Clone, Default)]
pub struct Attributes {
	map: Arc<Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>>,
}

impl Attributes {
	/// Create an empty attribute set
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::Attributes;
	///
	/// let attributes = Attributes::new();
	/// assert!(!attributes.contains("flash"));
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value under `name`, replacing any previous value
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::Attributes;
	///
	/// let attributes = Attributes::new();
	/// attributes.insert("request_id", 42u32);
	///
	/// assert_eq!(attributes.get::<u32>("request_id"), Some(42));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&self, name: impl Into<String>, value: T) {
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.insert(name.into(), Box::new(value));
	}

	/// Get a cloned value stored under `name`
	///
	/// Returns `None` when nothing is stored under `name` or the stored value
	/// is not a `T`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::Attributes;
	///
	/// let attributes = Attributes::new();
	/// attributes.insert("user", "alice".to_string());
	///
	/// assert_eq!(attributes.get::<String>("user"), Some("alice".to_string()));
	/// assert_eq!(attributes.get::<u32>("user"), None);
	/// ```
	pub fn get<T>(&self, name: &str) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.get(name)
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	/// Check if anything is stored under `name`
	pub fn contains(&self, name: &str) -> bool {
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.contains_key(name)
	}

	/// Remove the value stored under `name` and return it
	///
	/// A value of a different type is left in place.
	pub fn remove<T>(&self, name: &str) -> Option<T>
	where
		T: Send + Sync + 'static,
	{
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		let boxed = map.remove(name)?;
		match boxed.downcast::<T>() {
			Ok(value) => Some(*value),
			Err(boxed) => {
				map.insert(name.to_string(), boxed);
				None
			}
		}
	}

	/// Names of all stored attributes, sorted
	pub fn names(&self) -> Vec<String> {
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		let mut names: Vec<String> = map.keys().cloned().collect();
		names.sort();
		names
	}
}

impl fmt::Debug for Attributes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Attributes")
			.field("names", &self.names())
			.finish()
	}
}
