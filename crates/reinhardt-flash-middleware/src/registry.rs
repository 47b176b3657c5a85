//! Message store implementation registry
//!
//! Maps configuration names to store factories so that the implementation
//! used by [`FlashMessageMiddleware`](crate::FlashMessageMiddleware) can be
//! chosen from settings.

use reinhardt_flash_core::{FlashMessages, MessageStore, Result as FlashResult, SessionHandle};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the bundled [`FlashMessages`] implementation
pub const DEFAULT_IMPLEMENTATION: &str = "flash_messages";

/// Legacy name kept as an alias of [`DEFAULT_IMPLEMENTATION`]
pub const LEGACY_IMPLEMENTATION_ALIAS: &str = "default";

/// Builds a boxed store from a session and the session key to persist under
pub type MessageStoreFactory =
	Arc<dyn Fn(SessionHandle, &str) -> FlashResult<Box<dyn MessageStore>> + Send + Sync>;

fn create_store<S>(session: SessionHandle, session_key: &str) -> FlashResult<Box<dyn MessageStore>>
where
	S: MessageStore + 'static,
{
	let store = S::create_from_session(session, session_key)?;
	Ok(Box::new(store))
}

/// Factory for any [`MessageStore`] implementation
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_flash_core::{FlashMessages, MessageStore, SessionData, FLASH_NEXT};
/// use reinhardt_flash_middleware::factory_for;
///
/// let factory = factory_for::<FlashMessages>();
/// let store = factory(Arc::new(SessionData::new()), FLASH_NEXT).unwrap();
/// assert!(store.get_flashes().is_empty());
/// ```
pub fn factory_for<S>() -> MessageStoreFactory
where
	S: MessageStore + 'static,
{
	Arc::new(create_store::<S>)
}

/// Registry of named message store implementations
///
/// # Examples
///
/// ```
/// use reinhardt_flash_middleware::{MessageStoreRegistry, DEFAULT_IMPLEMENTATION};
///
/// let registry = MessageStoreRegistry::with_defaults();
/// assert!(registry.contains(DEFAULT_IMPLEMENTATION));
/// assert!(registry.contains("default"));
/// assert!(!registry.contains("cookie"));
/// ```
#[derive(Clone, Default)]
pub struct MessageStoreRegistry {
	factories: HashMap<String, MessageStoreFactory>,
	aliases: HashMap<String, String>,
}

impl MessageStoreRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a registry that knows the bundled [`FlashMessages`]
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		registry
			.register::<FlashMessages>(DEFAULT_IMPLEMENTATION)
			.alias(LEGACY_IMPLEMENTATION_ALIAS, DEFAULT_IMPLEMENTATION);
		registry
	}

	/// Register `S` under `name`
	pub fn register<S>(&mut self, name: impl Into<String>) -> &mut Self
	where
		S: MessageStore + 'static,
	{
		self.register_factory(name, factory_for::<S>())
	}

	/// Register a custom factory under `name`
	pub fn register_factory(
		&mut self,
		name: impl Into<String>,
		factory: MessageStoreFactory,
	) -> &mut Self {
		self.factories.insert(name.into(), factory);
		self
	}

	/// Make `alias` resolve to whatever `target` resolves to
	pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) -> &mut Self {
		self.aliases.insert(alias.into(), target.into());
		self
	}

	/// Look up the factory registered under `name` or one of its aliases
	pub fn resolve(&self, name: &str) -> Option<MessageStoreFactory> {
		if let Some(factory) = self.factories.get(name) {
			return Some(factory.clone());
		}
		self.aliases
			.get(name)
			.and_then(|target| self.factories.get(target))
			.cloned()
	}

	/// Check if `name` resolves to a factory
	pub fn contains(&self, name: &str) -> bool {
		self.resolve(name).is_some()
	}

	/// Registered implementation names and aliases, sorted
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self
			.factories
			.keys()
			.chain(self.aliases.keys())
			.cloned()
			.collect();
		names.sort();
		names
	}
}

impl fmt::Debug for MessageStoreRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageStoreRegistry")
			.field("names", &self.names())
			.finish()
	}
}
