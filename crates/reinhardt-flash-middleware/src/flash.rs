//! Flash message middleware
//!
//! Builds a [`MessageStore`] from the request session and hands it to the
//! rest of the chain as a [`FlashContainer`] attribute.

use async_trait::async_trait;
use reinhardt_flash_core::{
	FLASH_NEXT, FlashError, FlashMessages, MessageStore, Result as FlashResult,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

use crate::config::FlashConfig;
use crate::exception::Result;
use crate::handler::{Handler, Middleware};
use crate::registry::{DEFAULT_IMPLEMENTATION, MessageStoreFactory, MessageStoreRegistry, factory_for};
use crate::request::Request;
use crate::response::Response;

/// Default request attribute the flash container is published under
pub const FLASH_ATTRIBUTE: &str = "flash";

const MIDDLEWARE_NAME: &str = "FlashMessageMiddleware";

/// Container for the request's message store
///
/// Cloning a container yields another handle to the same store, so handlers
/// can mutate it through the copy they get from the request attributes.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use reinhardt_flash_core::{FlashMessages, MessageStore, SessionData, FLASH_NEXT};
/// use reinhardt_flash_middleware::FlashContainer;
///
/// let store = FlashMessages::create_from_session(Arc::new(SessionData::new()), FLASH_NEXT).unwrap();
/// let container = FlashContainer::new(Box::new(store));
///
/// container.flash_now("info", "Hello").unwrap();
/// assert_eq!(container.get_flash("info"), vec!["Hello".to_string()]);
/// ```
#[derive(Clone)]
pub struct FlashContainer {
	store: Arc<Mutex<Box<dyn MessageStore>>>,
}

impl FlashContainer {
	/// Wrap a store
	pub fn new(store: Box<dyn MessageStore>) -> Self {
		Self {
			store: Arc::new(Mutex::new(store)),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Box<dyn MessageStore>> {
		self.store.lock().unwrap_or_else(|e| e.into_inner())
	}

	/// Run `f` with exclusive access to the underlying store
	pub fn with_store<R>(&self, f: impl FnOnce(&mut dyn MessageStore) -> R) -> R {
		let mut store = self.lock();
		f(store.as_mut())
	}

	/// See [`MessageStore::flash`]
	pub fn flash(&self, key: &str, value: &str) -> FlashResult<()> {
		self.lock().flash(key, value)
	}

	/// See [`MessageStore::flash_for`]
	pub fn flash_for(&self, key: &str, value: &str, hops: i64) -> FlashResult<()> {
		self.lock().flash_for(key, value, hops)
	}

	/// See [`MessageStore::flash_now`]
	pub fn flash_now(&self, key: &str, value: &str) -> FlashResult<()> {
		self.lock().flash_now(key, value)
	}

	/// See [`MessageStore::flash_now_for`]
	pub fn flash_now_for(&self, key: &str, value: &str, hops: i64) -> FlashResult<()> {
		self.lock().flash_now_for(key, value, hops)
	}

	/// See [`MessageStore::get_flash`]
	pub fn get_flash(&self, key: &str) -> Vec<String> {
		self.lock().get_flash(key)
	}

	/// See [`MessageStore::get_flash_or`]
	pub fn get_flash_or(&self, key: &str, default: Vec<String>) -> Vec<String> {
		self.lock().get_flash_or(key, default)
	}

	/// See [`MessageStore::get_flashes`]
	pub fn get_flashes(&self) -> BTreeMap<String, Vec<String>> {
		self.lock().get_flashes()
	}

	/// See [`MessageStore::clear_flash`]
	pub fn clear_flash(&self) {
		self.lock().clear_flash()
	}

	/// See [`MessageStore::prolong_flash`]
	pub fn prolong_flash(&self) -> FlashResult<()> {
		self.lock().prolong_flash()
	}
}

impl fmt::Debug for FlashContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlashContainer")
			.field("current", &self.get_flashes())
			.finish()
	}
}

/// Flash message middleware
///
/// Requires a session attached under
/// [`SESSION_ATTRIBUTE`](crate::SESSION_ATTRIBUTE) by an earlier layer.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_flash_core::{SessionData, SessionHandle};
/// use reinhardt_flash_middleware::{
///     FlashMessageMiddleware, Handler, Middleware, Request, Response, Result,
/// };
///
/// struct Inbox;
///
/// #[async_trait::async_trait]
/// impl Handler for Inbox {
///     async fn handle(&self, request: Request) -> Result<Response> {
///         let flash = request.flash().unwrap();
///         Ok(Response::ok().with_body(flash.get_flash("info").join(",")))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let session: SessionHandle = Arc::new(SessionData::new());
/// let middleware = FlashMessageMiddleware::new();
///
/// // A previous request scheduled a message
/// let stage = Request::builder().build().unwrap().with_session(session.clone());
/// struct Stage;
/// #[async_trait::async_trait]
/// impl Handler for Stage {
///     async fn handle(&self, request: Request) -> Result<Response> {
///         request.flash().unwrap().flash("info", "Welcome back")?;
///         Ok(Response::ok())
///     }
/// }
/// middleware.process(stage, Arc::new(Stage)).await.unwrap();
///
/// let request = Request::builder().build().unwrap().with_session(session);
/// let response = middleware.process(request, Arc::new(Inbox)).await.unwrap();
/// assert_eq!(response.body_text(), "Welcome back");
/// # });
/// ```
pub struct FlashMessageMiddleware {
	factory: MessageStoreFactory,
	implementation: String,
	session_key: String,
	attribute_key: String,
}

impl FlashMessageMiddleware {
	/// Create a middleware backed by [`FlashMessages`] with default keys
	pub fn new() -> Self {
		Self::with_store::<FlashMessages>()
			.with_implementation_name(DEFAULT_IMPLEMENTATION)
	}

	/// Create a middleware backed by the store type `S`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::FlashMessages;
	/// use reinhardt_flash_middleware::FlashMessageMiddleware;
	///
	/// let middleware = FlashMessageMiddleware::with_store::<FlashMessages>()
	///     .with_attribute_key("notices");
	/// assert_eq!(middleware.attribute_key(), "notices");
	/// ```
	pub fn with_store<S>() -> Self
	where
		S: MessageStore + 'static,
	{
		Self {
			factory: factory_for::<S>(),
			implementation: std::any::type_name::<S>().to_string(),
			session_key: FLASH_NEXT.to_string(),
			attribute_key: FLASH_ATTRIBUTE.to_string(),
		}
	}

	/// Create a middleware from configuration, resolving the implementation
	/// through `registry`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::{FlashConfig, FlashMessageMiddleware, MessageStoreRegistry};
	///
	/// let registry = MessageStoreRegistry::with_defaults();
	///
	/// let config = FlashConfig::new().with_session_key("notices");
	/// let middleware = FlashMessageMiddleware::from_config(&config, &registry).unwrap();
	/// assert_eq!(middleware.session_key(), "notices");
	///
	/// let config = FlashConfig::new().with_implementation("missing");
	/// assert!(FlashMessageMiddleware::from_config(&config, &registry).is_err());
	/// ```
	///
	/// # Errors
	///
	/// Returns [`FlashError::InvalidMessageStoreImplementation`] when the
	/// configured implementation is not registered.
	pub fn from_config(config: &FlashConfig, registry: &MessageStoreRegistry) -> FlashResult<Self> {
		let factory = registry.resolve(&config.implementation).ok_or_else(|| {
			FlashError::invalid_implementation(&config.implementation, MIDDLEWARE_NAME)
		})?;

		Ok(Self {
			factory,
			implementation: config.implementation.clone(),
			session_key: config.session_key.clone(),
			attribute_key: config.attribute_key.clone(),
		})
	}

	fn with_implementation_name(mut self, implementation: &str) -> Self {
		self.implementation = implementation.to_string();
		self
	}

	/// Set the session key scheduled messages are persisted under
	pub fn with_session_key(mut self, session_key: impl Into<String>) -> Self {
		self.session_key = session_key.into();
		self
	}

	/// Set the request attribute the container is published under
	pub fn with_attribute_key(mut self, attribute_key: impl Into<String>) -> Self {
		self.attribute_key = attribute_key.into();
		self
	}

	/// Name of the store implementation in use
	pub fn implementation(&self) -> &str {
		&self.implementation
	}

	/// Session key scheduled messages are persisted under
	pub fn session_key(&self) -> &str {
		&self.session_key
	}

	/// Request attribute the container is published under
	pub fn attribute_key(&self) -> &str {
		&self.attribute_key
	}
}

impl Default for FlashMessageMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for FlashMessageMiddleware {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlashMessageMiddleware")
			.field("implementation", &self.implementation)
			.field("session_key", &self.session_key)
			.field("attribute_key", &self.attribute_key)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl Middleware for FlashMessageMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let session = request
			.session()
			.ok_or_else(|| FlashError::missing_session(MIDDLEWARE_NAME))?;

		let store = (self.factory)(session, &self.session_key)?;
		request
			.attributes
			.insert(self.attribute_key.clone(), FlashContainer::new(store));

		trace!(
			uri = %request.uri,
			attribute = %self.attribute_key,
			"attached flash messages"
		);

		next.handle(request).await
	}
}
