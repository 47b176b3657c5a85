//! HTTP request representation used by the flash middleware

use crate::attributes::Attributes;
use crate::exception::{Error, Result};
use crate::flash::{FLASH_ATTRIBUTE, FlashContainer};
use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use reinhardt_flash_core::SessionHandle;

/// Attribute name the session layer publishes the session under
pub const SESSION_ATTRIBUTE: &str = "session";

/// HTTP request with named attributes
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub attributes: Attributes,
}

impl Request {
	/// Create a new request
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/inbox"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.uri.path(), "/inbox");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			attributes: Attributes::new(),
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Attach a value under `name`
	pub fn with_attribute<T: Send + Sync + 'static>(self, name: impl Into<String>, value: T) -> Self {
		self.attributes.insert(name, value);
		self
	}

	/// Attach a session under [`SESSION_ATTRIBUTE`]
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use reinhardt_flash_core::{SessionData, SessionHandle};
	/// use reinhardt_flash_middleware::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let session: SessionHandle = Arc::new(SessionData::new());
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// )
	/// .with_session(session);
	///
	/// assert!(request.session().is_some());
	/// ```
	pub fn with_session(self, session: SessionHandle) -> Self {
		self.with_attribute(SESSION_ATTRIBUTE, session)
	}

	/// Get a cloned attribute value
	pub fn attribute<T>(&self, name: &str) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.attributes.get(name)
	}

	/// Session attached by the session layer, if any
	pub fn session(&self) -> Option<SessionHandle> {
		self.attribute(SESSION_ATTRIBUTE)
	}

	/// Flash messages attached under the default [`FLASH_ATTRIBUTE`]
	pub fn flash(&self) -> Option<FlashContainer> {
		self.flash_at(FLASH_ATTRIBUTE)
	}

	/// Flash messages attached under a custom attribute name
	pub fn flash_at(&self, name: &str) -> Option<FlashContainer> {
		self.attribute(name)
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	/// Set the method
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the URI
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Set the HTTP version
	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Set the headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Set the body
	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidRequest`] when the URI does not parse.
	pub fn build(self) -> Result<Request> {
		let uri = match self.uri {
			Some(uri) => uri
				.parse::<Uri>()
				.map_err(|e| Error::InvalidRequest(format!("invalid URI {:?}: {}", uri, e)))?,
			None => Uri::from_static("/"),
		};

		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}
