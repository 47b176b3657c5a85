//! Flash message middleware for Reinhardt
//!
//! Wires the flash message engine from `reinhardt-flash-core` into the
//! request pipeline. For every request, [`FlashMessageMiddleware`] resolves
//! the session attached by the session layer, builds a
//! [`MessageStore`](reinhardt_flash_core::MessageStore) from it and exposes
//! the store to handlers as a [`FlashContainer`] request attribute.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use hyper::{HeaderMap, Method, StatusCode, Version};
//! use reinhardt_flash_core::{SessionData, SessionHandle};
//! use reinhardt_flash_middleware::{
//!     FlashMessageMiddleware, Handler, Middleware, Request, Response, Result,
//! };
//!
//! struct SaveProfile;
//!
//! #[async_trait]
//! impl Handler for SaveProfile {
//!     async fn handle(&self, request: Request) -> Result<Response> {
//!         let flash = request.flash().expect("flash middleware is installed");
//!         flash.flash("success", "Profile saved")?;
//!         Ok(Response::new(StatusCode::SEE_OTHER))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let session: SessionHandle = Arc::new(SessionData::new());
//! let middleware = FlashMessageMiddleware::new();
//!
//! let request = Request::builder()
//!     .method(Method::POST)
//!     .uri("/profile")
//!     .version(Version::HTTP_11)
//!     .headers(HeaderMap::new())
//!     .body(Bytes::new())
//!     .build()
//!     .unwrap()
//!     .with_session(session.clone());
//!
//! let response = middleware.process(request, Arc::new(SaveProfile)).await.unwrap();
//! assert_eq!(response.status, StatusCode::SEE_OTHER);
//! # });
//! ```

pub mod attributes;
pub mod config;
pub mod exception;
pub mod flash;
pub mod handler;
pub mod registry;
pub mod request;
pub mod response;

pub use attributes::Attributes;
pub use config::FlashConfig;
pub use exception::{Error, Result};
pub use flash::{FLASH_ATTRIBUTE, FlashContainer, FlashMessageMiddleware};
pub use handler::{Handler, Middleware, MiddlewareChain};
pub use registry::{
	DEFAULT_IMPLEMENTATION, LEGACY_IMPLEMENTATION_ALIAS, MessageStoreFactory,
	MessageStoreRegistry, factory_for,
};
pub use request::{Request, RequestBuilder, SESSION_ATTRIBUTE};
pub use response::Response;
