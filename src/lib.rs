//! # Reinhardt Flash
//!
//! Session-backed flash messages: short notices such as "Profile saved" that
//! are written on one request and read on a later one.
//!
//! A message is scheduled with a hop count. Every time a message store is
//! built from the session, each scheduled message surfaces for that request
//! and its hop count goes down by one; messages that run out of hops are
//! removed from the session.
//!
//! ## Feature Flags
//!
//! - `middleware` (default) - HTTP middleware that attaches a store to every
//!   request, plus the implementation registry and TOML configuration
//!
//! Without `middleware`, only the store engine from
//! [`reinhardt-flash-core`](reinhardt_flash_core) is available.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reinhardt_flash::prelude::*;
//!
//! let session: SessionHandle = Arc::new(SessionData::new());
//!
//! // Request 1: schedule a message for the next request
//! let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT)?;
//! flash.flash("success", "Profile saved")?;
//! assert!(flash.get_flash("success").is_empty());
//!
//! // Request 2: the message surfaces
//! let flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT)?;
//! assert_eq!(flash.get_flash("success"), vec!["Profile saved".to_string()]);
//!
//! // Request 3: it is gone
//! let flash = FlashMessages::create_from_session(session, FLASH_NEXT)?;
//! assert!(flash.get_flashes().is_empty());
//! # Ok::<(), reinhardt_flash::FlashError>(())
//! ```

pub use reinhardt_flash_core as engine;
#[cfg(feature = "middleware")]
pub use reinhardt_flash_middleware as middleware;

pub use reinhardt_flash_core::{
	DEFAULT_HOPS, DEFAULT_NOW_HOPS, FLASH_NEXT, FlashError, FlashMessages, MessageStore, Session,
	SessionData, SessionHandle, StoredEntry, StoredMessages,
};

#[cfg(feature = "middleware")]
pub use reinhardt_flash_middleware::{
	DEFAULT_IMPLEMENTATION, FLASH_ATTRIBUTE, FlashConfig, FlashContainer, FlashMessageMiddleware,
	LEGACY_IMPLEMENTATION_ALIAS, MessageStoreRegistry, SESSION_ATTRIBUTE,
};

/// Commonly used types
pub mod prelude {
	pub use reinhardt_flash_core::prelude::*;

	#[cfg(feature = "middleware")]
	pub use reinhardt_flash_middleware::{
		FlashConfig, FlashContainer, FlashMessageMiddleware, Handler, Middleware, MiddlewareChain,
		MessageStoreRegistry, Request, Response,
	};
}
