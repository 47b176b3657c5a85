//! Flash message framework for Reinhardt
//!
//! This crate provides session-backed "flash" messages: short-lived notices
//! that stay visible for a configurable number of subsequent requests.
//!
//! ## Features
//!
//! - **Hop-based lifecycle**: Each staged message carries a hop count that is
//!   decremented every time a store is built from the session
//! - **Pluggable stores**: Any type implementing [`MessageStore`] can replace
//!   the bundled [`FlashMessages`] engine
//! - **Session capability**: Works against any [`Session`] implementation;
//!   [`SessionData`] is provided as an in-memory backend
//!
//! ## Note
//!
//! HTTP middleware integration (`FlashMessageMiddleware`) lives in the
//! `reinhardt-flash-middleware` crate.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_flash_core::{FlashMessages, MessageStore, SessionData, FLASH_NEXT};
//! use std::sync::Arc;
//!
//! let session = Arc::new(SessionData::new());
//!
//! // Request 1: stage a message for the next request
//! let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();
//! flash.flash("info", "Profile saved").unwrap();
//! assert!(flash.get_flash("info").is_empty());
//!
//! // Request 2: the message is visible
//! let flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();
//! assert_eq!(flash.get_flash("info"), vec!["Profile saved".to_string()]);
//! ```

pub mod exception;
pub mod messages;
pub mod session;
pub mod store;

pub use exception::{FlashError, Result};
pub use messages::{FlashMessages, StoredEntry, StoredMessages};
pub use session::{Session, SessionData, SessionHandle};
pub use store::{DEFAULT_HOPS, DEFAULT_NOW_HOPS, FLASH_NEXT, MessageStore};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::exception::*;
	pub use crate::messages::*;
	pub use crate::session::*;
	pub use crate::store::*;
}
