//! Message store capability
//!
//! [`MessageStore`] is the contract every flash message implementation
//! fulfils. The middleware only ever talks to stores through this trait, so
//! a custom implementation can be swapped in at configuration time.

use crate::exception::Result;
use crate::session::SessionHandle;
use std::collections::BTreeMap;

/// Default session key under which scheduled messages are persisted
pub const FLASH_NEXT: &str = "reinhardt_flash::FLASH_NEXT";

/// Hops used by [`MessageStore::flash`]
pub const DEFAULT_HOPS: i64 = 1;

/// Hops used by [`MessageStore::flash_now`]
pub const DEFAULT_NOW_HOPS: i64 = 0;

/// Create, retrieve and manipulate flash messages for one request
///
/// A store is built once per request from the session. Building it expires
/// and surfaces whatever earlier requests scheduled; the surfaced values are
/// the store's "current" messages.
pub trait MessageStore: Send {
	/// Create a store from a session, persisting under `session_key`
	fn create_from_session(session: SessionHandle, session_key: &str) -> Result<Self>
	where
		Self: Sized;

	/// Schedule `value` under `key` for the next `hops` requests
	///
	/// The value is not visible through [`get_flash`](Self::get_flash) in the
	/// current request.
	///
	/// # Errors
	///
	/// Returns [`FlashError::InvalidHopsValue`](crate::FlashError::InvalidHopsValue)
	/// when `hops < 1`.
	fn flash_for(&mut self, key: &str, value: &str, hops: i64) -> Result<()>;

	/// Schedule `value` under `key` for the next request
	fn flash(&mut self, key: &str, value: &str) -> Result<()> {
		self.flash_for(key, value, DEFAULT_HOPS)
	}

	/// Make `value` visible in the current request
	///
	/// A positive `hops` additionally schedules it for that many following
	/// requests.
	fn flash_now_for(&mut self, key: &str, value: &str, hops: i64) -> Result<()>;

	/// Make `value` visible in the current request only
	fn flash_now(&mut self, key: &str, value: &str) -> Result<()> {
		self.flash_now_for(key, value, DEFAULT_NOW_HOPS)
	}

	/// Current values for `key`, or an empty list
	fn get_flash(&self, key: &str) -> Vec<String> {
		self.get_flash_or(key, Vec::new())
	}

	/// Current values for `key`, or `default`
	fn get_flash_or(&self, key: &str, default: Vec<String>) -> Vec<String>;

	/// All current values, keyed
	fn get_flashes(&self) -> BTreeMap<String, Vec<String>>;

	/// Discard every scheduled message
	///
	/// Affects the next and subsequent requests only.
	fn clear_flash(&mut self);

	/// Keep messages that expire with this request for one more hop
	fn prolong_flash(&mut self) -> Result<()>;
}
