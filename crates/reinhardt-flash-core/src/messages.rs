//! Session-backed flash messages
//!
//! Scheduled messages live in the session under a single key as a mapping of
//! message key to a list of `{value, hops}` entries, oldest first:
//!
//! ```json
//! {"info": [{"value": "Profile saved", "hops": 1}]}
//! ```
//!
//! Building a [`FlashMessages`] from the session runs one expiry cycle:
//! every entry surfaces as a current message and loses one hop, and entries
//! that run out of hops are dropped from the session. A message flashed with
//! `hops = N` is therefore visible in each of the next `N` requests.

use crate::exception::{FlashError, Result};
use crate::session::SessionHandle;
use crate::store::MessageStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// One scheduled appearance of a message value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
	pub value: String,
	pub hops: u64,
}

impl StoredEntry {
	/// Create a new entry
	pub fn new(value: impl Into<String>, hops: u64) -> Self {
		Self {
			value: value.into(),
			hops,
		}
	}
}

/// Persisted layout of scheduled messages
pub type StoredMessages = BTreeMap<String, Vec<StoredEntry>>;

/// A value visible in the current request, with the hops it still had
/// scheduled in the session when it surfaced
#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentEntry {
	value: String,
	remaining: u64,
}

/// Create, retrieve and manipulate flash messages
///
/// On creation, pulls and expires existing messages from the session based
/// on their remaining hops; surfaced messages are then available through
/// [`get_flash`](MessageStore::get_flash).
///
/// [`flash`](MessageStore::flash) makes a message available on the next
/// request. Use [`flash_now`](MessageStore::flash_now) to also see it in the
/// current one, and [`prolong_flash`](MessageStore::prolong_flash) to keep
/// current messages around for another hop.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::{FlashMessages, MessageStore, Session, SessionData, FLASH_NEXT};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let session = Arc::new(SessionData::new());
/// let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();
/// flash.flash("info", "saved").unwrap();
///
/// assert_eq!(
///     session.get(FLASH_NEXT),
///     Some(json!({"info": [{"value": "saved", "hops": 1}]}))
/// );
///
/// let next = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();
/// assert_eq!(next.get_flash("info"), vec!["saved".to_string()]);
/// assert!(!session.has(FLASH_NEXT));
/// ```
pub struct FlashMessages {
	session: SessionHandle,
	session_key: String,
	current: BTreeMap<String, Vec<CurrentEntry>>,
}

impl FlashMessages {
	fn new(session: SessionHandle, session_key: &str) -> Result<Self> {
		let mut flash = Self {
			session,
			session_key: session_key.to_string(),
			current: BTreeMap::new(),
		};
		flash.prepare_messages()?;
		Ok(flash)
	}

	/// Session key scheduled messages are persisted under
	pub fn session_key(&self) -> &str {
		&self.session_key
	}

	/// Check if `key` has current values
	pub fn has_flash(&self, key: &str) -> bool {
		self.current.contains_key(key)
	}

	/// Check if there are no current values at all
	pub fn is_empty(&self) -> bool {
		self.current.is_empty()
	}

	fn prepare_messages(&mut self) -> Result<()> {
		if !self.session.has(&self.session_key) {
			return Ok(());
		}

		let stored = self.stored_messages()?;
		let mut pending = StoredMessages::new();

		for (key, entries) in stored {
			if entries.is_empty() {
				continue;
			}

			let current = self.current.entry(key.clone()).or_default();
			let mut kept = Vec::with_capacity(entries.len());

			for mut entry in entries {
				entry.hops = entry.hops.saturating_sub(1);
				current.push(CurrentEntry {
					value: entry.value.clone(),
					remaining: entry.hops,
				});

				if entry.hops > 0 {
					kept.push(entry);
				}
			}

			if !kept.is_empty() {
				pending.insert(key, kept);
			}
		}

		debug!(
			session_key = %self.session_key,
			surfaced = self.current.len(),
			pending = pending.len(),
			"expired flash messages"
		);

		self.persist(&pending)
	}

	/// Fresh read of the scheduled messages from the session
	fn stored_messages(&self) -> Result<StoredMessages> {
		match self.session.get_or(&self.session_key, Value::Null) {
			Value::Null => Ok(StoredMessages::new()),
			value => serde_json::from_value(value).map_err(|e| {
				warn!(
					session_key = %self.session_key,
					error = %e,
					"stored flash messages are malformed"
				);
				FlashError::from(e)
			}),
		}
	}

	fn persist(&self, messages: &StoredMessages) -> Result<()> {
		if messages.is_empty() {
			self.session.unset(&self.session_key);
		} else {
			self.session
				.set(&self.session_key, serde_json::to_value(messages)?);
		}
		Ok(())
	}
}

impl fmt::Debug for FlashMessages {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlashMessages")
			.field("session_key", &self.session_key)
			.field("current", &self.current)
			.finish_non_exhaustive()
	}
}

impl MessageStore for FlashMessages {
	fn create_from_session(session: SessionHandle, session_key: &str) -> Result<Self> {
		Self::new(session, session_key)
	}

	fn flash_for(&mut self, key: &str, value: &str, hops: i64) -> Result<()> {
		if hops < 1 {
			return Err(FlashError::invalid_hops(key, hops));
		}

		let mut messages = self.stored_messages()?;
		messages
			.entry(key.to_string())
			.or_default()
			.push(StoredEntry::new(value, hops.unsigned_abs()));
		self.persist(&messages)?;

		debug!(key, hops, "scheduled flash message");
		Ok(())
	}

	fn flash_now_for(&mut self, key: &str, value: &str, hops: i64) -> Result<()> {
		if hops > 0 {
			self.flash_for(key, value, hops)?;
		}

		self.current
			.entry(key.to_string())
			.or_default()
			.push(CurrentEntry {
				value: value.to_string(),
				remaining: hops.max(0).unsigned_abs(),
			});
		Ok(())
	}

	fn get_flash_or(&self, key: &str, default: Vec<String>) -> Vec<String> {
		match self.current.get(key) {
			Some(entries) => entries.iter().map(|e| e.value.clone()).collect(),
			None => default,
		}
	}

	fn get_flashes(&self) -> BTreeMap<String, Vec<String>> {
		self.current
			.iter()
			.map(|(key, entries)| {
				(
					key.clone(),
					entries.iter().map(|e| e.value.clone()).collect(),
				)
			})
			.collect()
	}

	fn clear_flash(&mut self) {
		self.session.unset(&self.session_key);
	}

	fn prolong_flash(&mut self) -> Result<()> {
		let expiring: Vec<(&String, &CurrentEntry)> = self
			.current
			.iter()
			.flat_map(|(key, entries)| entries.iter().map(move |entry| (key, entry)))
			.filter(|(_, entry)| entry.remaining == 0)
			.collect();

		if expiring.is_empty() {
			return Ok(());
		}

		let mut messages = self.stored_messages()?;
		for (key, entry) in &expiring {
			messages
				.entry((*key).clone())
				.or_default()
				.push(StoredEntry::new(entry.value.clone(), 1));
		}
		let prolonged = expiring.len();
		self.persist(&messages)?;

		for entry in self.current.values_mut().flatten() {
			if entry.remaining == 0 {
				entry.remaining = 1;
			}
		}

		debug!(prolonged, "prolonged flash messages");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{Session, SessionData};
	use crate::store::FLASH_NEXT;
	use mockall::{Sequence, mock};
	use rstest::rstest;
	use serde_json::json;
	use std::sync::Arc;

	mock! {
		pub SessionBackend {}

		impl Session for SessionBackend {
			fn has(&self, key: &str) -> bool;
			fn get(&self, key: &str) -> Option<Value>;
			fn set(&self, key: &str, value: Value);
			fn unset(&self, key: &str);
		}
	}

	fn into_handle(session: MockSessionBackend) -> SessionHandle {
		Arc::new(session)
	}

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[rstest]
	fn test_creation_aggregates_nothing_without_stored_messages() {
		let mut session = MockSessionBackend::new();
		session
			.expect_has()
			.withf(|key| key == FLASH_NEXT)
			.times(1)
			.return_const(false);
		session.expect_get().never();
		session.expect_set().never();
		session.expect_unset().never();

		let flash = FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();

		assert!(flash.get_flashes().is_empty());
		assert!(flash.is_empty());
	}

	#[rstest]
	fn test_creation_surfaces_last_hop_and_removes_session_key() {
		let stored = json!({
			"test": [{"value": "value1", "hops": 1}],
			"test-2": [{"value": "value2", "hops": 1}],
		});

		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(true);
		session
			.expect_get()
			.withf(|key| key == FLASH_NEXT)
			.times(1)
			.returning(move |_| Some(stored.clone()));
		session.expect_set().never();
		session
			.expect_unset()
			.withf(|key| key == FLASH_NEXT)
			.times(1)
			.return_const(());

		let flash = FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();

		assert_eq!(flash.get_flash("test"), strings(&["value1"]));
		assert_eq!(flash.get_flash("test-2"), strings(&["value2"]));
		assert_eq!(flash.get_flashes().len(), 2);
	}

	#[rstest]
	fn test_creation_persists_multi_hop_entries_with_decremented_hops() {
		let stored = json!({
			"test": [{"value": "value1", "hops": 3}],
			"test-2": [{"value": "value2", "hops": 2}],
		});
		let expected = json!({
			"test": [{"value": "value1", "hops": 2}],
			"test-2": [{"value": "value2", "hops": 1}],
		});

		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(true);
		session
			.expect_get()
			.times(1)
			.returning(move |_| Some(stored.clone()));
		session
			.expect_set()
			.withf(move |key, value| key == FLASH_NEXT && value == &expected)
			.times(1)
			.return_const(());
		session.expect_unset().never();

		let flash = FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();

		assert_eq!(flash.get_flash("test"), strings(&["value1"]));
		assert_eq!(flash.get_flash("test-2"), strings(&["value2"]));
	}

	#[rstest]
	fn test_creation_strips_entries_already_at_zero_hops() {
		let session = Arc::new(SessionData::new());
		session.set(
			FLASH_NEXT,
			json!({
				"notice": [
					{"value": "legacy", "hops": 0},
					{"value": "fresh", "hops": 2},
				],
			}),
		);

		let flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();

		assert_eq!(flash.get_flash("notice"), strings(&["legacy", "fresh"]));
		assert_eq!(
			session.get(FLASH_NEXT),
			Some(json!({"notice": [{"value": "fresh", "hops": 1}]}))
		);
	}

	#[rstest]
	fn test_creation_with_empty_or_null_mapping_unsets_key() {
		for stored in [json!({}), json!({"info": []}), Value::Null] {
			let session = Arc::new(SessionData::new());
			session.set(FLASH_NEXT, stored);

			let flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();

			assert!(flash.is_empty());
			assert!(!session.has(FLASH_NEXT));
		}
	}

	#[rstest]
	fn test_creation_rejects_malformed_session_data() {
		let session = Arc::new(SessionData::new());
		session.set(FLASH_NEXT, json!({"info": "not a list"}));

		let result = FlashMessages::create_from_session(session.clone(), FLASH_NEXT);

		assert!(matches!(result, Err(FlashError::Serialization(_))));
		assert_eq!(
			session.get(FLASH_NEXT),
			Some(json!({"info": "not a list"}))
		);
	}

	#[rstest]
	fn test_flash_stages_for_next_request_only() {
		let expected = json!({"test": [{"value": "value", "hops": 1}]});

		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(false);
		session
			.expect_get()
			.withf(|key| key == FLASH_NEXT)
			.times(1)
			.returning(|_| None);
		session
			.expect_set()
			.withf(move |key, value| key == FLASH_NEXT && value == &expected)
			.times(1)
			.return_const(());

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		flash.flash("test", "value").unwrap();

		assert!(flash.get_flash("test").is_empty());
		assert!(flash.get_flashes().is_empty());
	}

	#[rstest]
	fn test_flash_appends_to_existing_entries() {
		let session = Arc::new(SessionData::new());
		let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();

		flash.flash("info", "first").unwrap();
		flash.flash_for("info", "second", 3).unwrap();
		flash.flash("error", "oops").unwrap();

		assert_eq!(
			session.get(FLASH_NEXT),
			Some(json!({
				"error": [{"value": "oops", "hops": 1}],
				"info": [
					{"value": "first", "hops": 1},
					{"value": "second", "hops": 3},
				],
			}))
		);
	}

	#[rstest]
	#[case(0)]
	#[case(-1)]
	#[case(i64::MIN)]
	fn test_flash_rejects_hops_below_one(#[case] hops: i64) {
		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(false);
		session.expect_get().never();
		session.expect_set().never();
		session.expect_unset().never();

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		let err = flash.flash_for("test", "value", hops).unwrap_err();

		assert_eq!(err, FlashError::invalid_hops("test", hops));
		assert!(flash.is_empty());
	}

	#[rstest]
	fn test_flash_now_is_current_only_by_default() {
		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(false);
		session.expect_get().never();
		session.expect_set().never();

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		flash.flash_now("test", "value").unwrap();

		assert_eq!(flash.get_flash("test"), strings(&["value"]));
		assert_eq!(
			flash.get_flashes(),
			BTreeMap::from([("test".to_string(), strings(&["value"]))])
		);
	}

	#[rstest]
	fn test_flash_now_with_hops_also_schedules() {
		let expected = json!({"test": [{"value": "value", "hops": 1}]});

		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(false);
		session.expect_get().times(1).returning(|_| None);
		session
			.expect_set()
			.withf(move |key, value| key == FLASH_NEXT && value == &expected)
			.times(1)
			.return_const(());

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		flash.flash_now_for("test", "value", 1).unwrap();

		assert_eq!(flash.get_flash("test"), strings(&["value"]));
	}

	#[rstest]
	fn test_get_flash_or_returns_default() {
		let session = Arc::new(SessionData::new());
		let flash = FlashMessages::create_from_session(session, FLASH_NEXT).unwrap();

		assert_eq!(
			flash.get_flash_or("missing", strings(&["fallback"])),
			strings(&["fallback"])
		);
		assert!(!flash.has_flash("missing"));
	}

	#[rstest]
	fn test_prolong_flash_restages_expiring_messages_in_one_write() {
		let stored = json!({
			"test": [{"value": "value1", "hops": 1}],
			"test-2": [{"value": "value2", "hops": 1}],
		});
		let expected = json!({
			"test": [{"value": "value1", "hops": 1}],
			"test-2": [{"value": "value2", "hops": 1}],
		});

		let mut seq = Sequence::new();
		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(true);
		session
			.expect_get()
			.times(1)
			.in_sequence(&mut seq)
			.returning(move |_| Some(stored.clone()));
		session
			.expect_unset()
			.withf(|key| key == FLASH_NEXT)
			.times(1)
			.in_sequence(&mut seq)
			.return_const(());
		session
			.expect_get()
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_| None);
		session
			.expect_set()
			.withf(move |key, value| key == FLASH_NEXT && value == &expected)
			.times(1)
			.in_sequence(&mut seq)
			.return_const(());

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		assert_eq!(flash.get_flash("test"), strings(&["value1"]));
		assert_eq!(flash.get_flash("test-2"), strings(&["value2"]));

		flash.prolong_flash().unwrap();
	}

	#[rstest]
	fn test_prolong_flash_does_not_reflash_messages_with_more_hops() {
		let stored = json!({
			"test": [{"value": "value1", "hops": 3}],
			"test-2": [{"value": "value2", "hops": 2}],
		});

		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(true);
		session
			.expect_get()
			.times(1)
			.returning(move |_| Some(stored.clone()));
		// Only the write performed during creation
		session.expect_set().times(1).return_const(());
		session.expect_unset().never();

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		flash.prolong_flash().unwrap();
	}

	#[rstest]
	fn test_prolong_flash_twice_stages_once() {
		let session = Arc::new(SessionData::new());
		session.set(FLASH_NEXT, json!({"info": [{"value": "saved", "hops": 1}]}));

		let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();
		flash.prolong_flash().unwrap();
		flash.prolong_flash().unwrap();

		assert_eq!(
			session.get(FLASH_NEXT),
			Some(json!({"info": [{"value": "saved", "hops": 1}]}))
		);
	}

	#[rstest]
	fn test_prolong_flash_keeps_messages_flashed_in_same_request() {
		let session = Arc::new(SessionData::new());
		session.set(FLASH_NEXT, json!({"info": [{"value": "old", "hops": 1}]}));

		let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();
		flash.flash("info", "new").unwrap();
		flash.prolong_flash().unwrap();

		assert_eq!(
			session.get(FLASH_NEXT),
			Some(json!({
				"info": [
					{"value": "new", "hops": 1},
					{"value": "old", "hops": 1},
				],
			}))
		);
	}

	#[rstest]
	fn test_prolong_flash_skips_flash_now_with_hops() {
		let session = Arc::new(SessionData::new());
		let mut flash = FlashMessages::create_from_session(session.clone(), FLASH_NEXT).unwrap();

		flash.flash_now_for("info", "scheduled", 2).unwrap();
		flash.flash_now("info", "now-only").unwrap();
		flash.prolong_flash().unwrap();

		assert_eq!(
			session.get(FLASH_NEXT),
			Some(json!({
				"info": [
					{"value": "scheduled", "hops": 2},
					{"value": "now-only", "hops": 1},
				],
			}))
		);
	}

	#[rstest]
	fn test_clear_flash_removes_unexpired_messages() {
		let stored = json!({
			"test": [{"value": "value1", "hops": 3}],
			"test-2": [{"value": "value2", "hops": 2}],
		});

		let mut session = MockSessionBackend::new();
		session.expect_has().times(1).return_const(true);
		session
			.expect_get()
			.times(1)
			.returning(move |_| Some(stored.clone()));
		session.expect_set().times(1).return_const(());
		session
			.expect_unset()
			.withf(|key| key == FLASH_NEXT)
			.times(1)
			.return_const(());

		let mut flash =
			FlashMessages::create_from_session(into_handle(session), FLASH_NEXT).unwrap();
		flash.clear_flash();

		// Current messages are untouched
		assert_eq!(flash.get_flash("test"), strings(&["value1"]));
		assert_eq!(flash.get_flash("test-2"), strings(&["value2"]));
	}

	#[rstest]
	fn test_custom_session_key() {
		let session = Arc::new(SessionData::new());
		let mut flash = FlashMessages::create_from_session(session.clone(), "custom").unwrap();
		flash.flash("info", "hello").unwrap();

		assert_eq!(flash.session_key(), "custom");
		assert!(session.has("custom"));
		assert!(!session.has(FLASH_NEXT));
	}
}
