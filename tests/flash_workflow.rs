//! End-to-end flash message workflow through the facade crate
//!
//! A tiny application with a form endpoint and a page endpoint is served
//! through [`MiddlewareChain`]; the session survives between requests the way
//! a cookie-backed session would.

use async_trait::async_trait;
use bytes::Bytes;
use hyper::{Method, StatusCode};
use reinhardt_flash::middleware::{Error, Result};
use reinhardt_flash::prelude::*;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

/// Attaches the visitor's session to every request
struct VisitorSession {
	session: SessionHandle,
}

#[async_trait]
impl Middleware for VisitorSession {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		next.handle(request.with_session(self.session.clone())).await
	}
}

/// `POST /profile` validates and redirects, `GET /profile` renders notices
struct ProfileApp;

#[async_trait]
impl Handler for ProfileApp {
	async fn handle(&self, request: Request) -> Result<Response> {
		let flash = request
			.flash()
			.ok_or_else(|| Error::Handler("flash middleware missing".to_string()))?;

		match (&request.method, request.uri.path()) {
			(&Method::POST, "/profile") if request.body.is_empty() => {
				flash.flash_now("error", "Name is required")?;
				Ok(Response::new(StatusCode::UNPROCESSABLE_ENTITY)
					.with_body(flash.get_flash("error").join("\n")))
			}
			(&Method::POST, "/profile") => {
				flash.flash("success", "Profile saved")?;
				flash.flash_for("tip", "Add an avatar", 2)?;
				Ok(Response::new(StatusCode::SEE_OTHER))
			}
			(&Method::GET, "/profile") => {
				let mut lines = Vec::new();
				for (key, values) in flash.get_flashes() {
					for value in values {
						lines.push(format!("{}: {}", key, value));
					}
				}
				Ok(Response::ok().with_body(lines.join("\n")))
			}
			(&Method::GET, "/profile/edit") => {
				// Partial page: nothing rendered, keep the notices for the full page
				flash.prolong_flash()?;
				Ok(Response::ok())
			}
			_ => Ok(Response::new(StatusCode::NOT_FOUND)),
		}
	}
}

struct Visitor {
	session: Arc<SessionData>,
	app: MiddlewareChain,
}

impl Visitor {
	async fn send(&self, method: Method, path: &str, body: &'static str) -> Response {
		let request = Request::builder()
			.method(method)
			.uri(path)
			.body(Bytes::from_static(body.as_bytes()))
			.build()
			.unwrap();
		self.app.handle(request).await.unwrap()
	}
}

#[fixture]
fn visitor() -> Visitor {
	let session = Arc::new(SessionData::new());
	let handle: SessionHandle = session.clone();
	let app = MiddlewareChain::new(Arc::new(ProfileApp))
		.with_middleware(Arc::new(VisitorSession { session: handle }))
		.with_middleware(Arc::new(FlashMessageMiddleware::new()));

	Visitor { session, app }
}

#[rstest]
#[tokio::test]
async fn test_post_redirect_get(visitor: Visitor) {
	// Execute
	let post = visitor.send(Method::POST, "/profile", "name=Ada").await;
	let first = visitor.send(Method::GET, "/profile", "").await;
	let second = visitor.send(Method::GET, "/profile", "").await;
	let third = visitor.send(Method::GET, "/profile", "").await;

	// Assert
	assert_eq!(post.status, StatusCode::SEE_OTHER);
	assert_eq!(
		first.body_text(),
		"success: Profile saved\ntip: Add an avatar"
	);
	assert_eq!(second.body_text(), "tip: Add an avatar");
	assert_eq!(third.body_text(), "");
	assert!(visitor.session.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_validation_error_is_not_carried_over(visitor: Visitor) {
	let post = visitor.send(Method::POST, "/profile", "").await;
	let page = visitor.send(Method::GET, "/profile", "").await;

	assert_eq!(post.status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(post.body_text(), "Name is required");
	assert_eq!(page.body_text(), "");
}

#[rstest]
#[tokio::test]
async fn test_partial_page_prolongs_expiring_notices(visitor: Visitor) {
	visitor.send(Method::POST, "/profile", "name=Ada").await;

	visitor.send(Method::GET, "/profile/edit", "").await;
	let page = visitor.send(Method::GET, "/profile", "").await;
	let after = visitor.send(Method::GET, "/profile", "").await;

	// The tip still had a hop left, so prolonging did not extend it
	assert_eq!(page.body_text(), "success: Profile saved\ntip: Add an avatar");
	assert_eq!(after.body_text(), "");
}

#[rstest]
#[tokio::test]
async fn test_session_layout(visitor: Visitor) {
	visitor.send(Method::POST, "/profile", "name=Ada").await;

	assert_eq!(
		visitor.session.get(FLASH_NEXT),
		Some(json!({
			"success": [{"value": "Profile saved", "hops": 1}],
			"tip": [{"value": "Add an avatar", "hops": 2}],
		}))
	);
}

#[rstest]
fn test_facade_constants() {
	assert_eq!(reinhardt_flash::DEFAULT_HOPS, 1);
	assert_eq!(reinhardt_flash::DEFAULT_NOW_HOPS, 0);
	assert_eq!(reinhardt_flash::FLASH_ATTRIBUTE, "flash");
	assert_eq!(reinhardt_flash::SESSION_ATTRIBUTE, "session");
	assert_eq!(reinhardt_flash::DEFAULT_IMPLEMENTATION, "flash_messages");
	assert!(MessageStoreRegistry::with_defaults().contains(reinhardt_flash::LEGACY_IMPLEMENTATION_ALIAS));
}
