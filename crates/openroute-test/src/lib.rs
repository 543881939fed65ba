//! # OpenRoute Test
//!
//! In-memory testing for OpenRoute routes: requests go straight into a
//! [`Dispatcher`](openroute_core::Dispatcher) and the full pipeline
//! (validation, middlewares, handler, response cleaning) runs without a
//! transport.
//!
//! ```ignore
//! use openroute_test::TestClient;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_article() {
//!     let client = TestClient::from_routes(app_routes()).unwrap();
//!
//!     let response = client
//!         .post("/articles")
//!         .header("Authorization", "Bearer token")
//!         .json(&json!({ "title": "A long enough title" }))
//!         .send()
//!         .await;
//!
//!     assert_eq!(response.status_code(), 201);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/openroute-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use response::TestResponse;
