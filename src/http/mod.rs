//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, request ID, tracing)
//!     → pipeline.rs (ordered stages; access control first)
//!     → server.rs dispatch (routing layer decides backend)
//!     → request.rs (rewrite path, headers, identity)
//!     → response.rs (relay, docs manifest rewrite)
//!     → Send to client
//! ```

pub mod error;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod server;

pub use error::GatewayError;
pub use pipeline::{Flow, Pipeline, Stage};
pub use request::X_REQUEST_ID;
pub use server::GatewayServer;
