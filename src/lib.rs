//! Edge Gateway Library
//!
//! Authenticates requests against a shared-secret bearer token and
//! dispatches them to the backend owning the request's path namespace.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──▶ CORS / request ID / trace layers
//!     ──▶ pipeline: access control ──(401)──▶ Client
//!     ──▶ dispatch: namespace lookup ──(404)──▶ Client
//!     ──▶ rewrite path, set User-Id
//!     ──▶ Backend ──(500 on transport error)──▶ Client
//!     ◀── relayed response
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
