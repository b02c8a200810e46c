//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (public route? else verify bearer credential)
//!     → token.rs (HMAC JWT verification, typed claims)
//!     → VerifiedIdentity attached to request extensions
//!
//! Outgoing request:
//!     → headers.rs (strip hop-by-hop, set User-Id from identity)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any verification failure
//! - No trust in client-supplied identity headers

pub mod access_control;
pub mod headers;
pub mod token;

pub use access_control::{AccessControl, VerifiedIdentity};
pub use headers::USER_ID;
pub use token::{Claims, TokenError, TokenVerifier};
