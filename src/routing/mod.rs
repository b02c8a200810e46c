//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → matcher.rs (public route rules, docs rule)
//!     → router.rs (namespace lookup)
//!     → Return: Destination or no match
//!
//! Route Compilation (at startup):
//!     PublicRouteConfig[] / ServiceConfig[]
//!     → Compile rules, key targets by namespace
//!     → Freeze as immutable structures
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same destination

pub mod matcher;
pub mod router;

pub use matcher::{PublicRoutes, RouteRule};
pub use router::{Destination, ServiceRouter, ServiceTarget};
