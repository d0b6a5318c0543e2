//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Primary-domain request:
//!     → session.rs (read token cookies from the request jar)
//!     → client.rs (one refresh round trip to the external auth backend)
//!     → gate.rs (pure route-protection decision on the stripped path)
//!     → rotated cookies relayed verbatim onto the outgoing response
//! ```
//!
//! # Design Decisions
//! - The gateway never mints or validates tokens; the backend owns them
//! - Refresh failures degrade to "unauthenticated", never an error page
//! - Rotated cookies are a visible return value, not a side effect

pub mod client;
pub mod gate;
pub mod session;

pub use client::{AuthBackend, HttpAuthBackend};
pub use session::{SessionCookies, SessionState, SessionVerdict};
