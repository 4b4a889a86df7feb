//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig.bind_address
//!     → listener.rs (parse, bind, report bound address)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bind failures are typed so startup can exit with a clear diagnostic
//! - Port 0 is allowed; the bound address is always logged

pub mod listener;

pub use listener::{bind, ListenerError};
