//! Secret Santa core.
//!
//! The derangement generator plus the seams the rest of the workspace plugs
//! into: store traits, the notifier trait, admin authentication and the
//! configuration value threaded through both binaries.

pub mod assign;
pub mod auth;
pub mod config;
pub mod draw;
pub mod notify;
pub mod registry;
pub mod store;

pub use assign::{DrawError, Generator};
pub use auth::{AdminAuth, AdminSession, AuthError};
pub use config::{AppConfig, ConfigError, MailConfig};
pub use notify::{Notice, Notifier, NotifyError};
pub use store::{AssignmentStore, MemoryStore, ParticipantStore, StoreError};
