pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command, TerminalNavigator, TerminalNotifier};

pub use app::pages::{Page, PageContext};
pub use config::session_store::{FileSessionStore, MemorySessionStore};
pub use config::Settings;
pub use core::bridge::FormBridge;
pub use core::client::{ApiClient, ApiOutcome};
pub use core::session::Session;
pub use utils::error::{GaraError, Result};
