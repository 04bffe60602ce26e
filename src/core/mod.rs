pub mod bridge;
pub mod client;
pub mod countdown;
pub mod document;
pub mod refresh;
pub mod session;

pub use crate::domain::model::{FormData, Payload, PayloadValue};
pub use crate::domain::ports::{ConfigProvider, Navigator, Notifier, SessionStore};
pub use crate::utils::error::Result;
