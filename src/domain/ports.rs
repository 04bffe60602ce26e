use crate::core::session::Session;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Where the user ends up after an action. Only page call sites navigate.
pub trait Navigator: Send + Sync {
    fn reload(&self);
    fn assign(&self, url: &str);
    fn replace(&self, url: &str);
    fn push_state(&self);
}

/// Blocking user-facing messages.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Session>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn session_path(&self) -> &str;
    fn refresh_interval(&self) -> Duration;
    fn ranking_path(&self) -> &str;
}
