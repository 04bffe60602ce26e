//! Scheduled refresh of server-rendered content.
//!
//! A background task ticks on a fixed interval, fetches the content and
//! hands it to a sink only when it differs from what was last applied.
//! Ticks and user actions are serialized through [`ScheduledRefresh::hold`]:
//! while a hold guard is alive no tick fetches or applies anything.
//! A [`RefreshTrigger`] asks for an extra fetch without waiting for the
//! next tick.

use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex, Notify, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[async_trait]
pub trait RefreshSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

pub type RefreshSink = Box<dyn FnMut(&str) + Send>;

/// Cloneable handle that requests an immediate refresh.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    notify: Arc<Notify>,
}

impl RefreshTrigger {
    pub fn trigger(&self) {
        self.notify.notify_one();
    }
}

pub struct ScheduledRefresh {
    gate: Arc<Mutex<()>>,
    notify: Arc<Notify>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ScheduledRefresh {
    /// Starts polling. The first fetch happens immediately.
    pub fn start<S>(interval: Duration, source: S, mut sink: RefreshSink) -> Self
    where
        S: RefreshSource + 'static,
    {
        let gate = Arc::new(Mutex::new(()));
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task_gate = Arc::clone(&gate);
        let notify = Arc::new(Notify::new());
        let task_notify = Arc::clone(&notify);

        tracing::info!("Refresh started, every {:?}", interval);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last: Option<String> = None;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                    _ = task_notify.notified() => tracing::debug!("Refresh requested"),
                }

                // a held gate must not keep stop() waiting
                let _held = tokio::select! {
                    _ = &mut stop_rx => break,
                    held = task_gate.lock() => held,
                };
                match source.fetch().await {
                    Ok(content) => {
                        if last.as_deref() != Some(content.as_str()) {
                            tracing::debug!("Refreshed content changed ({} bytes)", content.len());
                            sink(&content);
                            last = Some(content);
                        }
                    }
                    Err(e) => tracing::warn!("Refresh failed: {}", e),
                }
            }

            tracing::info!("Refresh stopped");
        });

        Self {
            gate,
            notify,
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }

    pub fn trigger(&self) -> RefreshTrigger {
        RefreshTrigger {
            notify: Arc::clone(&self.notify),
        }
    }

    /// Waits for any in-flight tick, then blocks further ticks until the
    /// returned guard is dropped.
    pub async fn hold(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.gate).lock_owned().await
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops polling and waits for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Refresh task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ScheduledRefresh {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
