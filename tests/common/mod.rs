#![allow(dead_code)]

use gara_client::core::document::{Document, SharedDocument};
use gara_client::domain::ports::{Navigator, Notifier};
use gara_client::{ApiClient, MemorySessionStore, PageContext, Session};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Reload,
    Assign(String),
    Replace(String),
    PushState,
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub calls: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn calls(&self) -> Vec<Navigation> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, navigation: Navigation) {
        self.calls.lock().unwrap().push(navigation);
    }
}

impl Navigator for RecordingNavigator {
    fn reload(&self) {
        self.record(Navigation::Reload);
    }

    fn assign(&self, url: &str) {
        self.record(Navigation::Assign(url.to_string()));
    }

    fn replace(&self, url: &str) {
        self.record(Navigation::Replace(url.to_string()));
    }

    fn push_state(&self) {
        self.record(Navigation::PushState);
    }
}

/// Records alerts and answers every confirmation with `answer`.
#[derive(Debug)]
pub struct RecordingNotifier {
    pub answer: bool,
    pub alerts: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            alerts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}

pub struct Harness {
    pub ctx: PageContext,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub sessions: Arc<MemorySessionStore>,
}

impl Harness {
    pub fn new(base_url: &str, document: Document) -> Self {
        Self::with_session(base_url, document, Session::anonymous(), true)
    }

    pub fn with_session(
        base_url: &str,
        document: Document,
        session: Session,
        confirm: bool,
    ) -> Self {
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::answering(confirm));
        let sessions = Arc::new(MemorySessionStore::with_session(session));
        let client = ApiClient::new(base_url, Duration::from_secs(5)).unwrap();

        let ctx = PageContext {
            client,
            navigator: navigator.clone(),
            notifier: notifier.clone(),
            sessions: sessions.clone(),
            document: document.into_shared(),
        };

        Self {
            ctx,
            navigator,
            notifier,
            sessions,
        }
    }

    pub fn document(&self) -> SharedDocument {
        self.ctx.document.clone()
    }
}
