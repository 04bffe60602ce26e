//! Page call sites: each page declares its forms and elements, binds its
//! forms to the bridge on load, and reacts to outcomes through the
//! navigator and notifier.

pub mod contests;
pub mod create;
pub mod header;
pub mod ranking;
pub mod settings;
pub mod submit;

use crate::core::bridge::{FormBridge, ResponseHandler, SubmitEvent};
use crate::core::client::{ApiClient, ApiOutcome};
use crate::core::document::{self, Document, SharedDocument};
use crate::core::session::Session;
use crate::domain::model::FormData;
use crate::domain::ports::{Navigator, Notifier, SessionStore};
use crate::utils::error::{GaraError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Response;
use std::sync::Arc;

/// The pages that carry forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Contests,
    Create,
    Settings { contest_id: i64 },
    Submit { contest_id: i64 },
    Ranking { contest_id: i64 },
}

impl Page {
    /// The page a form id lives on. Contest pages need `contest_id`.
    pub fn for_form(form_id: &str, contest_id: Option<i64>) -> Result<Self> {
        match form_id {
            header::AUTHENTICATE_FORM | header::REGISTER_FORM => Ok(Page::Contests),
            create::CREATE_FORM => Ok(Page::Create),
            settings::UPDATE_FORM | settings::ADD_TEAM_FORM => Ok(Page::Settings {
                contest_id: *validate_required_field("contest", &contest_id)?,
            }),
            submit::SUBMITTER_FORM => Ok(Page::Submit {
                contest_id: *validate_required_field("contest", &contest_id)?,
            }),
            other => Err(GaraError::InvalidConfigValueError {
                field: "form".to_string(),
                value: other.to_string(),
                reason: "No page has a form with this id".to_string(),
            }),
        }
    }

    pub fn document(&self, now: NaiveDateTime) -> Document {
        match *self {
            Page::Contests => contests::document(),
            Page::Create => create::document(now),
            Page::Settings { contest_id } => settings::document(contest_id),
            Page::Submit { contest_id } => submit::document(contest_id),
            Page::Ranking { .. } => ranking::document(),
        }
    }

    /// Binds the page's forms, as its load handler would.
    pub fn setup(&self, ctx: &PageContext, bridge: &mut FormBridge) {
        match self {
            Page::Contests | Page::Ranking { .. } => contests::setup(ctx, bridge),
            Page::Create => create::setup(ctx, bridge),
            Page::Settings { .. } => settings::setup(ctx, bridge),
            Page::Submit { .. } => submit::setup(ctx, bridge, submit::AfterSubmit::default()),
        }
    }
}

/// Everything a page needs to act on the user's behalf.
#[derive(Clone)]
pub struct PageContext {
    pub client: ApiClient,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: Arc<dyn SessionStore>,
    pub document: SharedDocument,
}

impl PageContext {
    pub async fn session(&self) -> Result<Session> {
        self.sessions.load().await
    }

    /// Alerts the user about a failed outcome. Returns whether it succeeded.
    pub fn report<T>(&self, outcome: &ApiOutcome<T>) -> bool {
        match outcome.error_message() {
            Some(message) => {
                tracing::warn!("Request failed: {}", message);
                self.notifier.alert(message);
                false
            }
            None => true,
        }
    }
}

/// Fills `form_id` with `fields` (over its defaults) and submits it
/// through the bridge, as a user pressing the submit button would.
/// Returns the event so callers can inspect it.
pub async fn fill_and_submit(
    ctx: &PageContext,
    bridge: &FormBridge,
    form_id: &str,
    fields: FormData,
) -> Result<SubmitEvent> {
    let fields = {
        let mut doc = document::lock(&ctx.document);
        match doc.form_mut(form_id) {
            Some(form) => {
                let fields = fields.merged_over(&form.defaults);
                form.values = fields.clone();
                fields
            }
            None => fields,
        }
    };

    let session = ctx.session().await?;
    let mut event = SubmitEvent::new(form_id, fields);
    if !bridge.submit(&session, &mut event).await? {
        tracing::warn!("Form '{}' is not bound on this page", form_id);
    }
    Ok(event)
}

/// Reloads the page on success, alerts otherwise.
pub struct ReloadOnSuccess {
    ctx: PageContext,
}

impl ReloadOnSuccess {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ResponseHandler for ReloadOnSuccess {
    async fn handle(&self, response: Response) -> Result<()> {
        let outcome = ApiOutcome::<serde_json::Value>::from_response(response).await?;
        if self.ctx.report(&outcome) {
            self.ctx.navigator.reload();
        }
        Ok(())
    }
}

/// Sends a DELETE after the user confirms, reloading on success.
/// Returns false when the user declined and nothing was sent.
pub async fn confirm_and_delete(ctx: &PageContext, prompt: &str, path: &str) -> Result<bool> {
    if !ctx.notifier.confirm(prompt) {
        tracing::info!("Deletion of {} cancelled", path);
        return Ok(false);
    }

    let session = ctx.session().await?;
    let outcome = ctx
        .client
        .send_empty::<()>(&session, reqwest::Method::DELETE, path)
        .await?;
    if ctx.report(&outcome) {
        tracing::info!("Deleted {}", path);
        ctx.navigator.reload();
    }
    Ok(true)
}
