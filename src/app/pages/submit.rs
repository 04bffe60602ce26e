//! Answer submission: the submitter form and the jolly button next to it.

use super::PageContext;
use crate::core::bridge::{send_form, FormBridge, ResponseHandler};
use crate::core::client::ApiOutcome;
use crate::core::document::{self, Document, Element, Form, Visibility};
use crate::core::refresh::RefreshTrigger;
use crate::domain::forms;
use crate::domain::model::SubmissionResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Method, Response};

pub const SUBMITTER_FORM: &str = "submitter";
/// Element wrapping the submitter, hidden once an answer is accepted.
pub const SUBMITTER_CONTAINER: &str = "submitter-container";

pub const CORRECT_ANSWER: &str = "Risposta esatta!";
pub const WRONG_ANSWER: &str = "Risposta errata!";
pub const JOLLY_CHOSEN: &str = "Jolly scelto!";

pub fn document(contest_id: i64) -> Document {
    super::header::extend_document(Document::new())
        .with_form(Form::new(
            SUBMITTER_FORM,
            Method::POST,
            format!("/api/contests/{contest_id}/submissions"),
        ))
        .with_element(Element::with_id(SUBMITTER_CONTAINER))
}

/// What happens on the page after an accepted submission.
#[derive(Clone, Default)]
pub struct AfterSubmit {
    /// Re-fetch the ranking, when the page shows one.
    pub reload_content: Option<RefreshTrigger>,
}

impl AfterSubmit {
    fn apply(&self, ctx: &PageContext) {
        {
            let mut doc = document::lock(&ctx.document);
            doc.reset_form(SUBMITTER_FORM);
            doc.set_visibility(SUBMITTER_CONTAINER, Visibility::Hidden);
        }
        if let Some(trigger) = &self.reload_content {
            trigger.trigger();
        }
    }
}

pub fn setup(ctx: &PageContext, bridge: &mut FormBridge, after: AfterSubmit) {
    super::header::setup(ctx, bridge);

    let doc = document::lock(&ctx.document).clone();
    bridge.setup_form(
        &doc,
        SUBMITTER_FORM,
        forms::submit_answer,
        SubmissionHandler {
            ctx: ctx.clone(),
            after,
        },
    );
}

struct SubmissionHandler {
    ctx: PageContext,
    after: AfterSubmit,
}

#[async_trait]
impl ResponseHandler for SubmissionHandler {
    async fn handle(&self, response: Response) -> Result<()> {
        let outcome = ApiOutcome::<SubmissionResult>::from_response(response).await?;
        if let ApiOutcome::Ok(result) = &outcome {
            tracing::info!("Answer recorded, correct: {}", result.correct);
            self.ctx
                .notifier
                .alert(if result.correct { CORRECT_ANSWER } else { WRONG_ANSWER });
            self.after.apply(&self.ctx);
        } else {
            self.ctx.report(&outcome);
        }
        Ok(())
    }
}

/// Marks the question currently in the submitter as the team's jolly.
pub async fn submit_jolly(ctx: &PageContext, contest_id: i64, after: &AfterSubmit) -> Result<()> {
    let fields = document::lock(&ctx.document)
        .form(SUBMITTER_FORM)
        .map(|form| form.values.clone())
        .unwrap_or_default();

    let session = ctx.session().await?;
    let response = send_form(
        &ctx.client,
        &session,
        &Method::POST,
        &format!("/api/contests/{contest_id}/jollies"),
        &fields,
        &forms::jolly,
    )
    .await?;

    let outcome = ApiOutcome::<serde_json::Value>::from_response(response).await?;
    if ctx.report(&outcome) {
        tracing::info!("Jolly chosen for contest {}", contest_id);
        ctx.notifier.alert(JOLLY_CHOSEN);
        after.apply(ctx);
    }
    Ok(())
}
