use super::PageContext;
use crate::core::bridge::{FormBridge, ResponseHandler};
use crate::core::client::ApiOutcome;
use crate::core::document::{self, Document, Form};
use crate::domain::forms;
use crate::domain::model::ContestCreated;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Method, Response};

pub const CREATE_FORM: &str = "create";
pub const CREATE_ACTION: &str = "/api/contests";

/// The format the backend parses `start_time` with.
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn default_start_time(now: NaiveDateTime) -> String {
    now.format(START_TIME_FORMAT).to_string()
}

pub fn document(now: NaiveDateTime) -> Document {
    super::header::extend_document(Document::new()).with_form(
        Form::new(CREATE_FORM, Method::POST, CREATE_ACTION)
            .default_value("start_time", default_start_time(now)),
    )
}

pub fn setup(ctx: &PageContext, bridge: &mut FormBridge) {
    super::header::setup(ctx, bridge);

    let doc = document::lock(&ctx.document).clone();
    bridge.setup_form(
        &doc,
        CREATE_FORM,
        forms::create_contest,
        CreatedHandler { ctx: ctx.clone() },
    );
}

struct CreatedHandler {
    ctx: PageContext,
}

#[async_trait]
impl ResponseHandler for CreatedHandler {
    async fn handle(&self, response: Response) -> Result<()> {
        let outcome = ApiOutcome::<ContestCreated>::from_response(response).await?;
        if let ApiOutcome::Ok(created) = outcome {
            tracing::info!("Contest {} created", created.contest_id);
            self.ctx.navigator.push_state();
            self.ctx
                .navigator
                .replace(&format!("settings/{}", created.contest_id));
        } else {
            self.ctx.report(&outcome);
        }
        Ok(())
    }
}
