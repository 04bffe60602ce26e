//! Contest settings page: timing/bonus update, team management.

use super::{confirm_and_delete, PageContext, ReloadOnSuccess};
use crate::core::bridge::FormBridge;
use crate::core::document::{self, Document, Form};
use crate::domain::forms;
use crate::utils::error::Result;
use reqwest::Method;

pub const UPDATE_FORM: &str = "update";
pub const ADD_TEAM_FORM: &str = "add_team";

pub const DELETE_TEAM_PROMPT: &str = "Stai per cancellare questa squadra! Sei sicuro?";

pub fn document(contest_id: i64) -> Document {
    super::header::extend_document(Document::new())
        .with_form(Form::new(
            UPDATE_FORM,
            Method::PATCH,
            format!("/api/contests/{contest_id}"),
        ))
        .with_form(Form::new(
            ADD_TEAM_FORM,
            Method::POST,
            format!("/api/contests/{contest_id}/teams"),
        ))
}

pub fn setup(ctx: &PageContext, bridge: &mut FormBridge) {
    super::header::setup(ctx, bridge);

    let doc = document::lock(&ctx.document).clone();
    bridge.setup_form(
        &doc,
        UPDATE_FORM,
        forms::update_contest,
        ReloadOnSuccess::new(ctx.clone()),
    );
    bridge.setup_form(
        &doc,
        ADD_TEAM_FORM,
        forms::add_team,
        ReloadOnSuccess::new(ctx.clone()),
    );
}

/// Returns false when the user declined and nothing was sent.
pub async fn delete_team(ctx: &PageContext, contest_id: i64, team_id: i64) -> Result<bool> {
    let path = format!("/api/contests/{contest_id}/teams/{team_id}");
    confirm_and_delete(ctx, DELETE_TEAM_PROMPT, &path).await
}

pub fn redirect_to_contest(ctx: &PageContext, contest_id: i64) {
    ctx.navigator.assign(&format!("/contest/{contest_id}"));
}
