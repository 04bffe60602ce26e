use super::{confirm_and_delete, PageContext};
use crate::core::bridge::FormBridge;
use crate::core::document::Document;
use crate::utils::error::Result;

pub const DELETE_CONTEST_PROMPT: &str = "Stai per cancellare questa gara! Sei sicuro?";

pub fn contest_path(id: i64) -> String {
    format!("/api/contests/{id}")
}

/// The home page: the contest list under the shared header.
pub fn document() -> Document {
    super::header::extend_document(Document::new())
}

pub fn setup(ctx: &PageContext, bridge: &mut FormBridge) {
    super::header::setup(ctx, bridge);
}

/// Public link to a contest's ranking page.
pub fn contest_link(origin: &str, id: i64) -> String {
    format!("{}/contest/{id}", origin.trim_end_matches('/'))
}

/// Returns false when the user declined and nothing was sent.
pub async fn delete_contest(ctx: &PageContext, id: i64) -> Result<bool> {
    confirm_and_delete(ctx, DELETE_CONTEST_PROMPT, &contest_path(id)).await
}

pub fn redirect_to_contest(ctx: &PageContext, id: i64) {
    ctx.navigator.assign(&format!("/contest/{id}"));
}

pub fn redirect_to_settings(ctx: &PageContext, id: i64) {
    ctx.navigator.assign(&format!("/settings/{id}"));
}
