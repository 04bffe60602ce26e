//! Ranking page: ghost-team toggle, contest countdown and the periodic
//! ranking refresh.

use super::PageContext;
use crate::core::client::ApiClient;
use crate::core::countdown::Countdown;
use crate::core::document::{Document, Element, Visibility};
use crate::core::refresh::RefreshSource;
use crate::core::session::Session;
use crate::domain::model::ContestInfo;
use crate::utils::error::Result;
use async_trait::async_trait;

pub const FAKE_TEAM_CLASS: &str = "fake-team";
pub const TOGGLE_BUTTON: &str = "toggle-visibility";

pub const SHOW_FAKE_TEAMS_LABEL: &str = "Mostra squadre fantasma";
pub const HIDE_FAKE_TEAMS_LABEL: &str = "Nascondi squadre fantasma";

pub fn document() -> Document {
    super::header::extend_document(Document::new()).with_element(
        Element::with_id(TOGGLE_BUTTON)
            .text(HIDE_FAKE_TEAMS_LABEL)
            .onclick("hide_fake_teams()"),
    )
}

fn set_fake_teams(document: &mut Document, visibility: Visibility) {
    for element in document.elements_with_class_mut(FAKE_TEAM_CLASS) {
        element.visibility = visibility;
    }

    let (label, next) = match visibility {
        Visibility::Hidden => (SHOW_FAKE_TEAMS_LABEL, "show_fake_teams()"),
        Visibility::Visible => (HIDE_FAKE_TEAMS_LABEL, "hide_fake_teams()"),
    };
    if let Some(toggle) = document.element_mut(TOGGLE_BUTTON) {
        toggle.text = label.to_string();
        toggle.onclick = Some(next.to_string());
    }
}

pub fn hide_fake_teams(document: &mut Document) {
    set_fake_teams(document, Visibility::Hidden);
}

pub fn show_fake_teams(document: &mut Document) {
    set_fake_teams(document, Visibility::Visible);
}

/// Fetches contest metadata for the countdown. `None` after alerting the
/// user when the server refused.
pub async fn load_countdown(ctx: &PageContext, contest_id: i64) -> Result<Option<Countdown>> {
    let session = ctx.session().await?;
    let outcome = ctx
        .client
        .get_json::<ContestInfo>(&session, &format!("/api/contests/{contest_id}"))
        .await?;

    if !ctx.report(&outcome) {
        return Ok(None);
    }
    Ok(Some(Countdown::from_contest(&outcome.into_result()?)))
}

/// Expands `{contest_id}` in a configured ranking path.
pub fn ranking_path(template: &str, contest_id: i64) -> String {
    template.replace("{contest_id}", &contest_id.to_string())
}

/// Server-rendered ranking, fetched as text.
pub struct RankingSource {
    client: ApiClient,
    session: Session,
    path: String,
}

impl RankingSource {
    pub fn new(client: ApiClient, session: Session, path: String) -> Self {
        Self {
            client,
            session,
            path,
        }
    }
}

#[async_trait]
impl RefreshSource for RankingSource {
    async fn fetch(&self) -> Result<String> {
        self.client
            .get_text(&self.session, &self.path)
            .await?
            .into_result()
    }
}
