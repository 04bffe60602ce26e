//! Header shared by every page: login, registration, logout and the
//! authentication overlay.

use super::{PageContext, ReloadOnSuccess};
use crate::core::bridge::{FormBridge, ResponseHandler};
use crate::core::client::ApiOutcome;
use crate::core::document::{self, Display, Document, Element, Form, Visibility};
use crate::core::session::Session;
use crate::domain::forms;
use crate::domain::model::TokenResponse;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, Response};

pub const AUTHENTICATE_FORM: &str = "authenticate";
pub const REGISTER_FORM: &str = "register";

pub const AUTHENTICATE_ACTION: &str = "/api/authenticate";
pub const REGISTER_ACTION: &str = "/api/signup";

/// Adds the header's forms and overlay elements to `document`.
pub fn extend_document(document: Document) -> Document {
    document
        .with_form(Form::new(AUTHENTICATE_FORM, Method::POST, AUTHENTICATE_ACTION))
        .with_form(Form::new(REGISTER_FORM, Method::POST, REGISTER_ACTION))
        .with_element(Element::with_id("auth-form").hidden())
        .with_element(Element::with_id("auth-background").hidden())
        .with_element(Element::with_id(AUTHENTICATE_FORM))
        .with_element(Element::with_id(REGISTER_FORM))
}

pub fn setup(ctx: &PageContext, bridge: &mut FormBridge) {
    let doc = document::lock(&ctx.document).clone();

    bridge.setup_form(
        &doc,
        AUTHENTICATE_FORM,
        forms::authenticate,
        LoginHandler { ctx: ctx.clone() },
    );
    bridge.setup_form(
        &doc,
        REGISTER_FORM,
        forms::register,
        ReloadOnSuccess::new(ctx.clone()),
    );
}

struct LoginHandler {
    ctx: PageContext,
}

#[async_trait]
impl ResponseHandler for LoginHandler {
    async fn handle(&self, response: Response) -> Result<()> {
        let outcome = ApiOutcome::<TokenResponse>::from_response(response).await?;
        if !self.ctx.report(&outcome) {
            return Ok(());
        }
        let ApiOutcome::Ok(body) = outcome else {
            return Ok(());
        };

        let remember_me = document::lock(&self.ctx.document)
            .form(AUTHENTICATE_FORM)
            .is_some_and(|form| forms::checkbox(&form.values, "remember_me"));

        let session = Session::from_login(body.token, remember_me, Utc::now());
        self.ctx.sessions.save(&session).await?;
        tracing::info!(
            "Logged in{}",
            if remember_me { " (remembered for 30 days)" } else { "" }
        );

        self.ctx.navigator.reload();
        Ok(())
    }
}

pub async fn logout(ctx: &PageContext) -> Result<()> {
    ctx.sessions.clear().await?;
    tracing::info!("Logged out");
    ctx.navigator.assign("/");
    Ok(())
}

pub fn redirect_to_home(ctx: &PageContext) {
    ctx.navigator.assign("/");
}

fn set_overlay(document: &mut Document, visibility: Visibility) {
    document.set_visibility("auth-form", visibility);
    document.set_visibility("logout-form", visibility);
    document.set_visibility("auth-background", visibility);
}

pub fn show_auth_form(document: &mut Document) {
    set_overlay(document, Visibility::Visible);
}

pub fn hide_auth_form(document: &mut Document) {
    set_overlay(document, Visibility::Hidden);
}

pub fn switch_to_register(document: &mut Document) {
    document.set_display(REGISTER_FORM, Display::Flex);
    document.set_display(AUTHENTICATE_FORM, Display::None);
}

pub fn switch_to_authenticate(document: &mut Document) {
    document.set_display(REGISTER_FORM, Display::None);
    document.set_display(AUTHENTICATE_FORM, Display::Flex);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_toggles_skip_missing_logout_form() {
        let mut doc = extend_document(Document::new());

        show_auth_form(&mut doc);
        assert_eq!(doc.element("auth-form").unwrap().visibility, Visibility::Visible);
        assert_eq!(doc.element("auth-background").unwrap().visibility, Visibility::Visible);
        assert!(doc.element("logout-form").is_none());

        hide_auth_form(&mut doc);
        assert_eq!(doc.element("auth-form").unwrap().visibility, Visibility::Hidden);
        assert_eq!(doc.element("auth-background").unwrap().visibility, Visibility::Hidden);
    }

    #[test]
    fn switching_forms_flips_display() {
        let mut doc = extend_document(Document::new());

        switch_to_register(&mut doc);
        assert_eq!(doc.element(REGISTER_FORM).unwrap().display, Display::Flex);
        assert_eq!(doc.element(AUTHENTICATE_FORM).unwrap().display, Display::None);

        switch_to_authenticate(&mut doc);
        assert_eq!(doc.element(REGISTER_FORM).unwrap().display, Display::None);
        assert_eq!(doc.element(AUTHENTICATE_FORM).unwrap().display, Display::Flex);
    }
}
