//! Form Bridge: turns a form submission into a JSON request.
//!
//! A form is bound once by id with a transform and a response handler.
//! Submitting it suppresses the default navigation, runs the transform
//! over the submitted fields exactly once, sends the resulting payload to
//! the form's action with the form's method, and passes the raw response
//! to the handler. Status codes are the handler's business.
//!
//! There is no retry and no de-duplication: two submissions are two
//! independent requests.

use crate::core::client::ApiClient;
use crate::core::document::Document;
use crate::core::session::Session;
use crate::domain::model::{FormData, Payload};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Method, Response};
use std::collections::HashMap;
use std::sync::Arc;

pub type Transform = dyn Fn(&FormData) -> Result<Payload> + Send + Sync;

#[async_trait]
pub trait ResponseHandler: Send + Sync {
    async fn handle(&self, response: Response) -> Result<()>;
}

/// A submission of one form, carrying the fields the user filled in.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    form_id: String,
    fields: FormData,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form_id: impl Into<String>, fields: FormData) -> Self {
        Self {
            form_id: form_id.into(),
            fields,
            default_prevented: false,
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn fields(&self) -> &FormData {
        &self.fields
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

struct Binding {
    action: String,
    method: Method,
    transform: Arc<Transform>,
    handler: Arc<dyn ResponseHandler>,
}

pub struct FormBridge {
    client: ApiClient,
    bindings: HashMap<String, Binding>,
}

impl FormBridge {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            bindings: HashMap::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Binds form `id` of `document`. A document without that form is not
    /// an error: nothing is bound and `false` is returned.
    pub fn setup_form<F, H>(&mut self, document: &Document, id: &str, transform: F, handler: H) -> bool
    where
        F: Fn(&FormData) -> Result<Payload> + Send + Sync + 'static,
        H: ResponseHandler + 'static,
    {
        let Some(form) = document.form(id) else {
            tracing::debug!("No form '{}' on this page, skipping", id);
            return false;
        };

        self.bindings.insert(
            id.to_string(),
            Binding {
                action: form.action.clone(),
                method: form.method.clone(),
                transform: Arc::new(transform),
                handler: Arc::new(handler),
            },
        );
        true
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.bindings.contains_key(id)
    }

    /// Handles a submit event. Returns `Ok(false)` when no form with the
    /// event's id is bound; the event is then left untouched.
    pub async fn submit(&self, session: &Session, event: &mut SubmitEvent) -> Result<bool> {
        let Some(binding) = self.bindings.get(event.form_id()) else {
            return Ok(false);
        };

        event.prevent_default();

        let response = send_form(
            &self.client,
            session,
            &binding.method,
            &binding.action,
            event.fields(),
            binding.transform.as_ref(),
        )
        .await?;

        binding.handler.handle(response).await?;
        Ok(true)
    }
}

/// Transforms `fields` and sends them as JSON to `action`.
pub async fn send_form(
    client: &ApiClient,
    session: &Session,
    method: &Method,
    action: &str,
    fields: &FormData,
    transform: &Transform,
) -> Result<Response> {
    let payload = transform(fields)?;
    let body = payload.to_json_bytes()?;

    tracing::info!("Submitting {} field(s) to {} {}", payload.len(), method, action);
    client.execute_raw(session, method.clone(), action, body).await
}

