//! Typed JSON request wrapper around `reqwest`.
//!
//! Every call takes the [`Session`] explicitly and resolves the response
//! into an [`ApiOutcome`]: any 2xx is success, 4xx carries the server's
//! `error` message, everything else is a server error. Transport failures
//! stay in the outer `Result`.

use crate::core::session::Session;
use crate::domain::model::ApiErrorBody;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GaraError, Result};
use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
    Ok(T),
    ClientError {
        status: StatusCode,
        message: String,
    },
    ServerError {
        status: StatusCode,
        message: Option<String>,
    },
}

impl<T> ApiOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiOutcome::Ok(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Ok(value) => ApiOutcome::Ok(f(value)),
            ApiOutcome::ClientError { status, message } => {
                ApiOutcome::ClientError { status, message }
            }
            ApiOutcome::ServerError { status, message } => {
                ApiOutcome::ServerError { status, message }
            }
        }
    }

    /// Message to show the user for a failed outcome.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ApiOutcome::Ok(_) => None,
            ApiOutcome::ClientError { message, .. } => Some(message),
            ApiOutcome::ServerError { message, .. } => {
                Some(message.as_deref().unwrap_or(GENERIC_SERVER_ERROR))
            }
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            ApiOutcome::Ok(value) => Ok(value),
            ApiOutcome::ClientError { status, message } => {
                Err(GaraError::Api { status, message })
            }
            ApiOutcome::ServerError { status, message } => Err(GaraError::Api {
                status,
                message: message.unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
            }),
        }
    }
}

pub const GENERIC_SERVER_ERROR: &str = "Errore del server, riprova più tardi";

impl<T: DeserializeOwned> ApiOutcome<T> {
    pub async fn from_response(response: Response) -> Result<Self> {
        let status = response.status();
        let bytes = response.bytes().await?;
        Self::from_parts(status, &bytes)
    }

    pub fn from_parts(status: StatusCode, body: &[u8]) -> Result<Self> {
        if status.is_success() {
            let body = if body.iter().all(u8::is_ascii_whitespace) {
                b"null".as_slice()
            } else {
                body
            };
            return Ok(ApiOutcome::Ok(serde_json::from_slice(body)?));
        }

        let message = serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.is_empty());

        if status.is_client_error() {
            let message = message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
            });
            Ok(ApiOutcome::ClientError { status, message })
        } else {
            Ok(ApiOutcome::ServerError { status, message })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL. Paths without a leading slash
    /// are still taken from the root, the way the pages use them.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let relative = path.trim_start_matches('/');
        Ok(self.base_url.join(relative)?)
    }

    pub fn request(&self, session: &Session, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.resolve(path)?;
        tracing::debug!("{} {}", method, url);

        let mut builder = self.client.request(method, url);
        if let Some(cookie) = session.cookie_header(Utc::now()) {
            builder = builder.header(COOKIE, cookie);
        }
        Ok(builder)
    }

    /// Sends pre-serialized JSON and hands back the untouched response.
    pub async fn execute_raw(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Response> {
        let response = self
            .request(session, method, path)?
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        tracing::debug!("Response status: {}", response.status());
        Ok(response)
    }

    pub async fn send_json<B, T>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiOutcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body)?;
        let response = self.execute_raw(session, method, path, body).await?;
        ApiOutcome::from_response(response).await
    }

    pub async fn send_empty<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
    ) -> Result<ApiOutcome<T>> {
        let response = self.request(session, method, path)?.send().await?;
        tracing::debug!("Response status: {}", response.status());
        ApiOutcome::from_response(response).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<ApiOutcome<T>> {
        self.send_empty(session, Method::GET, path).await
    }

    /// Fetches a page or fragment as text; non-2xx maps like any other call.
    pub async fn get_text(&self, session: &Session, path: &str) -> Result<ApiOutcome<String>> {
        let response = self.request(session, Method::GET, path)?.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(ApiOutcome::Ok(response.text().await?));
        }
        let bytes = response.bytes().await?;
        Ok(ApiOutcome::<()>::from_parts(status, &bytes)?.map(|_| String::new()))
    }
}

fn normalize_base(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContestCreated;

    #[test]
    fn success_decodes_body() {
        let outcome =
            ApiOutcome::<ContestCreated>::from_parts(StatusCode::CREATED, br#"{"contest_id":7}"#)
                .unwrap();
        assert_eq!(outcome, ApiOutcome::Ok(ContestCreated { contest_id: 7 }));
    }

    #[test]
    fn no_content_decodes_as_unit() {
        let outcome = ApiOutcome::<()>::from_parts(StatusCode::NO_CONTENT, b"").unwrap();
        assert_eq!(outcome, ApiOutcome::Ok(()));
    }

    #[test]
    fn client_error_uses_body_message() {
        let outcome = ApiOutcome::<()>::from_parts(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"Username o password errati"}"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::ClientError {
                status: StatusCode::UNAUTHORIZED,
                message: "Username o password errati".to_string()
            }
        );
    }

    #[test]
    fn client_error_falls_back_to_reason_phrase() {
        let outcome =
            ApiOutcome::<()>::from_parts(StatusCode::NOT_FOUND, br#"{"error":""}"#).unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::ClientError {
                status: StatusCode::NOT_FOUND,
                message: "Not Found".to_string()
            }
        );
    }

    #[test]
    fn client_error_result_keeps_status() {
        let outcome =
            ApiOutcome::<()>::from_parts(StatusCode::NOT_FOUND, br#"{"error":"Gara non trovata"}"#)
                .unwrap();
        let err = outcome.into_result().unwrap_err();
        assert!(matches!(
            err,
            GaraError::Api { status, ref message }
                if status == StatusCode::NOT_FOUND && message == "Gara non trovata"
        ));
    }

    #[test]
    fn server_error_keeps_optional_message() {
        let outcome =
            ApiOutcome::<()>::from_parts(StatusCode::INTERNAL_SERVER_ERROR, b"oops").unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::ServerError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None
            }
        );
        assert_eq!(outcome.error_message(), Some(GENERIC_SERVER_ERROR));
    }

    #[test]
    fn resolve_handles_relative_and_absolute_paths() {
        let client = ApiClient::new("http://gara.test/app", Duration::from_secs(1)).unwrap();

        assert_eq!(
            client.resolve("/api/contests/3").unwrap().as_str(),
            "http://gara.test/app/api/contests/3"
        );
        assert_eq!(
            client.resolve("settings/3").unwrap().as_str(),
            "http://gara.test/app/settings/3"
        );
    }
}
