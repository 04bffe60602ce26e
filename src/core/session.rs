use chrono::{DateTime, Duration, Utc};
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const COOKIE_NAME: &str = "api_key";

/// How long a "remember me" login keeps its cookie: 30 days.
pub const REMEMBER_ME_TTL_MS: i64 = 2_592_000_000;

/// Credentials attached to outgoing requests.
///
/// A session without `expires` lives until it is cleared, like a browser
/// session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_login(token: impl Into<String>, remember_me: bool, now: DateTime<Utc>) -> Self {
        let expires = remember_me.then(|| now + Duration::milliseconds(REMEMBER_ME_TTL_MS));
        Self {
            token: Some(token.into()),
            expires,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.is_expired(now)
    }

    /// `Cookie` request header value, if the session is usable at `now`.
    pub fn cookie_header(&self, now: DateTime<Utc>) -> Option<String> {
        if self.is_expired(now) {
            return None;
        }
        self.token
            .as_ref()
            .map(|token| Cookie::new(COOKIE_NAME, token.as_str()).to_string())
    }

    /// The cookie string a browser would be handed for this session.
    pub fn set_cookie_string(&self) -> Option<String> {
        let token = self.token.as_ref()?;
        let mut cookie = Cookie::build((COOKIE_NAME, token.as_str()));
        if let Some(expires) = self
            .expires
            .and_then(|expires| OffsetDateTime::from_unix_timestamp(expires.timestamp()).ok())
        {
            cookie = cookie.expires(expires);
        }
        Some(cookie.build().to_string())
    }

    pub fn cleared_cookie_string() -> String {
        Cookie::build((COOKIE_NAME, ""))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn plain_login_yields_session_cookie() {
        let session = Session::from_login("abc", false, noon());

        assert_eq!(session.expires, None);
        assert_eq!(session.set_cookie_string().as_deref(), Some("api_key=abc"));
        assert_eq!(session.cookie_header(noon()).as_deref(), Some("api_key=abc"));
    }

    #[test]
    fn remember_me_expires_after_thirty_days() {
        let session = Session::from_login("abc", true, noon());

        assert_eq!(session.expires, Some(noon() + Duration::days(30)));
        assert_eq!(
            session.set_cookie_string().as_deref(),
            Some("api_key=abc; Expires=Sun, 31 Mar 2024 12:00:00 GMT")
        );
    }

    #[test]
    fn cleared_cookie_expires_at_epoch() {
        let cleared = Session::cleared_cookie_string();
        assert_eq!(cleared, "api_key=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT");

        let parsed = Cookie::parse(cleared).unwrap();
        assert_eq!(parsed.value(), "");
        assert_eq!(parsed.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }

    #[test]
    fn expired_session_sends_no_cookie() {
        let session = Session::from_login("abc", true, noon());
        let later = noon() + Duration::days(31);

        assert!(session.is_expired(later));
        assert!(!session.is_authenticated(later));
        assert_eq!(session.cookie_header(later), None);
    }

    #[test]
    fn anonymous_session_has_no_cookie() {
        let session = Session::anonymous();
        assert_eq!(session.cookie_header(noon()), None);
        assert_eq!(session.set_cookie_string(), None);
    }
}
