//! Form transforms: pure functions from raw [`FormData`] to a [`Payload`].
//!
//! Each transform pulls named fields out of the form and applies the
//! light coercion the backend expects. A field that cannot be coerced
//! fails the transform, so nothing is sent.

use crate::domain::model::{FormData, Payload};
use crate::utils::error::{GaraError, Result};

/// Number of entries in the question and contest bonus tables.
pub const BONUS_SLOTS: usize = 10;

/// Token lifetime in minutes requested when "remember me" is ticked.
pub const REMEMBER_ME_DURATION: i64 = 43_200;
/// Token lifetime in minutes otherwise.
pub const DEFAULT_DURATION: i64 = 60;

pub fn text(data: &FormData, name: &str) -> Result<String> {
    data.get(name)
        .map(str::to_string)
        .ok_or_else(|| GaraError::MissingFieldError {
            field: name.to_string(),
        })
}

pub fn integer(data: &FormData, name: &str) -> Result<i64> {
    let raw = data.get(name).ok_or_else(|| GaraError::MissingFieldError {
        field: name.to_string(),
    })?;

    parse_leading_integer(raw).ok_or_else(|| GaraError::CoercionError {
        field: name.to_string(),
        value: raw.to_string(),
        expected: "an integer".to_string(),
    })
}

/// `{prefix}_1 ..= {prefix}_{len}`, in order.
pub fn sequence(data: &FormData, prefix: &str, len: usize) -> Result<Vec<i64>> {
    (1..=len)
        .map(|i| integer(data, &format!("{prefix}_{i}")))
        .collect()
}

pub fn checkbox(data: &FormData, name: &str) -> bool {
    data.get(name) == Some("on")
}

/// Integer-prefix parsing: skips leading whitespace, accepts a sign, then
/// takes the longest run of ASCII digits. `None` when there are no digits
/// or the value does not fit in an `i64`.
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(matches!(trimmed.as_bytes().first(), Some(b'-' | b'+')));

    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }

    trimmed[..sign_len + digits_len].parse().ok()
}

pub fn authenticate(data: &FormData) -> Result<Payload> {
    let duration = if checkbox(data, "remember_me") {
        REMEMBER_ME_DURATION
    } else {
        DEFAULT_DURATION
    };

    Ok(Payload::new()
        .with("username", text(data, "username")?)
        .with("password", text(data, "password")?)
        .with("duration", duration))
}

pub fn register(data: &FormData) -> Result<Payload> {
    let mut payload = Payload::new()
        .with("username", text(data, "register_username")?)
        .with("password", text(data, "register_password")?);

    if let Some(email) = data.get("register_email") {
        payload.insert("email", email);
    }

    Ok(payload)
}

/// Timing and bonus fields shared by contest creation and update.
fn contest_settings(data: &FormData, mut payload: Payload) -> Result<Payload> {
    payload.insert("start_time", text(data, "start_time")?);
    payload.insert("duration", integer(data, "duration")?);
    payload.insert("drift", integer(data, "drift")?);
    payload.insert("drift_time", integer(data, "drift_time")?);
    payload.insert("jolly_time", integer(data, "jolly_time")?);
    payload.insert(
        "question_bonus",
        sequence(data, "question_bonus", BONUS_SLOTS)?,
    );
    payload.insert("contest_bonus", sequence(data, "contest_bonus", BONUS_SLOTS)?);
    Ok(payload)
}

pub fn create_contest(data: &FormData) -> Result<Payload> {
    let payload = Payload::new()
        .with("phiquadro_id", integer(data, "phiquadro_id")?)
        .with("phiquadro_sess", integer(data, "phiquadro_sess")?)
        .with("name", text(data, "name")?);

    contest_settings(data, payload)
}

pub fn update_contest(data: &FormData) -> Result<Payload> {
    contest_settings(data, Payload::new())
}

pub fn add_team(data: &FormData) -> Result<Payload> {
    Ok(Payload::new().with("team_name", text(data, "team_name")?))
}

pub fn submit_answer(data: &FormData) -> Result<Payload> {
    Ok(Payload::new()
        .with("team_id", integer(data, "team_id")?)
        .with("question_id", integer(data, "question_id")?)
        .with("answer", integer(data, "answer")?))
}

pub fn jolly(data: &FormData) -> Result<Payload> {
    Ok(Payload::new()
        .with("team_id", integer(data, "team_id")?)
        .with("question_id", integer(data, "question_id")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PayloadValue;
    use proptest::prelude::*;

    fn contest_form(bonus: &str) -> FormData {
        let mut data = FormData::new()
            .with("phiquadro_id", "1234")
            .with("phiquadro_sess", "2")
            .with("name", "Gara di Natale")
            .with("start_time", "2024-12-20T15:00")
            .with("duration", "120")
            .with("drift", "3")
            .with("drift_time", "20")
            .with("jolly_time", "10");
        for i in 1..=BONUS_SLOTS {
            data.append(format!("question_bonus_{i}"), bonus);
            data.append(format!("contest_bonus_{i}"), bonus);
        }
        data
    }

    #[test]
    fn leading_integer_parsing() {
        assert_eq!(parse_leading_integer("5"), Some(5));
        assert_eq!(parse_leading_integer("  12abc"), Some(12));
        assert_eq!(parse_leading_integer("-7"), Some(-7));
        assert_eq!(parse_leading_integer("+3"), Some(3));
        assert_eq!(parse_leading_integer("abc"), None);
        assert_eq!(parse_leading_integer(""), None);
        assert_eq!(parse_leading_integer("-"), None);
    }

    #[test]
    fn leading_integer_spans_the_whole_i64_range() {
        assert_eq!(parse_leading_integer("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_leading_integer("9223372036854775807x"), Some(i64::MAX));
        assert_eq!(parse_leading_integer("9223372036854775808"), None);
        assert_eq!(parse_leading_integer("-9223372036854775809"), None);
    }

    fn reference_parse(sign: &str, digits: &str) -> Option<i64> {
        if digits.is_empty() {
            return None;
        }
        let magnitude: i128 = digits.parse().ok()?;
        let value = if sign == "-" { -magnitude } else { magnitude };
        i64::try_from(value).ok()
    }

    proptest! {
        #[test]
        fn leading_integer_matches_reference(
            ws in "[ \t\n]{0,3}",
            sign in prop_oneof![Just(""), Just("+"), Just("-")],
            digits in "[0-9]{0,22}",
            junk in "[a-z .,]{0,6}",
        ) {
            let raw = format!("{ws}{sign}{digits}{junk}");
            prop_assert_eq!(parse_leading_integer(&raw), reference_parse(sign, &digits));
        }

        #[test]
        fn integer_field_accepts_every_i64(n in any::<i64>(), junk in "[a-z]{0,4}") {
            let data = FormData::new().with("answer", format!("{n}{junk}"));
            prop_assert_eq!(integer(&data, "answer").unwrap(), n);
        }
    }

    #[test]
    fn authenticate_without_remember_me_requests_short_token() {
        let data = FormData::new()
            .with("username", "alice")
            .with("password", "x");

        let payload = authenticate(&data).unwrap();
        let json = String::from_utf8(payload.to_json_bytes().unwrap()).unwrap();
        assert_eq!(json, r#"{"username":"alice","password":"x","duration":60}"#);
    }

    #[test]
    fn authenticate_with_remember_me_requests_long_token() {
        let data = FormData::new()
            .with("username", "alice")
            .with("password", "x")
            .with("remember_me", "on");

        let payload = authenticate(&data).unwrap();
        assert_eq!(payload.get("duration"), Some(&PayloadValue::Integer(43_200)));
    }

    #[test]
    fn register_includes_email_only_when_present() {
        let data = FormData::new()
            .with("register_username", "bob")
            .with("register_password", "longpassword");
        assert!(register(&data).unwrap().get("email").is_none());

        let data = data.with("register_email", "bob@example.org");
        assert_eq!(
            register(&data).unwrap().get("email"),
            Some(&PayloadValue::Text("bob@example.org".to_string()))
        );
    }

    #[test]
    fn create_collects_bonus_tables_in_order() {
        let payload = create_contest(&contest_form("5")).unwrap();

        assert_eq!(
            payload.get("question_bonus"),
            Some(&PayloadValue::Sequence(vec![5; BONUS_SLOTS]))
        );
        assert_eq!(
            payload.names().collect::<Vec<_>>(),
            vec![
                "phiquadro_id",
                "phiquadro_sess",
                "name",
                "start_time",
                "duration",
                "drift",
                "drift_time",
                "jolly_time",
                "question_bonus",
                "contest_bonus",
            ]
        );
    }

    #[test]
    fn create_rejects_non_numeric_bonus() {
        let err = create_contest(&contest_form("tanti")).unwrap_err();
        assert!(matches!(
            err,
            GaraError::CoercionError { ref field, .. } if field == "question_bonus_1"
        ));
    }

    #[test]
    fn update_omits_contest_identity() {
        let payload = update_contest(&contest_form("1")).unwrap();
        assert!(payload.get("name").is_none());
        assert!(payload.get("phiquadro_id").is_none());
        assert_eq!(payload.get("duration"), Some(&PayloadValue::Integer(120)));
    }

    #[test]
    fn submission_requires_every_field() {
        let data = FormData::new().with("team_id", "4").with("question_id", "9");
        assert!(matches!(
            submit_answer(&data),
            Err(GaraError::MissingFieldError { ref field }) if field == "answer"
        ));

        let payload = jolly(&data).unwrap();
        assert_eq!(payload.len(), 2);
    }
}
