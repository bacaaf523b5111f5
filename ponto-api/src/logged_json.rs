//! Logged JSON request guard that captures and logs request bodies.
//!
//! A drop-in replacement for `Json<T>` that logs the parsed body at `info`
//! level. Any `password` field is masked before the body is logged.

use rocket::serde::json::{Json, Value};
use rocket::serde::{Deserialize, Serialize};
use rocket::{
    Data, Request,
    data::{self, FromData},
};

const REDACTED: &str = "***";

/// A wrapper around Rocket's Json that logs the request data.
pub struct LoggedJson<T>(pub T);

impl<T> LoggedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for LoggedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for LoggedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Replaces the value of every `password` key, at any depth.
fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key.eq_ignore_ascii_case("password") {
                    *v = Value::String(REDACTED.to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Serializes `data` for the log line with secrets masked.
fn loggable<T: Serialize>(data: &T) -> Option<String> {
    let mut value = serde_json::to_value(data).ok()?;
    redact(&mut value);
    serde_json::to_string(&value).ok()
}

#[rocket::async_trait]
impl<'r, T: Deserialize<'r> + Serialize> FromData<'r> for LoggedJson<T> {
    type Error = rocket::serde::json::Error<'r>;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        match Json::<T>::from_data(req, data).await {
            data::Outcome::Success(json_data) => {
                match loggable(&json_data.0) {
                    Some(json_string) => info!(
                        "API Request Body: {} {} | Data: {}",
                        req.method().as_str(),
                        req.uri().path(),
                        json_string
                    ),
                    None => info!(
                        "API Request Body: {} {} | Data: <failed to serialize>",
                        req.method().as_str(),
                        req.uri().path()
                    ),
                }
                data::Outcome::Success(LoggedJson(json_data.into_inner()))
            }
            data::Outcome::Error(e) => data::Outcome::Error(e),
            data::Outcome::Forward(f) => data::Outcome::Forward(f),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LoggedJson<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegistrationInput;

    #[test]
    fn test_password_is_redacted() {
        let input = RegistrationInput {
            name: "Maria".to_string(),
            email: "maria@acme.com".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let logged = loggable(&input).unwrap();
        assert!(!logged.contains("hunter2"));
        assert!(logged.contains(r#""password":"***""#));
        assert!(logged.contains("maria@acme.com"));
    }

    #[test]
    fn test_nested_password_is_redacted() {
        let mut value = serde_json::json!({
            "outer": [{ "Password": "secret" }],
            "other": "kept"
        });
        redact(&mut value);
        assert_eq!(value["outer"][0]["Password"], "***");
        assert_eq!(value["other"], "kept");
    }
}
