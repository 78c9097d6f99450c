use crate::storage::{keys, Storage};
use anyhow::Result;
use serde_json::json;
use time::OffsetDateTime;

/// Credentials of the simulated signed-in user. There is no authentication
/// server; any well-formed OTP yields a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub phone_number: String,
    pub country: String,
    pub token: String,
}

impl AuthSession {
    /// Issue a session with a fresh simulated token.
    pub fn issue(phone_number: impl Into<String>, country: impl Into<String>) -> Self {
        let now_ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self {
            phone_number: phone_number.into(),
            country: country.into(),
            token: format!("fake-token-{now_ms}"),
        }
    }
}

/// Persist the session under the auth keys.
pub async fn persist(storage: &mut Storage, session: &AuthSession) -> Result<()> {
    storage.put(keys::AUTH_TOKEN, json!(session.token)).await?;
    storage
        .put(keys::PHONE_NUMBER, json!(session.phone_number))
        .await?;
    storage.put(keys::COUNTRY_CODE, json!(session.country)).await?;
    Ok(())
}

/// Restore a previously saved session, if all keys are present.
pub fn restore(storage: &Storage) -> Option<AuthSession> {
    let token = storage.get_str(keys::AUTH_TOKEN)?;
    let phone_number = storage.get_str(keys::PHONE_NUMBER)?;
    let country = storage.get_str(keys::COUNTRY_CODE)?;
    Some(AuthSession {
        phone_number: phone_number.to_string(),
        country: country.to_string(),
        token: token.to_string(),
    })
}

/// Clear the auth keys on logout.
pub async fn clear(storage: &mut Storage) -> Result<()> {
    storage.remove(keys::AUTH_TOKEN).await?;
    storage.remove(keys::PHONE_NUMBER).await?;
    storage.remove(keys::COUNTRY_CODE).await?;
    Ok(())
}
