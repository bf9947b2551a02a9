use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ClientError;

const TIMEOUT: Duration = Duration::from_secs(10);

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(TIMEOUT))
        .build()
        .new_agent()
}

/// Blocking GET returning a decoded JSON body. Non-2xx statuses are errors.
pub(crate) fn get_json<T: DeserializeOwned>(
    url: &str,
    auth_token: Option<&str>,
) -> Result<T, ClientError> {
    let mut req = agent().get(url).header("Accept", "application/json");
    if let Some(token) = auth_token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }
    let mut resp = req.call()?;
    let body = resp.body_mut().read_to_string()?;
    decode(url, &body)
}

/// Blocking JSON POST returning a decoded JSON body.
pub(crate) fn post_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    auth_token: Option<&str>,
    body: &B,
) -> Result<T, ClientError> {
    let payload = serde_json::to_string(body)?;
    let mut req = agent()
        .post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json");
    if let Some(token) = auth_token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }
    let mut resp = req.send(payload)?;
    let body = resp.body_mut().read_to_string()?;
    decode(url, &body)
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ClientError> {
    if body.trim().is_empty() || body.trim() == "null" {
        return Err(ClientError::Empty(url.to_string()));
    }
    Ok(serde_json::from_str(body)?)
}
