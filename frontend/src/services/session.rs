use serde::{Deserialize, Serialize};

/// Storage key holding the connected user
pub const USER_KEY: &str = "user";
/// Storage key holding the bearer token issued at login
pub const TOKEN_KEY: &str = "jwt";

/// The connected user, as written to local storage by the login page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(rename = "type")]
    pub user_type: String,
    pub email: String,
}

impl Session {
    pub fn new(user_type: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_type: user_type.into(),
            email: email.into(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read the connected user from `window.localStorage`
    pub fn from_local_storage() -> Option<Self> {
        let raw = local_storage_item(USER_KEY)?;
        match Self::from_json(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Ignoring malformed user in local storage: {}", e);
                None
            }
        }
    }
}

/// Read a value from `window.localStorage`
pub fn local_storage_item(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}
