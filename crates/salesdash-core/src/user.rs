//! Signed-in user profile as held by the session and persisted under the
//! `userInfo` key.

use serde::{Deserialize, Serialize};

/// Placeholder shown when no email is known for the current session.
pub const MISSING_EMAIL: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_status: Option<String>,
    /// The seller store sales queries run against. Absent until the profile
    /// endpoint reports at least one store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub store_id: String,
    pub marketplace_name: String,
}

impl UserInfo {
    /// Email to show on the dashboard: the profile email when present,
    /// otherwise the address used at login, otherwise [`MISSING_EMAIL`].
    #[must_use]
    pub fn display_email<'a>(info: Option<&'a UserInfo>, login_email: Option<&'a str>) -> &'a str {
        info.map(|i| i.user.email.as_str())
            .filter(|e| !e.is_empty())
            .or(login_email)
            .unwrap_or(MISSING_EMAIL)
    }
}
