//! Dashboard API wire types.
//!
//! Every endpoint wraps its payload in a `{"ApiStatus": ..., "Data": ...}`
//! envelope; [`ApiEnvelope`] captures that pattern generically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiEnvelope<T> {
    /// `Some(false)` marks an application-level failure even on HTTP 2xx.
    pub api_status: Option<bool>,
    pub api_status_message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.api_status == Some(false)
    }
}

/// Some identifiers arrive as JSON strings on one endpoint and numbers on
/// another; both are kept as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

impl std::fmt::Display for StringOrNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StringOrNumber::Str(s) => f.write_str(s),
            StringOrNumber::Num(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /oauth/token
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TokenRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub grant_type: &'a str,
    pub scope: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
}

/// `RefreshToken` and `ExpiresAt` are decoded but nothing refreshes or
/// expires the session with them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TokenData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /user/user-information
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UserInformationRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UserInformationData {
    pub user: RemoteUser,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub user_id: StringOrNumber,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub account_status: Option<StringOrNumber>,
    #[serde(default)]
    pub store: Vec<RemoteStore>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStore {
    pub store_id: StringOrNumber,
    pub marketplace_name: String,
    #[serde(default)]
    pub currency: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /data/daily-sales-overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesQuery {
    pub marketplace: String,
    pub seller_id: String,
    pub request_status: u8,
    pub day: u32,
    #[serde(rename = "excludeYoYData")]
    pub exclude_yoy_data: bool,
    pub custom_date_data: Option<serde_json::Value>,
}

impl DailySalesQuery {
    #[must_use]
    pub fn new(store: &salesdash_core::StoreInfo, day: u32) -> Self {
        Self {
            marketplace: store.marketplace_name.clone(),
            seller_id: store.store_id.clone(),
            request_status: 0,
            day,
            exclude_yoy_data: true,
            custom_date_data: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DailySalesOverviewData {
    #[serde(default, rename = "item", alias = "items")]
    pub items: Vec<RemoteDailySales>,
}

/// One raw day as the API (or the bundled fixture) reports it. Any numeric
/// field may be missing or `null`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDailySales {
    pub date: String,
    #[serde(default)]
    pub profit: Option<Decimal>,
    #[serde(default)]
    pub fba_amount: Option<Decimal>,
    #[serde(default)]
    pub fbm_amount: Option<Decimal>,
    #[serde(default)]
    pub fba_shipping_amount: Option<Decimal>,
}
