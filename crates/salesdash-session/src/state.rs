//! Session state and its pure reducer.
//!
//! [`Session::apply`] never touches storage. The persistence side of a
//! mutation is described separately by [`Mutation::persistence`] and carried
//! out by [`sync_persistence`], so the reducer can be exercised without any
//! storage at all.

use salesdash_core::{DailySalesRecord, StoreInfo, UserInfo};

use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY, LOGIN_EMAIL_KEY, USER_INFO_KEY};

/// The signed-in user's client-side state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// Kept apart from `user_info` so the email is known before the
    /// profile fetch completes.
    pub login_email: Option<String>,
    /// True exactly while a login request is in flight.
    pub is_loading: bool,
    pub error: Option<String>,
    pub daily_sales_data: Vec<DailySalesRecord>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// The store sales queries run against, if the profile has one.
    #[must_use]
    pub fn store(&self) -> Option<&StoreInfo> {
        self.user_info.as_ref().and_then(|info| info.user.store.as_ref())
    }

    /// Builds the start-up session from the persisted fields.
    ///
    /// A `userInfo` entry that no longer parses is logged and ignored rather
    /// than failing start-up.
    #[must_use]
    pub fn rehydrate(storage: &dyn KeyValueStore) -> Self {
        let user_info = storage.get(USER_INFO_KEY).and_then(|raw| {
            serde_json::from_str::<UserInfo>(&raw)
                .map_err(|e| {
                    tracing::warn!(error = %e, "rehydrate: ignoring unreadable persisted userInfo");
                })
                .ok()
        });

        Self {
            access_token: storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty()),
            user_info,
            login_email: storage.get(LOGIN_EMAIL_KEY).filter(|e| !e.is_empty()),
            ..Self::default()
        }
    }

    /// Applies one mutation. Empty token and email strings are stored as
    /// absent so `is_authenticated` never reports a blank token.
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::SetAccessToken(token) => {
                self.access_token = token.filter(|t| !t.is_empty());
            }
            Mutation::SetUserInfo(info) => self.user_info = info,
            Mutation::SetLoginEmail(email) => {
                self.login_email = email.filter(|e| !e.is_empty());
            }
            Mutation::SetLoading(loading) => self.is_loading = loading,
            Mutation::SetError(error) => self.error = error,
            Mutation::SetDailySalesData(records) => self.daily_sales_data = records,
        }
    }
}

/// Every way the session may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetAccessToken(Option<String>),
    SetUserInfo(Option<UserInfo>),
    SetLoginEmail(Option<String>),
    SetLoading(bool),
    SetError(Option<String>),
    /// Replaces the whole series; records are never merged.
    SetDailySalesData(Vec<DailySalesRecord>),
}

/// A storage write implied by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOp {
    Set { key: &'static str, value: String },
    Remove { key: &'static str },
}

impl Mutation {
    /// The storage write that keeps the persisted copy in step with this
    /// mutation, or `None` for fields that are not persisted.
    #[must_use]
    pub fn persistence(&self) -> Option<PersistOp> {
        match self {
            Mutation::SetAccessToken(token) => Some(set_or_remove(ACCESS_TOKEN_KEY, token.as_deref())),
            Mutation::SetLoginEmail(email) => Some(set_or_remove(LOGIN_EMAIL_KEY, email.as_deref())),
            Mutation::SetUserInfo(None) => Some(PersistOp::Remove { key: USER_INFO_KEY }),
            Mutation::SetUserInfo(Some(info)) => match serde_json::to_string(info) {
                Ok(value) => Some(PersistOp::Set {
                    key: USER_INFO_KEY,
                    value,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "could not serialize userInfo; dropping persisted copy");
                    Some(PersistOp::Remove { key: USER_INFO_KEY })
                }
            },
            Mutation::SetLoading(_) | Mutation::SetError(_) | Mutation::SetDailySalesData(_) => None,
        }
    }
}

fn set_or_remove(key: &'static str, value: Option<&str>) -> PersistOp {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => PersistOp::Set {
            key,
            value: v.to_owned(),
        },
        None => PersistOp::Remove { key },
    }
}

/// Carries out a persistence step. Storage is treated as always available:
/// a failed write is logged and the in-memory session stays authoritative.
pub fn sync_persistence(storage: &dyn KeyValueStore, op: PersistOp) {
    let (key, result) = match op {
        PersistOp::Set { key, value } => (key, storage.set(key, &value)),
        PersistOp::Remove { key } => (key, storage.remove(key)),
    };
    if let Err(e) = result {
        tracing::warn!(key, error = %e, "failed to persist session field");
    }
}
