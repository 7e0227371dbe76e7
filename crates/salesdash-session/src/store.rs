//! The session store: the single owner of [`Session`] state.
//!
//! Mutations are synchronous and atomic: the pure reducer and the implied
//! persistence step both run under the state lock. Actions are
//! async workflows that call the API and commit mutations. The state lock
//! is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use salesdash_core::{DailySalesRecord, SalesSource, UserInfo};

use crate::client::DashboardClient;
use crate::error::{SessionError, MISSING_SESSION_CONTEXT};
use crate::fixture::fixture_daily_sales;
use crate::normalize::{normalize_user, shape_daily_sales};
use crate::state::{sync_persistence, Mutation, Session};
use crate::storage::KeyValueStore;
use crate::types::DailySalesQuery;

pub struct SessionStore {
    client: DashboardClient,
    storage: Arc<dyn KeyValueStore>,
    sales_source: SalesSource,
    state: Mutex<Session>,
    /// Serializes `login` and `logout` so overlapping auth workflows cannot
    /// interleave their token, loading, and error writes.
    auth_flight: tokio::sync::Mutex<()>,
}

impl SessionStore {
    /// Creates a store rehydrated from the persisted fields in `storage`.
    #[must_use]
    pub fn new(
        client: DashboardClient,
        storage: Arc<dyn KeyValueStore>,
        sales_source: SalesSource,
    ) -> Self {
        let session = Session::rehydrate(storage.as_ref());
        tracing::debug!(
            authenticated = session.is_authenticated(),
            "session rehydrated from storage"
        );
        Self::with_session(client, storage, sales_source, session)
    }

    /// Creates a store around an explicit starting session. Storage is not
    /// read and is only written by later mutations.
    #[must_use]
    pub fn with_session(
        client: DashboardClient,
        storage: Arc<dyn KeyValueStore>,
        sales_source: SalesSource,
        session: Session,
    ) -> Self {
        Self {
            client,
            storage,
            sales_source,
            state: Mutex::new(session),
            auth_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Read-only copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Returns every field to its initial value, clearing persisted entries.
    pub fn reset(&self) {
        self.set_access_token(None);
        self.set_user_info(None);
        self.set_login_email(None);
        self.set_loading(false);
        self.set_error(None);
        self.set_daily_sales_data(Vec::new());
    }

    /// Applies a mutation to the state, then mirrors it to storage.
    ///
    /// The state lock is held until the storage write finishes, so commits
    /// reach storage in the same order they reach the session.
    pub fn commit(&self, mutation: Mutation) {
        let persist = mutation.persistence();
        let mut state = self.lock();
        state.apply(mutation);
        if let Some(op) = persist {
            sync_persistence(self.storage.as_ref(), op);
        }
    }

    pub fn set_access_token(&self, token: Option<String>) {
        self.commit(Mutation::SetAccessToken(token));
    }

    pub fn set_user_info(&self, info: Option<UserInfo>) {
        self.commit(Mutation::SetUserInfo(info));
    }

    pub fn set_login_email(&self, email: Option<String>) {
        self.commit(Mutation::SetLoginEmail(email));
    }

    pub fn set_loading(&self, loading: bool) {
        self.commit(Mutation::SetLoading(loading));
    }

    pub fn set_error(&self, error: Option<String>) {
        self.commit(Mutation::SetError(error));
    }

    pub fn set_daily_sales_data(&self, records: Vec<DailySalesRecord>) {
        self.commit(Mutation::SetDailySalesData(records));
    }

    /// Signs in and then loads the profile.
    ///
    /// `is_loading` is true for the duration and reset on every exit path.
    /// A failed profile fetch is logged and does not fail the login: the
    /// session keeps its token, possibly without a profile.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Authentication`] (`"Login failed"`) when the token
    ///   endpoint rejects the credentials.
    /// - [`SessionError::Network`] / [`SessionError::Deserialize`] on
    ///   transport or decoding failure of the token request.
    ///
    /// The error message is also recorded in [`Session::error`].
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let _flight = self.auth_flight.lock().await;
        tracing::info!(email, "login started");

        self.set_loading(true);
        self.set_error(None);

        let result = self.authenticate(email, password).await;
        if let Err(e) = &result {
            tracing::warn!(email, error = %e, "login failed");
            self.set_error(Some(e.to_string()));
        }

        self.set_loading(false);
        result
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let token = self.client.request_token(email, password).await?;
        self.set_access_token(Some(token.access_token));
        self.set_login_email(Some(email.to_owned()));
        tracing::info!(email, "login succeeded");

        if let Err(e) = self.fetch_user_information().await {
            tracing::warn!(email, error = %e, "profile fetch after login failed; staying signed in");
        }
        Ok(())
    }

    /// Loads and commits the signed-in user's profile.
    ///
    /// Resolves immediately, without a request, when either the access
    /// token or the login email is absent.
    ///
    /// # Errors
    ///
    /// - [`SessionError::ProfileFetch`] on a non-2xx status or an
    ///   application-level failure, with the server's message when given.
    /// - [`SessionError::Network`] / [`SessionError::Deserialize`] on
    ///   transport or decoding failure.
    ///
    /// The error message is also recorded in [`Session::error`].
    pub async fn fetch_user_information(&self) -> Result<(), SessionError> {
        let credentials = {
            let state = self.lock();
            state.access_token.clone().zip(state.login_email.clone())
        };
        let Some((token, email)) = credentials else {
            tracing::debug!("skipping profile fetch: no access token or login email");
            return Ok(());
        };

        match self.client.fetch_user_information(&token, &email).await {
            Ok(remote) => {
                let info = normalize_user(remote);
                tracing::debug!(
                    user_id = %info.user.id,
                    has_store = info.user.store.is_some(),
                    "profile loaded"
                );
                self.set_user_info(Some(info));
                Ok(())
            }
            Err(e) => {
                self.set_error(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Ends the session.
    ///
    /// With a token present, the server is notified on a best-effort basis;
    /// any failure there is logged only. The token, profile, and login email
    /// are cleared unconditionally.
    pub async fn logout(&self) {
        let _flight = self.auth_flight.lock().await;

        let token = self.lock().access_token.clone();
        match token {
            Some(token) => {
                if let Err(e) = self.client.logout(&token).await {
                    tracing::warn!(error = %e, "logout notification failed; clearing session anyway");
                }
            }
            None => tracing::debug!("logout without a token: nothing to notify"),
        }

        self.set_access_token(None);
        self.set_user_info(None);
        self.set_login_email(None);
        tracing::info!("session cleared");
    }

    /// Loads the most recent `day` days of sales and replaces the series.
    ///
    /// Loading indicators for this path belong to the caller; `is_loading`
    /// is not touched.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Precondition`] (`"Missing authentication or store
    ///   information"`) when there is no token or no store. Nothing in the
    ///   session changes in that case.
    /// - Any client or fixture error; its message is recorded in
    ///   [`Session::error`].
    pub async fn fetch_daily_sales_data(&self, day: u32) -> Result<(), SessionError> {
        let context = {
            let state = self.lock();
            state.access_token.clone().zip(state.store().cloned())
        };
        let Some((token, store)) = context else {
            return Err(SessionError::Precondition(MISSING_SESSION_CONTEXT.to_owned()));
        };

        let raw = match self.sales_source {
            SalesSource::Fixture => fixture_daily_sales(),
            SalesSource::Live => {
                let query = DailySalesQuery::new(&store, day);
                self.client.daily_sales_overview(&token, &query).await
            }
        };

        match raw {
            Ok(items) => {
                let records = shape_daily_sales(items, day);
                tracing::debug!(
                    day,
                    source = %self.sales_source,
                    records = records.len(),
                    store_id = %store.store_id,
                    "daily sales loaded"
                );
                self.set_daily_sales_data(records);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(day, error = %e, "daily sales fetch failed");
                self.set_error(Some(e.to_string()));
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
