use thiserror::Error;

/// Message recorded when the token endpoint rejects the credentials.
pub const LOGIN_FAILED: &str = "Login failed";

/// Message recorded when the profile endpoint fails without saying why.
pub const PROFILE_FETCH_FAILED: &str = "Failed to fetch user information";

/// Message for sales fetches attempted without a token or a store.
pub const MISSING_SESSION_CONTEXT: &str = "Missing authentication or store information";

/// Errors surfaced by session actions.
///
/// The first three variants display as their bare message because that
/// text is what ends up in [`Session::error`](crate::Session::error) for
/// the view to show verbatim.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Credentials rejected or the token response was unusable.
    #[error("{0}")]
    Authentication(String),

    /// The profile endpoint failed; carries the server message when given.
    #[error("{0}")]
    ProfileFetch(String),

    /// A required session field was absent before a dependent action.
    #[error("{0}")]
    Precondition(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with `ApiStatus: false`.
    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
