//! Client-side session layer for the sales dashboard.
//!
//! [`SessionStore`] owns the authenticated session, persists the durable
//! fields through a [`KeyValueStore`], and runs the login, profile,
//! logout, and daily-sales workflows against the dashboard API.
//! [`guard`] decides where a navigation attempt lands given the session's
//! authentication flag.

pub mod client;
pub mod error;
pub mod fixture;
pub mod guard;
pub mod normalize;
pub mod state;
pub mod storage;
pub mod store;
pub mod types;

pub use client::{ClientCredentials, DashboardClient};
pub use error::SessionError;
pub use guard::{evaluate, GuardDecision, Navigation, Route, RouteRequirement, RouteTable};
pub use normalize::{normalize_user, shape_daily_sales};
pub use state::{Mutation, PersistOp, Session};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::SessionStore;
