//! Handlers for the session commands: `login`, `logout`, `whoami` and
//! `navigate`.

use salesdash_core::UserInfo;
use salesdash_session::{Navigation, RouteTable, SessionStore};

const NOT_AVAILABLE: &str = "N/A";

/// Sign in, then report who the session belongs to.
///
/// A profile that fails to load after a successful sign-in is reported as a
/// warning; the session stays signed in.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the token request
/// fails.
pub(crate) async fn run_login(
    store: &SessionStore,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    store.login(email, password).await?;

    let session = store.snapshot();
    println!(
        "signed in as {}",
        UserInfo::display_email(session.user_info.as_ref(), session.login_email.as_deref())
    );
    if session.user_info.is_none() {
        eprintln!(
            "warning: profile could not be loaded: {}",
            session.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

pub(crate) async fn run_logout(store: &SessionStore) {
    if !store.is_authenticated() {
        println!("not signed in; clearing any leftover session data");
    }
    store.logout().await;
    println!("signed out");
}

/// Print the signed-in user's profile and store.
///
/// With a token but no cached profile, the profile is fetched first.
pub(crate) async fn run_whoami(store: &SessionStore) {
    if !store.is_authenticated() {
        println!("not signed in; run `login` first");
        return;
    }

    if store.snapshot().user_info.is_none() {
        if let Err(e) = store.fetch_user_information().await {
            tracing::warn!(error = %e, "could not refresh profile");
        }
    }

    let session = store.snapshot();
    let profile = session.user_info.as_ref().map(|i| &i.user);
    let field = |value: Option<&str>| value.unwrap_or(NOT_AVAILABLE).to_owned();

    println!(
        "Email:       {}",
        UserInfo::display_email(session.user_info.as_ref(), session.login_email.as_deref())
    );
    println!("Name:        {}", field(profile.and_then(|p| p.name.as_deref())));
    println!("User ID:     {}", field(profile.map(|p| p.id.as_str())));
    println!(
        "Status:      {}",
        field(profile.and_then(|p| p.membership_status.as_deref()))
    );
    println!(
        "Currency:    {}",
        field(profile.and_then(|p| p.currency.as_deref()))
    );
    match session.store() {
        Some(store_info) => {
            println!("Marketplace: {}", store_info.marketplace_name);
            println!("Store ID:    {}", store_info.store_id);
        }
        None => println!("Store:       {NOT_AVAILABLE}"),
    }
}

/// Print where a navigation to `path` lands for the current session.
///
/// # Errors
///
/// Returns an error if no route matches or the redirects never settle.
pub(crate) fn run_navigate(store: &SessionStore, path: &str) -> anyhow::Result<()> {
    let table = RouteTable::default();
    match table.navigate(path, store.is_authenticated()) {
        Navigation::Arrived(route) if route.path == path => println!("{path}"),
        Navigation::Arrived(route) => println!("{path} -> {}", route.path),
        Navigation::NotFound(missing) => anyhow::bail!("no route matches '{missing}'"),
        Navigation::RedirectLoop(start) => {
            anyhow::bail!("redirects starting at '{start}' never settled")
        }
    }
    Ok(())
}
