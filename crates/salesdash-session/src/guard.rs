//! Pre-navigation route guard and the dashboard's route table.

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Hops allowed while following redirects before giving up.
const MAX_REDIRECTS: usize = 8;

/// What a route demands of the session before it may be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRequirement {
    /// Only signed-in users.
    RequiresAuth,
    /// Only signed-out users.
    RequiresGuest,
    #[default]
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Decides whether a navigation proceeds or is redirected.
#[must_use]
pub fn evaluate(requirement: RouteRequirement, is_authenticated: bool) -> GuardDecision {
    match requirement {
        RouteRequirement::RequiresAuth if !is_authenticated => GuardDecision::Redirect(LOGIN_PATH),
        RouteRequirement::RequiresGuest if is_authenticated => {
            GuardDecision::Redirect(DASHBOARD_PATH)
        }
        _ => GuardDecision::Proceed,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: Option<&'static str>,
    pub path: &'static str,
    pub requirement: RouteRequirement,
    /// Static redirect applied before the guard runs.
    pub redirect_to: Option<&'static str>,
}

/// Where a navigation attempt ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<'a> {
    Arrived(&'a Route),
    NotFound(String),
    /// Redirects kept bouncing; carries the path originally requested.
    RedirectLoop(String),
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    /// `/` sends visitors to the login page, `/login` is guest-only and
    /// `/dashboard` needs a signed-in session.
    fn default() -> Self {
        Self::new(vec![
            Route {
                name: None,
                path: "/",
                requirement: RouteRequirement::Public,
                redirect_to: Some(LOGIN_PATH),
            },
            Route {
                name: Some("login"),
                path: LOGIN_PATH,
                requirement: RouteRequirement::RequiresGuest,
                redirect_to: None,
            },
            Route {
                name: Some("dashboard"),
                path: DASHBOARD_PATH,
                requirement: RouteRequirement::RequiresAuth,
                redirect_to: None,
            },
        ])
    }
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == Some(name))
    }

    /// Exact path match, ignoring a trailing slash on anything but `/`.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Option<&Route> {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let path = if path.is_empty() { "/" } else { path };
        self.routes.iter().find(|r| r.path == path)
    }

    /// Follows static redirects and guard decisions from `path` until a
    /// route is entered.
    #[must_use]
    pub fn navigate(&self, path: &str, is_authenticated: bool) -> Navigation<'_> {
        let mut target = path;
        for _ in 0..MAX_REDIRECTS {
            let Some(route) = self.resolve_path(target) else {
                return Navigation::NotFound(target.to_owned());
            };
            if let Some(next) = route.redirect_to {
                target = next;
                continue;
            }
            match evaluate(route.requirement, is_authenticated) {
                GuardDecision::Proceed => return Navigation::Arrived(route),
                GuardDecision::Redirect(next) => {
                    tracing::debug!(from = route.path, to = next, "route guard redirect");
                    target = next;
                }
            }
        }
        Navigation::RedirectLoop(path.to_owned())
    }
}
