//! Navigation gate: decides, from cookie presence alone, whether a path may be
//! shown or where to send the user instead. The cookie's validity is the
//! backend's business.

use serde::Serialize;

pub const ROOT_PATH: &str = "/";
pub const SIGN_IN_PATH: &str = "/signin";
pub const SIGN_UP_PATH: &str = "/signup";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "lowercase")]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Strip query, fragment and a trailing slash
fn normalize(path: &str) -> &str {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    let path = &path[..end];
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

fn is_auth_route(path: &str) -> bool {
    path == SIGN_IN_PATH || path == SIGN_UP_PATH
}

/// Paths the gate applies to: `/`, `/signin`, `/signup` and `/dashboard/*`
pub fn is_guarded(path: &str) -> bool {
    let path = normalize(path);
    path.is_empty()
        || path == ROOT_PATH
        || is_auth_route(path)
        || path == DASHBOARD_PATH
        || path.starts_with("/dashboard/")
}

pub fn classify(authenticated: bool, path: &str) -> GateDecision {
    if !is_guarded(path) {
        return GateDecision::Allow;
    }

    let path = normalize(path);
    let is_root = path.is_empty() || path == ROOT_PATH;

    if !authenticated {
        if is_auth_route(path) {
            GateDecision::Allow
        } else {
            GateDecision::Redirect(SIGN_IN_PATH)
        }
    } else if is_root || is_auth_route(path) {
        GateDecision::Redirect(DASHBOARD_PATH)
    } else {
        GateDecision::Allow
    }
}

pub fn is_session_cookie_name(name: &str, cookie_name: &str) -> bool {
    name == cookie_name
        || name
            .strip_prefix("__Secure-")
            .map_or(false, |rest| rest == cookie_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_dashboard_redirects_to_signin() {
        assert_eq!(classify(false, "/dashboard"), GateDecision::Redirect(SIGN_IN_PATH));
        assert_eq!(
            classify(false, "/dashboard/recipients/abc-123"),
            GateDecision::Redirect(SIGN_IN_PATH)
        );
        assert_eq!(classify(false, "/"), GateDecision::Redirect(SIGN_IN_PATH));
    }

    #[test]
    fn test_unauthenticated_may_reach_auth_routes() {
        assert_eq!(classify(false, "/signin"), GateDecision::Allow);
        assert_eq!(classify(false, "/signup"), GateDecision::Allow);
        assert_eq!(classify(false, "/signin?next=%2Fdashboard"), GateDecision::Allow);
    }

    #[test]
    fn test_authenticated_auth_routes_and_root_redirect_to_dashboard() {
        assert_eq!(classify(true, "/signin"), GateDecision::Redirect(DASHBOARD_PATH));
        assert_eq!(classify(true, "/signup/"), GateDecision::Redirect(DASHBOARD_PATH));
        assert_eq!(classify(true, "/"), GateDecision::Redirect(DASHBOARD_PATH));
    }

    #[test]
    fn test_authenticated_dashboard_allowed() {
        assert_eq!(classify(true, "/dashboard"), GateDecision::Allow);
        assert_eq!(classify(true, "/dashboard/custom-games"), GateDecision::Allow);
    }

    #[test]
    fn test_unguarded_paths_pass_through() {
        assert!(!is_guarded("/about"));
        assert!(!is_guarded("/dashboards"));
        assert_eq!(classify(false, "/about"), GateDecision::Allow);
        assert_eq!(classify(false, "/dashboards"), GateDecision::Allow);
        assert_eq!(classify(true, "/signing"), GateDecision::Allow);
    }

    #[test]
    fn test_session_cookie_name_accepts_secure_prefix() {
        let name = "better-auth.session_token";
        assert!(is_session_cookie_name("better-auth.session_token", name));
        assert!(is_session_cookie_name("__Secure-better-auth.session_token", name));
        assert!(!is_session_cookie_name("__Host-better-auth.session_token", name));
        assert!(!is_session_cookie_name("theme", name));
    }
}
