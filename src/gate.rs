//! Access check in front of the protected views.

use crate::models::users::User;
use crate::settings::GateSettings;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect {
        login_path: String,
        return_url: String,
    },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }

    /// Login location including the encoded `returnUrl`, for redirects.
    pub fn location(&self) -> Option<String> {
        match self {
            GateDecision::Allow => None,
            GateDecision::Redirect {
                login_path,
                return_url,
            } => Some(format!(
                "{}?returnUrl={}",
                login_path,
                urlencoding::encode(return_url)
            )),
        }
    }
}

pub fn check_access(
    session: Option<&User>,
    requested_path: &str,
    login_path: &str,
) -> GateDecision {
    match session {
        Some(_) => GateDecision::Allow,
        None => GateDecision::Redirect {
            login_path: login_path.to_string(),
            return_url: requested_path.to_string(),
        },
    }
}

/// Where to go after signing in. Only local absolute paths are honored.
pub fn resolve_return_url(return_url: Option<&str>, default_url: &str) -> String {
    match return_url.map(str::trim) {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url.to_string(),
        _ => default_url.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct AccessGate {
    login_path: String,
    default_return_url: String,
}

impl AccessGate {
    pub fn new(settings: &GateSettings) -> Self {
        Self {
            login_path: settings.login_path.clone(),
            default_return_url: settings.default_return_url.clone(),
        }
    }

    pub fn check(&self, session: Option<&User>, requested_path: &str) -> GateDecision {
        check_access(session, requested_path, &self.login_path)
    }

    pub fn after_login(&self, return_url: Option<&str>) -> String {
        resolve_return_url(return_url, &self.default_return_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 1,
            email: "demo@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_signed_in_users_are_allowed() {
        let user = user();
        let decision = check_access(Some(&user), "/expenses", "/login");

        assert!(decision.is_allowed());
        assert_eq!(decision.location(), None);
    }

    #[test]
    fn test_anonymous_users_are_redirected_with_return_url() {
        let decision = check_access(None, "/reports?month=1", "/login");

        assert_eq!(
            decision,
            GateDecision::Redirect {
                login_path: "/login".to_string(),
                return_url: "/reports?month=1".to_string(),
            }
        );
        assert_eq!(
            decision.location().as_deref(),
            Some("/login?returnUrl=%2Freports%3Fmonth%3D1")
        );
    }

    #[test]
    fn test_return_url_falls_back_for_foreign_targets() {
        assert_eq!(resolve_return_url(Some("/goals"), "/dashboard"), "/goals");
        assert_eq!(resolve_return_url(None, "/dashboard"), "/dashboard");
        assert_eq!(
            resolve_return_url(Some("https://example.com"), "/dashboard"),
            "/dashboard"
        );
        assert_eq!(
            resolve_return_url(Some("//example.com"), "/dashboard"),
            "/dashboard"
        );
    }

    #[test]
    fn test_gate_uses_configured_paths() {
        let gate = AccessGate::new(&GateSettings {
            login_path: "/auth/login".to_string(),
            default_return_url: "/home".to_string(),
        });

        assert_eq!(
            gate.check(None, "/budgets").location().as_deref(),
            Some("/auth/login?returnUrl=%2Fbudgets")
        );
        assert_eq!(gate.after_login(None), "/home");
    }
}
