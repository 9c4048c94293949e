use crate::config::AuthConfig;

/// Supplies the bearer token for each backend call
pub trait TokenSource: Send + Sync {
    /// `None` when no user is signed in.
    fn auth_token(&self) -> Option<String>;
}

/// A token fixed at construction time, e.g. from the command line
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl From<Option<String>> for StaticToken {
    fn from(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenSource for StaticToken {
    fn auth_token(&self) -> Option<String> {
        self.0.clone().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Continue,
    Redirect(String),
}

/// Route guard: unauthenticated requests under the protected prefix are
/// sent to the sign-in page.
pub fn require_auth(path: &str, authenticated: bool, config: &AuthConfig) -> AuthDecision {
    if !authenticated && path.starts_with(&config.protected_prefix) {
        tracing::debug!(path, "redirecting unauthenticated request");
        AuthDecision::Redirect(config.sign_in_path.clone())
    } else {
        AuthDecision::Continue
    }
}
