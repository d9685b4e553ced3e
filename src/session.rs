use std::sync::Arc;

/// Source of the opaque bearer token used to authenticate the realtime
/// connection.
///
/// The client reads the token once per connect; acquisition and refresh
/// belong to the embedding application's session store. Returning `None`
/// is the expected pre-login state and makes `connect()` a silent no-op.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        self()
    }
}

/// Fixed token, mostly useful for demos and tests
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider with no token (pre-login state)
    pub fn absent() -> Self {
        Self { token: None }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Convenience alias for the injected provider handle
pub type SharedTokenProvider = Arc<dyn TokenProvider>;
