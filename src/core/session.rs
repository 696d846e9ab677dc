use std::sync::{Arc, RwLock};

use crate::config::ApiConfig;
use crate::core::gateway::ApiGateway;
use crate::domain::model::Provider;
use crate::domain::ports::SessionStorage;
use crate::utils::error::Result;

pub const TOKEN_KEY: &str = "authToken";
pub const PROFILE_KEY: &str = "providerData";

/// `Loading` only exists between store creation and the completion of
/// `restore`; callers must not treat it as either branch.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Authenticated { token: String, profile: Provider },
}

// The gateway holds a clone of this handle to read the token and clear the
// session on an authentication rejection. The lock is never held across an
// await.
pub(crate) struct Session<S: SessionStorage> {
    storage: S,
    state: RwLock<SessionState>,
}

impl<S: SessionStorage> Session<S> {
    pub(crate) fn new(storage: S) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::Loading),
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state.read().expect("session state lock poisoned").clone()
    }

    pub(crate) fn token(&self) -> Option<String> {
        match &*self.state.read().expect("session state lock poisoned") {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    // Anything short of a complete, well-formed pair resolves to
    // Unauthenticated.
    pub(crate) async fn restore(&self) {
        let token = self.read_or_none(TOKEN_KEY).await;
        let profile_raw = self.read_or_none(PROFILE_KEY).await;

        let next = match (token, profile_raw) {
            (Some(token), Some(raw)) => match serde_json::from_str::<Provider>(&raw) {
                Ok(profile) => SessionState::Authenticated { token, profile },
                Err(e) => {
                    tracing::warn!("Stored profile is unreadable, treating as logged out: {}", e);
                    SessionState::Unauthenticated
                }
            },
            _ => SessionState::Unauthenticated,
        };

        *self.state.write().expect("session state lock poisoned") = next;
    }

    async fn read_or_none(&self, key: &str) -> Option<String> {
        match self.storage.read(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    pub(crate) async fn persist(&self, token: String, profile: Provider) -> Result<()> {
        let raw = serde_json::to_string(&profile)?;
        self.storage.write(TOKEN_KEY, &token).await?;
        if let Err(e) = self.storage.write(PROFILE_KEY, &raw).await {
            // Both keys are written together; roll the token back so a
            // half-written session is never left in storage.
            if let Err(cleanup) = self.storage.remove(TOKEN_KEY).await {
                tracing::warn!("Failed to remove {}: {}", TOKEN_KEY, cleanup);
            }
            return Err(e);
        }

        *self.state.write().expect("session state lock poisoned") =
            SessionState::Authenticated { token, profile };
        Ok(())
    }

    pub(crate) async fn clear(&self) {
        for key in [TOKEN_KEY, PROFILE_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
        }

        *self.state.write().expect("session state lock poisoned") = SessionState::Unauthenticated;
    }
}

pub struct SessionStore<S: SessionStorage> {
    session: Arc<Session<S>>,
    gateway: ApiGateway<S>,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S, config: ApiConfig) -> Result<Self> {
        let session = Arc::new(Session::new(storage));
        let gateway = ApiGateway::new(config, Arc::clone(&session))?;
        Ok(Self { session, gateway })
    }

    pub fn gateway(&self) -> &ApiGateway<S> {
        &self.gateway
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated { .. })
    }

    pub fn profile(&self) -> Option<Provider> {
        match self.state() {
            SessionState::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub async fn restore(&self) {
        self.session.restore().await;
        tracing::debug!("Session restored: authenticated={}", self.is_authenticated());
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Provider> {
        tracing::info!("Login attempt for {}", email);
        let auth = match self.gateway.login(email, password).await {
            Ok(auth) => auth,
            Err(e) => {
                tracing::warn!("Login failed for {}: {}", email, e);
                return Err(e);
            }
        };

        self.session
            .persist(auth.access_token, auth.provider.clone())
            .await?;
        tracing::info!("Login success for {}", email);
        Ok(auth.provider)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        business_name: &str,
        phone: &str,
    ) -> Result<Provider> {
        tracing::info!("Signup attempt for {}", email);
        let auth = match self
            .gateway
            .register(email, password, business_name, phone)
            .await
        {
            Ok(auth) => auth,
            Err(e) => {
                tracing::warn!("Signup failed for {}: {}", email, e);
                return Err(e);
            }
        };

        self.session
            .persist(auth.access_token, auth.provider.clone())
            .await?;
        tracing::info!("Signup success for {}", email);
        Ok(auth.provider)
    }

    pub async fn logout(&self) {
        tracing::info!("Logout");
        self.session.clear().await;
    }

    pub async fn on_unauthorized(&self) {
        self.session.clear().await;
    }
}
