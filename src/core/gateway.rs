use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{endpoints, ApiConfig};
use crate::core::session::Session;
use crate::domain::model::{
    ApiResponse, AuthData, ChtBalance, LoginRequest, NewService, Provider, ServiceListing,
    SignupRequest, WalletDetails, WalletTransaction,
};
use crate::domain::ports::SessionStorage;
use crate::utils::error::{ProviderError, Result};

pub const DEFAULT_TRANSACTION_LIMIT: u32 = 10;

pub struct ApiGateway<S: SessionStorage> {
    client: Client,
    base_url: String,
    session: Arc<Session<S>>,
}

impl<S: SessionStorage> ApiGateway<S> {
    pub(crate) fn new(config: ApiConfig, session: Arc<Session<S>>) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);

        match self.session.token() {
            Some(token) => request = request.bearer_auth(token),
            None => tracing::debug!("No auth token, sending {} {} unauthenticated", method, path),
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("API request: {} {}", method, path);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Request to {} rejected as unauthorized, clearing session", path);
            self.session.clear().await;
            return Err(ProviderError::Unauthorized {
                message: extract_message(&text)
                    .unwrap_or_else(|| "Authentication required".to_string()),
            });
        }

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: extract_message(&text)
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        match envelope {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiResponse { message, .. } => Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| "Request failed".to_string()),
            }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        business_name: &str,
        phone: &str,
    ) -> Result<AuthData> {
        let body = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: business_name.to_string(),
            phone: phone.to_string(),
        };
        self.post(endpoints::PROVIDER_SIGNUP, &body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post(endpoints::PROVIDER_LOGIN, &body).await
    }

    pub async fn get_profile(&self) -> Result<Provider> {
        self.get(endpoints::PROVIDER_PROFILE).await
    }

    /// Tolerant read: any failure yields an empty list instead of an error.
    pub async fn get_all_services(&self) -> Result<Vec<ServiceListing>> {
        match self.get(endpoints::SERVICES_LIST).await {
            Ok(services) => Ok(services),
            Err(e) => {
                tracing::debug!("Service list unavailable, returning empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Tolerant read, same policy as `get_all_services`.
    pub async fn get_provider_services(&self) -> Result<Vec<ServiceListing>> {
        match self.get(endpoints::PROVIDER_SERVICES).await {
            Ok(services) => Ok(services),
            Err(e) => {
                tracing::debug!("Provider service list unavailable, returning empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn add_service(&self, service: &NewService) -> Result<ServiceListing> {
        self.post(endpoints::PROVIDER_SERVICES, service).await
    }

    pub async fn get_wallet_details(&self) -> Result<WalletDetails> {
        self.get(endpoints::WALLET_DETAILS).await
    }

    pub async fn get_wallet_transactions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<WalletTransaction>> {
        let limit = limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT);
        let path = format!("{}?limit={}", endpoints::WALLET_TRANSACTIONS, limit);
        self.get(&path).await
    }

    pub async fn get_cht_balance(&self) -> Result<ChtBalance> {
        self.get(endpoints::WALLET_CHT_BALANCE).await
    }
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{SessionState, SessionStore, PROFILE_KEY, TOKEN_KEY};
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        values: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MockStorage {
        async fn seed(&self, key: &str, value: &str) {
            self.values
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
        }

        async fn get(&self, key: &str) -> Option<String> {
            self.values.lock().await.get(key).cloned()
        }
    }

    impl SessionStorage for MockStorage {
        async fn read(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().await.get(key).cloned())
        }

        async fn write(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.values.lock().await.remove(key);
            Ok(())
        }
    }

    fn provider_json() -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "name": "Acme Charging",
            "email": "a@b.com",
            "phone": "555-0100"
        })
    }

    async fn authenticated_store(server: &MockServer) -> (SessionStore<MockStorage>, MockStorage) {
        let storage = MockStorage::default();
        storage.seed(TOKEN_KEY, "T").await;
        storage
            .seed(PROFILE_KEY, &provider_json().to_string())
            .await;

        let store =
            SessionStore::new(storage.clone(), ApiConfig::new(server.base_url())).unwrap();
        store.restore().await;
        assert!(store.is_authenticated());
        (store, storage)
    }

    #[tokio::test]
    async fn test_login_stores_token_and_profile() {
        let server = MockServer::start();
        let login_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/provider/login")
                .json_body(serde_json::json!({"email": "a@b.com", "password": "pw"}));
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "data": {
                    "access_token": "T",
                    "provider": provider_json()
                }
            }));
        });

        let storage = MockStorage::default();
        let store =
            SessionStore::new(storage.clone(), ApiConfig::new(server.base_url())).unwrap();
        store.restore().await;

        let profile = store.login("a@b.com", "pw").await.unwrap();

        login_mock.assert();
        assert_eq!(profile.id, 1);
        assert!(store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).await.as_deref(), Some("T"));
        assert!(storage.get(PROFILE_KEY).await.is_some());
    }

    #[tokio::test]
    async fn test_login_business_error_leaves_state_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/provider/login");
            then.status(200).json_body(serde_json::json!({
                "success": false,
                "message": "Invalid credentials"
            }));
        });

        let storage = MockStorage::default();
        let store =
            SessionStore::new(storage.clone(), ApiConfig::new(server.base_url())).unwrap();
        store.restore().await;

        let err = store.login("a@b.com", "wrong").await.unwrap_err();
        match err {
            ProviderError::ApiError { message, .. } => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected ApiError, got {:?}", other),
        }
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(storage.get(TOKEN_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_register_returns_token_immediately() {
        let server = MockServer::start();
        let signup_mock = server.mock(|when, then| {
            when.method(POST).path("/provider/signup").json_body(serde_json::json!({
                "email": "a@b.com",
                "password": "pw",
                "name": "Acme Charging",
                "phone": "555-0100"
            }));
            then.status(201).json_body(serde_json::json!({
                "success": true,
                "data": {
                    "access_token": "T2",
                    "provider": provider_json()
                }
            }));
        });

        let storage = MockStorage::default();
        let store =
            SessionStore::new(storage.clone(), ApiConfig::new(server.base_url())).unwrap();
        store.restore().await;

        store
            .register("a@b.com", "pw", "Acme Charging", "555-0100")
            .await
            .unwrap();

        signup_mock.assert();
        assert!(store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).await.as_deref(), Some("T2"));
    }

    #[tokio::test]
    async fn test_bearer_token_attached_to_authenticated_requests() {
        let server = MockServer::start();
        let profile_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/provider/profile")
                .header("authorization", "Bearer T");
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "data": provider_json()
            }));
        });

        let (store, _storage) = authenticated_store(&server).await;
        let profile = store.gateway().get_profile().await.unwrap();

        profile_mock.assert();
        assert_eq!(profile.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_storage() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wallet");
            then.status(401)
                .json_body(serde_json::json!({"success": false, "message": "Token expired"}));
        });

        let (store, storage) = authenticated_store(&server).await;
        let err = store.gateway().get_wallet_details().await.unwrap_err();

        match err {
            ProviderError::Unauthorized { message } => assert_eq!(message, "Token expired"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(storage.get(TOKEN_KEY).await.is_none());
        assert!(storage.get(PROFILE_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_list_services_tolerates_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services");
            then.status(500);
        });

        let (store, _storage) = authenticated_store(&server).await;
        let services = store.gateway().get_all_services().await.unwrap();
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn test_provider_services_tolerates_missing_endpoint() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/provider/services");
            then.status(404);
        });

        let (store, _storage) = authenticated_store(&server).await;
        let services = store.gateway().get_provider_services().await.unwrap();
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn test_add_service_propagates_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/provider/services");
            then.status(500)
                .json_body(serde_json::json!({"success": false, "message": "Database down"}));
        });

        let (store, _storage) = authenticated_store(&server).await;
        let payload = NewService {
            service_type: crate::domain::model::ServiceType::Charger,
            status: "active".to_string(),
            address: "Main St 1".to_string(),
            city: "Springfield".to_string(),
            state: "".to_string(),
            postal_code: "".to_string(),
            country: "".to_string(),
            latitude: "37.774929".to_string(),
            longitude: "-122.419416".to_string(),
            hourly_rate: "2.50".to_string(),
        };

        let err = store.gateway().add_service(&payload).await.unwrap_err();
        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database down");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wallet_transactions_limit_query() {
        let server = MockServer::start();
        let txs_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/wallet/transactions")
                .query_param("limit", "5");
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "data": [{"id": 1, "txHash": "0xabc", "amount": "12.5"}]
            }));
        });

        let (store, _storage) = authenticated_store(&server).await;
        let txs = store
            .gateway()
            .get_wallet_transactions(Some(5))
            .await
            .unwrap();

        txs_mock.assert();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].tx_hash.as_deref(), Some("0xabc"));
    }

    #[tokio::test]
    async fn test_wallet_transactions_default_limit_is_ten() {
        let server = MockServer::start();
        let txs_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/wallet/transactions")
                .query_param("limit", "10");
            then.status(200)
                .json_body(serde_json::json!({"success": true, "data": []}));
        });

        let (store, _storage) = authenticated_store(&server).await;
        let txs = store.gateway().get_wallet_transactions(None).await.unwrap();

        txs_mock.assert();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn test_cht_balance() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/wallet/cht-balance")
                .header("authorization", "Bearer T");
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "data": {"balance": "42.0"}
            }));
        });

        let (store, _storage) = authenticated_store(&server).await;
        let balance = store.gateway().get_cht_balance().await.unwrap();
        assert_eq!(balance.balance, "42.0");
    }

    #[tokio::test]
    async fn test_slow_response_fails_with_timeout_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wallet");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(serde_json::json!({"success": true, "data": {}}));
        });

        let storage = MockStorage::default();
        storage.seed(TOKEN_KEY, "T").await;
        storage
            .seed(PROFILE_KEY, &provider_json().to_string())
            .await;
        let config =
            ApiConfig::new(server.base_url()).with_timeout(Duration::from_millis(50));
        let store = SessionStore::new(storage, config).unwrap();
        store.restore().await;

        let err = store.gateway().get_wallet_details().await.unwrap_err();
        match &err {
            ProviderError::HttpError(e) => assert!(e.is_timeout()),
            other => panic!("expected HttpError, got {:?}", other),
        }
        assert_eq!(err.user_message(), "Request timed out. Please try again.");
        // A transport failure is not an authentication rejection.
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_non_json_error_body_gets_status_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wallet");
            then.status(502).body("upstream unavailable");
        });

        let (store, _storage) = authenticated_store(&server).await;
        let err = store.gateway().get_wallet_details().await.unwrap_err();
        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Request failed with status 502 Bad Gateway");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_request_sent_without_header() {
        let server = MockServer::start();
        let profile_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/provider/profile")
                .matches(|req| {
                    !req.headers
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .any(|(name, _)| name.eq_ignore_ascii_case("authorization"))
                });
            then.status(401)
                .json_body(serde_json::json!({"success": false, "message": "No token"}));
        });

        let storage = MockStorage::default();
        let store =
            SessionStore::new(storage, ApiConfig::new(server.base_url())).unwrap();
        store.restore().await;

        let err = store.gateway().get_profile().await.unwrap_err();
        profile_mock.assert();
        assert!(matches!(err, ProviderError::Unauthorized { .. }));
    }
}
