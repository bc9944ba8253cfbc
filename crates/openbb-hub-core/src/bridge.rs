//! Session bridge between a local OpenBB install and the hub.
//!
//! `SessionBridge` logs in (email and password, or a personal access
//! token), keeps the resulting `Session`, and uses it to pull and push the
//! user's settings. Translation between hub feature keys and local
//! credentials goes through the static table in `keymap`.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::{HubClient, HubError, HubRequest, HubTransport, Result};
use crate::auth::session::LoginResponse;
use crate::auth::{Credentials, Session, TokenClaims};
use crate::config::HubConfig;
use crate::keymap;
use crate::models::{HubUserSettings, UserSettingsWire};

// ============================================================================
// Endpoints
// ============================================================================

const LOGIN_PATH: &str = "/login";
const SDK_LOGIN_PATH: &str = "/sdk/login";
const LOGOUT_PATH: &str = "/logout";
const USER_SETTINGS_GET_PATH: &str = "/terminal/user";
const USER_SETTINGS_PUT_PATH: &str = "/user";

const MISSING_CREDENTIALS: &str = "Please provide 'email' and 'password' or 'pat'";

pub struct SessionBridge<T: HubTransport> {
    transport: T,
    session: Option<Session>,
}

impl SessionBridge<HubClient> {
    /// Bridge over the real hub using the given config
    pub fn from_config(config: HubConfig) -> Result<Self> {
        Ok(Self::new(HubClient::new(&config)?))
    }
}

impl<T: HubTransport> SessionBridge<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: None,
        }
    }

    /// Wrap an already established session
    pub fn with_session(transport: T, session: Session) -> Self {
        Self {
            transport,
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn active_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(HubError::not_connected)
    }

    /// Log in and hold the resulting session.
    ///
    /// Empty arguments count as not supplied. Email and password win when
    /// both they and a token are supplied.
    pub async fn connect(
        &mut self,
        email: Option<&str>,
        password: Option<&str>,
        pat: Option<&str>,
    ) -> Result<&Session> {
        let email = email.filter(|e| !e.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let pat = pat.filter(|t| !t.trim().is_empty());

        let session = match (email, password, pat) {
            (Some(email), Some(password), _) => {
                self.session_from_email_password(email, password).await?
            }
            (_, _, Some(pat)) => self.session_from_platform_token(pat).await?,
            _ => return Err(HubError::InvalidArgument(MISSING_CREDENTIALS.to_string())),
        };

        info!(username = %session.username(), "Connected to hub");
        Ok(self.session.insert(session))
    }

    async fn session_from_email_password(&self, email: &str, password: &str) -> Result<Session> {
        let request = HubRequest::post("login", LOGIN_PATH).json(json!({
            "email": email,
            "password": password,
            "remember": true,
        }));

        let response = self.transport.send(request).await?.error_for_status()?;
        Session::from_login(response.json::<LoginResponse>()?)
    }

    async fn session_from_platform_token(&self, token: &str) -> Result<Session> {
        let claims = TokenClaims::decode(token)?;
        claims.check_expiration()?;

        let request =
            HubRequest::post("sdk_login", SDK_LOGIN_PATH).json(json!({ "token": token }));

        let response = self.transport.send(request).await?.error_for_status()?;
        let session = Session::from_login(response.json::<LoginResponse>()?)?;
        Ok(session.with_expiry(claims.expires_at()))
    }

    /// Invalidate the held session on the hub and drop it.
    ///
    /// The session is gone afterwards whatever the hub answers; the return
    /// value only says whether the hub confirmed the logout.
    pub async fn disconnect(&mut self) -> Result<bool> {
        let Some(session) = self.session.take() else {
            debug!("Disconnect requested with no active session");
            return Ok(false);
        };

        let request = HubRequest::get("logout", LOGOUT_PATH).authorization(session.authorization());
        let response = self.transport.send(request).await?;

        if response.is_ok() {
            info!(username = %session.username(), "Disconnected from hub");
            Ok(true)
        } else {
            warn!(status = response.status, "Hub did not confirm logout");
            Ok(false)
        }
    }

    /// Fetch the user's settings document
    pub async fn pull_settings(&self) -> Result<HubUserSettings> {
        let session = self.active_session()?;
        let request = HubRequest::get("get_user_settings", USER_SETTINGS_GET_PATH)
            .authorization(session.authorization());

        let response = self.transport.send(request).await?;
        if !response.is_ok() {
            warn!(status = response.status, "Hub rejected settings request");
        }
        let response = response.error_for_status()?;

        let settings = HubUserSettings::from(response.json::<UserSettingsWire>()?);
        debug!(keys = settings.features_keys.len(), "Pulled user settings");
        Ok(settings)
    }

    /// Upload a settings document; true iff the hub accepted it
    pub async fn push_settings(&self, settings: &HubUserSettings) -> Result<bool> {
        let session = self.active_session()?;
        let request = HubRequest::put("put_user_settings", USER_SETTINGS_PUT_PATH)
            .authorization(session.authorization())
            .json(settings.to_json());

        let response = self.transport.send(request).await?;
        if !response.is_ok() {
            warn!(status = response.status, "Hub rejected settings update");
        }
        Ok(response.is_ok())
    }

    /// Pull settings and translate them to local credentials
    pub async fn pull_credentials(&self) -> Result<Credentials> {
        let settings = self.pull_settings().await?;
        Ok(Self::hub_to_local(&settings))
    }

    /// Translate local credentials and push them to the hub
    pub async fn push_credentials(&self, credentials: &Credentials) -> Result<bool> {
        let settings = Self::local_to_hub(credentials);
        self.push_settings(&settings).await
    }

    pub fn hub_to_local(settings: &HubUserSettings) -> Credentials {
        keymap::hub_to_local(settings)
    }

    pub fn local_to_hub(credentials: &Credentials) -> HubUserSettings {
        keymap::local_to_hub(credentials)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use reqwest::Method;
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::api::HubResponse;
    use crate::auth::token::SAMPLE_PAT;

    /// Replays canned responses and records every request it is given
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<HubResponse>>,
        requests: Mutex<Vec<HubRequest>>,
    }

    impl MockTransport {
        fn replying(responses: Vec<HubResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HubRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HubTransport for MockTransport {
        async fn send(&self, request: HubRequest) -> Result<HubResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request"))
        }
    }

    const LOGIN_BODY: &str = r#"{
        "access_token": "token",
        "token_type": "Bearer",
        "uuid": "uuid",
        "email": "email",
        "username": "username",
        "primary_usage": "primary_usage"
    }"#;

    fn active_bridge(responses: Vec<HubResponse>) -> SessionBridge<MockTransport> {
        let session = Session::new(SecretString::from("token".to_string()), "Bearer");
        SessionBridge::with_session(MockTransport::replying(responses), session)
    }

    #[tokio::test]
    async fn test_connect_without_credentials() {
        let mut bridge = SessionBridge::new(MockTransport::default());

        let cases = [
            (None, None, None),
            (Some("a@b.c"), None, None),
            (None, Some("pw"), None),
            (Some(""), Some(""), None),
            (Some("a@b.c"), Some(""), None),
            (None, None, Some("")),
            (Some(""), Some(""), Some("   ")),
        ];
        for (email, password, pat) in cases {
            let err = bridge.connect(email, password, pat).await.unwrap_err();
            assert!(err.is_invalid_argument());
            assert_eq!(err.to_string(), "Please provide 'email' and 'password' or 'pat'");
        }
        assert!(!bridge.is_connected());
        assert!(bridge.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_connect_with_email_password() {
        let mut bridge =
            SessionBridge::new(MockTransport::replying(vec![HubResponse::new(200, LOGIN_BODY)]));

        let session = bridge
            .connect(Some("test@example.com"), Some("password"), None)
            .await
            .unwrap();
        assert_eq!(session.username(), "username");
        assert_eq!(session.authorization(), "Bearer token");
        assert!(bridge.is_connected());

        let requests = bridge.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].label, "login");
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/login");
        assert_eq!(
            requests[0].body,
            Some(json!({"email": "test@example.com", "password": "password", "remember": true}))
        );
        assert!(requests[0].authorization.is_none());
    }

    #[tokio::test]
    async fn test_connect_rejected() {
        let mut bridge = SessionBridge::new(MockTransport::replying(vec![HubResponse::new(
            401,
            r#"{"detail": "Incorrect email or password"}"#,
        )]));

        let err = bridge.connect(Some("a@b.c"), Some("wrong"), None).await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("Incorrect email or password"));
        assert!(!bridge.is_connected());
    }

    #[tokio::test]
    async fn test_connect_with_pat() {
        let mut bridge =
            SessionBridge::new(MockTransport::replying(vec![HubResponse::new(200, LOGIN_BODY)]));

        let session = bridge.connect(None, None, Some(SAMPLE_PAT)).await.unwrap();
        assert_eq!(session.access_token().expose_secret(), "token");
        assert_eq!(session.token_type(), "Bearer");
        assert_eq!(session.user_uuid(), "uuid");
        assert_eq!(session.username(), "username");
        assert_eq!(session.email(), "email");
        assert_eq!(session.primary_usage(), "primary_usage");
        assert!(session.expires_at().is_none());

        let requests = bridge.transport().requests();
        assert_eq!(requests[0].path, "/sdk/login");
        assert_eq!(requests[0].body, Some(json!({ "token": SAMPLE_PAT })));
    }

    #[tokio::test]
    async fn test_connect_prefers_email_password() {
        let mut bridge =
            SessionBridge::new(MockTransport::replying(vec![HubResponse::new(200, LOGIN_BODY)]));

        bridge.connect(Some("a@b.c"), Some("pw"), Some(SAMPLE_PAT)).await.unwrap();
        assert_eq!(bridge.transport().requests()[0].path, "/login");
    }

    #[tokio::test]
    async fn test_connect_empty_email_password_falls_back_to_pat() {
        let mut bridge =
            SessionBridge::new(MockTransport::replying(vec![HubResponse::new(200, LOGIN_BODY)]));

        bridge.connect(Some(""), Some(""), Some(SAMPLE_PAT)).await.unwrap();

        let requests = bridge.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/sdk/login");
        assert!(bridge.is_connected());
    }

    #[tokio::test]
    async fn test_connect_with_expired_pat() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"access_token": "token", "exp": 1000}"#);
        let expired = format!("eyJhbGciOiJub25lIn0.{}.sig", payload);
        let mut bridge = SessionBridge::new(MockTransport::default());

        let err = bridge.connect(None, None, Some(expired.as_str())).await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("expired"));
        assert!(!bridge.is_connected());
        assert!(bridge.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_connect_with_malformed_pat() {
        let mut bridge = SessionBridge::new(MockTransport::default());

        let err = bridge.connect(None, None, Some("pat")).await.unwrap_err();
        assert!(err.is_invalid_argument());

        let err = bridge.connect(None, None, Some("a.!!!.c")).await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(bridge.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect() {
        let mut bridge = active_bridge(vec![HubResponse::new(200, r#"{"success": true}"#)]);

        assert!(bridge.disconnect().await.unwrap());
        assert!(!bridge.is_connected());

        let requests = bridge.transport().requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].path, "/logout");
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer token"));
    }

    #[tokio::test]
    async fn test_disconnect_not_confirmed_still_clears() {
        let mut bridge = active_bridge(vec![HubResponse::new(500, "")]);

        assert!(!bridge.disconnect().await.unwrap());
        assert!(!bridge.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_when_absent_is_noop() {
        let mut bridge = SessionBridge::new(MockTransport::default());

        assert!(!bridge.disconnect().await.unwrap());
        assert!(bridge.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_operations_require_session() {
        let bridge = SessionBridge::new(MockTransport::default());

        assert!(bridge.pull_settings().await.unwrap_err().is_authentication());
        assert!(bridge
            .push_settings(&HubUserSettings::default())
            .await
            .unwrap_err()
            .is_authentication());
        assert!(bridge.pull_credentials().await.unwrap_err().is_authentication());
        assert!(bridge.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_pull_settings() {
        let bridge = active_bridge(vec![HubResponse::new(
            200,
            r#"{"features_keys": {"API_FRED_KEY": "fred"}}"#,
        )]);

        let settings = bridge.pull_settings().await.unwrap();
        assert_eq!(
            settings.features_keys.get("API_FRED_KEY").map(|s| s.expose_secret()),
            Some("fred")
        );

        let requests = bridge.transport().requests();
        assert_eq!(requests[0].path, "/terminal/user");
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer token"));
    }

    #[tokio::test]
    async fn test_pull_settings_empty_body() {
        let bridge = active_bridge(vec![HubResponse::new(200, "{}")]);
        assert_eq!(bridge.pull_settings().await.unwrap(), HubUserSettings::default());
    }

    #[tokio::test]
    async fn test_pull_settings_rejected() {
        let bridge = active_bridge(vec![HubResponse::new(403, r#"{"detail": "Forbidden"}"#)]);

        let err = bridge.pull_settings().await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("Forbidden"));
    }

    #[tokio::test]
    async fn test_push_settings() {
        let bridge = active_bridge(vec![HubResponse::new(200, ""), HubResponse::new(400, "")]);
        let credentials: Credentials = [("polygon_api_key", "polygon")].into_iter().collect();

        assert!(bridge.push_credentials(&credentials).await.unwrap());
        assert!(!bridge.push_credentials(&credentials).await.unwrap());

        let requests = bridge.transport().requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].path, "/user");
        assert_eq!(
            requests[0].body,
            Some(json!({"features_keys": {"API_POLYGON_KEY": "polygon"}}))
        );
    }

    #[tokio::test]
    async fn test_pull_credentials() {
        let bridge = active_bridge(vec![HubResponse::new(
            200,
            r#"{"features_keys": {
                "API_KEY_FINANCIALMODELINGPREP": "fmp",
                "API_POLYGON_KEY": "polygon",
                "API_FRED_KEY": "fred",
                "API_UNKNOWN": "dropped"
            }}"#,
        )]);

        let credentials = bridge.pull_credentials().await.unwrap();
        assert_eq!(credentials.len(), 3);
        assert_eq!(credentials.get("fmp_api_key").map(|s| s.expose_secret()), Some("fmp"));
        assert_eq!(credentials.get("polygon_api_key").map(|s| s.expose_secret()), Some("polygon"));
        assert_eq!(credentials.get("fred_api_key").map(|s| s.expose_secret()), Some("fred"));
    }
}
