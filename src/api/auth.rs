//! Identity provider sign-in and the persisted session
//!
//! The backend trusts bearer tokens minted by a Firebase-compatible identity
//! provider. We sign in with email and password over its REST API, keep the
//! id and refresh tokens in `session.json` and refresh them when they expire.

use std::fmt;
use std::fs;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::transport::{ApiRequest, Method, Transport};
use crate::config::{CabinetPaths, Settings};
use crate::error::{CabinetError, CabinetResult};

/// Tokens are treated as expired this long before their real expiry
const EXPIRY_SKEW_SECS: i64 = 60;

/// A signed-in user's tokens
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Session {
    #[zeroize(skip)]
    pub email: String,

    #[zeroize(skip)]
    pub user_id: String,

    pub id_token: String,

    pub refresh_token: String,

    #[zeroize(skip)]
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("user_id", &self.user_id)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Claims of the id token, if it decodes
    pub fn claims(&self) -> Option<TokenClaims> {
        decode_claims(&self.id_token).ok()
    }

    /// Read `session.json`; `None` when nobody is signed in
    pub fn load(paths: &CabinetPaths) -> CabinetResult<Option<Self>> {
        let path = paths.session_file();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| CabinetError::Io(format!("Failed to read session file: {}", e)))?;
        let session = serde_json::from_str(&contents)
            .map_err(|e| CabinetError::Auth(format!("Corrupt session file: {}", e)))?;
        Ok(Some(session))
    }

    /// Write `session.json`, readable by the owner only
    pub fn save(&self, paths: &CabinetPaths) -> CabinetResult<()> {
        paths.ensure_directories()?;
        let path = paths.session_file();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)
            .map_err(|e| CabinetError::Io(format!("Failed to write session file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .map_err(|e| CabinetError::Io(format!("Failed to protect session file: {}", e)))?;
        }

        Ok(())
    }

    /// Remove `session.json`; returns whether one existed
    pub fn clear(paths: &CabinetPaths) -> CabinetResult<bool> {
        let path = paths.session_file();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .map_err(|e| CabinetError::Io(format!("Failed to remove session file: {}", e)))?;
        Ok(true)
    }
}

/// The parts of the id token payload we display
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, rename = "sub")]
    pub subject: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    /// Expiry, seconds since the epoch
    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default, rename = "iat")]
    pub issued_at: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Decode a JWT payload without verifying it
///
/// Only used for display; the backend does the verification.
pub fn decode_claims(token: &str) -> CabinetResult<TokenClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| CabinetError::Auth("Malformed token".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CabinetError::Auth(format!("Malformed token payload: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CabinetError::Auth(format!("Malformed token claims: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

fn expiry_from(expires_in: &str) -> CabinetResult<DateTime<Utc>> {
    let secs: i64 = expires_in
        .trim()
        .parse()
        .map_err(|_| CabinetError::Auth(format!("Unexpected token lifetime: {}", expires_in)))?;
    Ok(Utc::now() + Duration::seconds(secs))
}

/// Talks to the identity provider
pub struct IdentityClient<'a> {
    transport: &'a dyn Transport,
    identity_url: String,
    token_url: String,
    api_key: String,
}

impl<'a> IdentityClient<'a> {
    pub fn new(transport: &'a dyn Transport, settings: &Settings) -> Self {
        Self {
            transport,
            identity_url: settings.identity_url.trim_end_matches('/').to_string(),
            token_url: settings.token_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    fn require_key(&self) -> CabinetResult<&str> {
        if self.api_key.trim().is_empty() {
            return Err(CabinetError::Auth(
                "No identity provider API key configured. \
                 Run 'cabinet config set api_key <KEY>' or set CABINET_API_KEY."
                    .into(),
            ));
        }
        Ok(&self.api_key)
    }

    /// Exchange email and password for a session
    pub fn sign_in(&self, email: &str, password: &str) -> CabinetResult<Session> {
        let key = self.require_key()?;
        let url = format!("{}/accounts:signInWithPassword?key={}", self.identity_url, key);
        let request = ApiRequest::new(Method::Post, url).json(json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        }));

        debug!(email, "signing in");
        let response = self
            .transport
            .send(&request)
            .and_then(|r| r.error_for_status())
            .map_err(auth_error)?;
        let parsed: SignInResponse = serde_json::from_str(&response.body)?;

        info!(email, "signed in");
        Ok(Session {
            email: parsed.email.unwrap_or_else(|| email.to_string()),
            user_id: parsed.local_id,
            expires_at: expiry_from(&parsed.expires_in)?,
            id_token: parsed.id_token,
            refresh_token: parsed.refresh_token,
        })
    }

    /// Trade the refresh token for a fresh id token
    pub fn refresh(&self, session: &Session) -> CabinetResult<Session> {
        let key = self.require_key()?;
        let url = format!("{}/token?key={}", self.token_url, key);
        let request = ApiRequest::new(Method::Post, url).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", session.refresh_token.as_str()),
        ]);

        debug!(email = %session.email, "refreshing session");
        let response = self
            .transport
            .send(&request)
            .and_then(|r| r.error_for_status())
            .map_err(auth_error)?;
        let parsed: RefreshResponse = serde_json::from_str(&response.body)?;

        Ok(Session {
            email: session.email.clone(),
            user_id: parsed.user_id,
            expires_at: expiry_from(&parsed.expires_in)?,
            id_token: parsed.id_token,
            refresh_token: parsed.refresh_token,
        })
    }
}

/// Identity provider rejections are reported as auth errors
fn auth_error(err: CabinetError) -> CabinetError {
    match err {
        CabinetError::Validation(msg) | CabinetError::Unauthorized(msg) => {
            CabinetError::Auth(friendly_auth_message(&msg))
        }
        other => other,
    }
}

fn friendly_auth_message(code: &str) -> String {
    match code.split(':').next().unwrap_or(code).trim() {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password".to_string()
        }
        "USER_DISABLED" => "This account has been disabled".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => {
            "Session expired. Run 'cabinet login' again.".to_string()
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, try again later".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use tempfile::TempDir;

    fn settings() -> Settings {
        Settings {
            api_key: "test-key".into(),
            identity_url: "https://id.test/v1".into(),
            token_url: "https://token.test/v1".into(),
            ..Settings::default()
        }
    }

    fn token_with(payload: &str) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
    }

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            email: "desk@clinic.ma".into(),
            user_id: "u1".into(),
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at,
        }
    }

    #[test]
    fn test_sign_in() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Post,
            "accounts:signInWithPassword",
            serde_json::json!({
                "idToken": "tok", "refreshToken": "ref", "expiresIn": "3600",
                "localId": "u1", "email": "desk@clinic.ma"
            }),
        );
        let settings = settings();
        let client = IdentityClient::new(&mock, &settings);
        let session = client.sign_in("desk@clinic.ma", "secret").unwrap();

        assert_eq!(session.user_id, "u1");
        assert!(!session.is_expired());
        let sent = mock.last_request().unwrap();
        assert!(sent.url.ends_with("?key=test-key"));
        match sent.body {
            crate::api::transport::Body::Json(body) => assert_eq!(body["returnSecureToken"], true),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_bad_password_is_auth_error() {
        let mock = MockTransport::new();
        mock.on(
            Method::Post,
            "accounts:signInWithPassword",
            400,
            r#"{"error":{"code":400,"message":"INVALID_PASSWORD"}}"#,
        );
        let settings = settings();
        let err = IdentityClient::new(&mock, &settings)
            .sign_in("desk@clinic.ma", "wrong")
            .unwrap_err();
        assert_eq!(err.to_string(), "Authentication error: Invalid email or password");
    }

    #[test]
    fn test_missing_api_key() {
        let mock = MockTransport::new();
        let settings = Settings::default();
        let err = IdentityClient::new(&mock, &settings)
            .sign_in("a@b.c", "x")
            .unwrap_err();
        assert!(matches!(err, CabinetError::Auth(_)));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_refresh_uses_form_body() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Post,
            "token",
            serde_json::json!({
                "id_token": "new", "refresh_token": "ref2", "expires_in": "3600", "user_id": "u1"
            }),
        );
        let settings = settings();
        let old = session(Utc::now() - Duration::hours(1));
        let fresh = IdentityClient::new(&mock, &settings).refresh(&old).unwrap();

        assert_eq!(fresh.id_token, "new");
        assert_eq!(fresh.email, "desk@clinic.ma");
        match mock.last_request().unwrap().body {
            crate::api::transport::Body::Form(pairs) => {
                assert!(pairs.contains(&("grant_type".to_string(), "refresh_token".to_string())));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_expiry_skew() {
        let now = Utc::now();
        assert!(session(now + Duration::seconds(30)).is_expired_at(now));
        assert!(!session(now + Duration::minutes(10)).is_expired_at(now));
    }

    #[test]
    fn test_session_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let paths = CabinetPaths::with_base_dir(temp.path().to_path_buf());
        assert!(Session::load(&paths).unwrap().is_none());

        session(Utc::now()).save(&paths).unwrap();
        let loaded = Session::load(&paths).unwrap().unwrap();
        assert_eq!(loaded.email, "desk@clinic.ma");

        assert!(Session::clear(&paths).unwrap());
        assert!(!Session::clear(&paths).unwrap());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let text = format!("{:?}", session(Utc::now()));
        assert!(text.contains("<redacted>"));
        assert!(!text.contains("refresh\""));
    }

    #[test]
    fn test_decode_claims() {
        let token = token_with(r#"{"email":"dr@clinic.ma","sub":"u9","role":"ADMIN","exp":1700000000}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("dr@clinic.ma"));
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
        assert!(claims.expires_at().is_some());
        assert!(decode_claims("not-a-jwt").is_err());
    }
}
