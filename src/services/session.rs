//! Login session management and the auth guard

use tracing::{info, warn};

use crate::api::{IdentityClient, Session, Transport};
use crate::config::{CabinetPaths, Settings};
use crate::error::{CabinetError, CabinetResult};

/// Signs users in and out and keeps the stored session usable
pub struct SessionService<'a> {
    paths: &'a CabinetPaths,
    settings: &'a Settings,
    transport: &'a dyn Transport,
}

impl<'a> SessionService<'a> {
    pub fn new(paths: &'a CabinetPaths, settings: &'a Settings, transport: &'a dyn Transport) -> Self {
        Self {
            paths,
            settings,
            transport,
        }
    }

    fn identity(&self) -> IdentityClient<'_> {
        IdentityClient::new(self.transport, self.settings)
    }

    /// Sign in and persist the session
    pub fn login(&self, email: &str, password: &str) -> CabinetResult<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CabinetError::Validation("email is required".into()));
        }
        if password.is_empty() {
            return Err(CabinetError::Validation("password is required".into()));
        }
        let session = self.identity().sign_in(email, password)?;
        session.save(self.paths)?;
        Ok(session)
    }

    /// Forget the stored session; returns whether one existed
    pub fn logout(&self) -> CabinetResult<bool> {
        let removed = Session::clear(self.paths)?;
        if removed {
            info!("signed out");
        }
        Ok(removed)
    }

    /// The stored session as is, possibly expired
    pub fn current(&self) -> CabinetResult<Option<Session>> {
        Session::load(self.paths)
    }

    /// A session that can be used right now
    ///
    /// Expired sessions are refreshed and written back. A refresh the identity
    /// provider refuses clears the stale session.
    pub fn ensure_valid(&self) -> CabinetResult<Session> {
        let session = self.current()?.ok_or(CabinetError::NotLoggedIn)?;
        if !session.is_expired() {
            return Ok(session);
        }

        info!(email = %session.email, "session expired, refreshing");
        match self.identity().refresh(&session) {
            Ok(fresh) => {
                fresh.save(self.paths)?;
                Ok(fresh)
            }
            Err(CabinetError::Auth(msg)) => {
                warn!(error = %msg, "refresh rejected, clearing session");
                Session::clear(self.paths)?;
                Err(CabinetError::Auth(msg))
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn setup() -> (TempDir, CabinetPaths, Settings) {
        let temp = TempDir::new().unwrap();
        let paths = CabinetPaths::with_base_dir(temp.path().to_path_buf());
        let settings = Settings {
            api_key: "k".into(),
            ..Settings::default()
        };
        (temp, paths, settings)
    }

    fn stored(paths: &CabinetPaths, expires_in: Duration) {
        Session {
            email: "desk@clinic.ma".into(),
            user_id: "u1".into(),
            id_token: "old".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + expires_in,
        }
        .save(paths)
        .unwrap();
    }

    #[test]
    fn test_no_session_is_not_logged_in() {
        let (_t, paths, settings) = setup();
        let mock = MockTransport::new();
        let err = SessionService::new(&paths, &settings, &mock)
            .ensure_valid()
            .unwrap_err();
        assert!(matches!(err, CabinetError::NotLoggedIn));
    }

    #[test]
    fn test_valid_session_untouched() {
        let (_t, paths, settings) = setup();
        stored(&paths, Duration::hours(1));
        let mock = MockTransport::new();
        let session = SessionService::new(&paths, &settings, &mock)
            .ensure_valid()
            .unwrap();
        assert_eq!(session.id_token, "old");
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_expired_session_refreshed_and_saved() {
        let (_t, paths, settings) = setup();
        stored(&paths, Duration::hours(-1));
        let mock = MockTransport::new();
        mock.on_json(
            Method::Post,
            "token",
            serde_json::json!({"id_token": "new", "refresh_token": "r2", "expires_in": "3600", "user_id": "u1"}),
        );
        let service = SessionService::new(&paths, &settings, &mock);
        assert_eq!(service.ensure_valid().unwrap().id_token, "new");
        assert_eq!(service.current().unwrap().unwrap().id_token, "new");
    }

    #[test]
    fn test_rejected_refresh_clears_session() {
        let (_t, paths, settings) = setup();
        stored(&paths, Duration::hours(-1));
        let mock = MockTransport::new();
        mock.on(Method::Post, "token", 400, r#"{"error":{"message":"TOKEN_EXPIRED"}}"#);
        let service = SessionService::new(&paths, &settings, &mock);
        assert!(matches!(service.ensure_valid(), Err(CabinetError::Auth(_))));
        assert!(service.current().unwrap().is_none());
    }

    #[test]
    fn test_login_validates_input() {
        let (_t, paths, settings) = setup();
        let mock = MockTransport::new();
        let service = SessionService::new(&paths, &settings, &mock);
        assert!(service.login(" ", "pw").unwrap_err().is_validation());
        assert!(service.login("a@b.c", "").unwrap_err().is_validation());
        assert!(!service.logout().unwrap());
    }
}
