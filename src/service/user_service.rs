//! User service: password-less login and account lookup.

use std::sync::Arc;

use crate::auth::{IdentityProvider, TokenService};
use crate::domain::{NewUser, User, UserId};
use crate::error::ShareError;
use crate::persistence::UserRepository;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed access token.
    pub token: String,
    /// Display name from the identity provider.
    pub name: String,
    /// Avatar URL from the identity provider.
    pub avatar: String,
}

/// Logs users in through the identity provider and issues access tokens.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
    tokens: Arc<TokenService>,
}

impl UserService {
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityProvider>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            identity,
            tokens,
        }
    }

    /// Redeems an OAuth authorization code and returns a session.
    ///
    /// The account is keyed by email and created on first login.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidRequest`] if either argument is empty,
    /// [`ShareError::IdentityProvider`] if the exchange fails, and
    /// [`ShareError::Internal`] if the token cannot be signed.
    pub async fn login(&self, code: &str, redirect_url: &str) -> Result<Session, ShareError> {
        if code.trim().is_empty() || redirect_url.trim().is_empty() {
            return Err(ShareError::InvalidRequest(
                "code and redirectURL are required".into(),
            ));
        }

        let profile = self.identity.exchange(code, redirect_url).await?;

        let user = match self.users.find_by_email(&profile.email).await? {
            Some(user) => user,
            None => {
                let user = self
                    .users
                    .create(NewUser {
                        name: profile.name.clone(),
                        email: profile.email.clone(),
                    })
                    .await?;
                tracing::info!(user_id = %user.id, "user registered");
                user
            }
        };

        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| ShareError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok(Session {
            token,
            name: profile.name,
            avatar: profile.picture,
        })
    }

    /// Returns the account of an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::UserNotFound`] if the account no longer exists.
    pub async fn me(&self, id: UserId) -> Result<User, ShareError> {
        self.users.get(id).await?.ok_or(ShareError::UserNotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::ExternalProfile;
    use crate::persistence::InMemoryStore;

    #[derive(Debug)]
    struct FixedProfile;

    #[async_trait]
    impl IdentityProvider for FixedProfile {
        async fn exchange(
            &self,
            code: &str,
            _redirect_url: &str,
        ) -> Result<ExternalProfile, ShareError> {
            if code == "bad" {
                return Err(ShareError::IdentityProvider("invalid_grant".into()));
            }
            Ok(ExternalProfile {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                picture: "https://img.example.com/ada.png".to_string(),
            })
        }
    }

    fn service() -> (UserService, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(
            b"user-service-test-secret",
            Duration::from_secs(60),
        ));
        let service = UserService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(FixedProfile),
            Arc::clone(&tokens),
        );
        (service, tokens)
    }

    #[tokio::test]
    async fn first_login_creates_account_and_issues_token() {
        let (service, tokens) = service();
        let Ok(session) = service.login("good", "http://localhost/cb").await else {
            panic!("login failed");
        };
        assert_eq!(session.name, "Ada");
        assert_eq!(session.avatar, "https://img.example.com/ada.png");

        let Ok(claims) = tokens.validate(&session.token) else {
            panic!("issued token should validate");
        };
        let Ok(user_id) = claims.user_id() else {
            panic!("subject should be numeric");
        };
        let Ok(user) = service.me(user_id).await else {
            panic!("user should exist");
        };
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn repeated_login_reuses_account() {
        let (service, tokens) = service();
        let mut subjects = Vec::new();
        for _ in 0..2 {
            let Ok(session) = service.login("good", "http://localhost/cb").await else {
                panic!("login failed");
            };
            let Ok(claims) = tokens.validate(&session.token) else {
                panic!("token should validate");
            };
            subjects.push(claims.sub);
        }
        assert_eq!(subjects.first(), subjects.last());
    }

    #[tokio::test]
    async fn login_rejects_missing_fields_and_bad_codes() {
        let (service, _) = service();
        assert!(matches!(
            service.login("", "http://localhost/cb").await,
            Err(ShareError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.login("good", " ").await,
            Err(ShareError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.login("bad", "http://localhost/cb").await,
            Err(ShareError::IdentityProvider(_))
        ));
    }

    #[tokio::test]
    async fn me_for_unknown_user_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.me(UserId::new(404)).await,
            Err(ShareError::UserNotFound(_))
        ));
    }
}
