use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::error::{AuthError, DomainError};
use crate::domain::user::User;
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

/// Issued on a successful sign-in; the token is an opaque bearer value to the
/// client and a signed, expiring JWT to the server.
#[derive(Debug)]
pub struct SignedIn {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Clone)]
pub struct AuthService<R: UserRepository + 'static> {
    repo: Arc<R>,
    keys: JwtKeys,
}

impl<R> AuthService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
    }

    /// Validates credentials and issues a token. Unknown email and wrong
    /// password take the same path out so neither the variant nor the message
    /// reveals which one failed.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, DomainError> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self
            .keys
            .issue(user.id)
            .map_err(|err| DomainError::Storage(format!("token issuance failed: {}", err)))?;

        Ok(SignedIn {
            token,
            user_id: user.id,
        })
    }

    /// Out-of-band user provisioning, run at startup when a seed user is
    /// configured. Inserts only when the email is not taken.
    #[instrument(skip(self, password))]
    pub async fn provision_user(&self, email: &str, password: &str) -> Result<(), DomainError> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let hash = hash_password(password)
            .map_err(|err| DomainError::Storage(format!("password hashing failed: {}", err)))?;
        let user = self.repo.create(User::new(email.to_string(), hash)).await?;
        info!(user_id = %user.id, "seed user provisioned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct InMemoryUserRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(&self, user: User) -> Result<User, DomainError> {
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }
    }

    fn service() -> AuthService<InMemoryUserRepository> {
        AuthService::new(
            Arc::new(InMemoryUserRepository::default()),
            JwtKeys::new("test-secret".into(), 1),
        )
    }

    async fn service_with_user(email: &str, password: &str) -> AuthService<InMemoryUserRepository> {
        let service = service();
        service.provision_user(email, password).await.unwrap();
        service
    }

    #[tokio::test]
    async fn correct_credentials_yield_a_verifiable_token() {
        let service = service_with_user("dev@fluxfinance.test", "hunter2!").await;

        let signed_in = service
            .sign_in("dev@fluxfinance.test", "hunter2!")
            .await
            .unwrap();
        assert!(!signed_in.token.is_empty());

        let claims = service.keys().verify(&signed_in.token).unwrap();
        assert_eq!(claims.sub, signed_in.user_id.to_string());
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let service = service_with_user("dev@fluxfinance.test", "hunter2!").await;

        let unknown = service
            .sign_in("ghost@fluxfinance.test", "hunter2!")
            .await
            .unwrap_err();
        let wrong = service
            .sign_in("dev@fluxfinance.test", "wrong")
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.to_string(), "email or password is incorrect");
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let service = service_with_user("dev@fluxfinance.test", "hunter2!").await;

        let err = service
            .sign_in("Dev@Fluxfinance.test", "hunter2!")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "email or password is incorrect");
    }

    #[tokio::test]
    async fn provisioning_twice_keeps_the_first_record() {
        let service = service_with_user("dev@fluxfinance.test", "hunter2!").await;
        service
            .provision_user("dev@fluxfinance.test", "different")
            .await
            .unwrap();

        // The original password still works, so no second record won.
        service
            .sign_in("dev@fluxfinance.test", "hunter2!")
            .await
            .unwrap();
    }
}
