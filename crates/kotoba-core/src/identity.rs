use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use tracing::{info, warn};
use uuid::Uuid;

use kotoba_db::Database;
use kotoba_db::models::CredentialRow;
use kotoba_types::api::Claims;

use crate::error::DiaryError;

const MIN_PASSWORD_LEN: usize = 6;

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

/// Authenticates users and checks session tokens. Calls may block.
pub trait IdentityProvider: Send + Sync {
    /// Email/password sign-in; an unknown email is signed up instead.
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, DiaryError>;

    fn verify(&self, token: &str) -> Result<Identity, DiaryError>;
}

/// Argon2id credentials in the local database, HS256 session tokens.
pub struct PasswordIdentity {
    db: Arc<Database>,
    jwt_secret: String,
    session_ttl: chrono::Duration,
}

impl PasswordIdentity {
    pub fn new(db: Arc<Database>, jwt_secret: impl Into<String>, session_ttl: chrono::Duration) -> Self {
        Self {
            db,
            jwt_secret: jwt_secret.into(),
            session_ttl,
        }
    }

    /// Create a credential for a new email. `None` when another sign-up for
    /// the same email got there first.
    fn sign_up(&self, email: &str, password: &str) -> Result<Option<Identity>, DiaryError> {
        if !email.contains('@') {
            return Err(DiaryError::AuthFailure("invalid email".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DiaryError::AuthFailure(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        // Hash password with Argon2id
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DiaryError::Internal(format!("password hashing failed: {}", e)))?
            .to_string();

        let user_id = Uuid::new_v4().to_string();
        let created = self
            .db
            .create_credential(&user_id, email, &password_hash)
            .map_err(DiaryError::StoreUnavailable)?;
        if !created {
            warn!("Concurrent sign-up for {}, checking the stored credential", email);
            return Ok(None);
        }

        info!("Signed up {} as {}", email, user_id);
        Ok(Some(Identity {
            user_id,
            email: email.to_string(),
        }))
    }

    fn lookup(&self, email: &str) -> Result<Option<CredentialRow>, DiaryError> {
        self.db
            .get_credential_by_email(email)
            .map_err(DiaryError::StoreUnavailable)
    }

    fn check_password(credential: CredentialRow, password: &str) -> Result<Identity, DiaryError> {
        let parsed_hash = PasswordHash::new(&credential.password).map_err(|e| {
            DiaryError::StoreUnavailable(anyhow!("corrupt password hash for {}: {}", credential.id, e))
        })?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| DiaryError::AuthFailure("wrong email or password".into()))?;

        Ok(Identity {
            user_id: credential.id,
            email: credential.email,
        })
    }

    fn create_token(&self, identity: &Identity) -> Result<String, DiaryError> {
        let claims = Claims {
            sub: identity.user_id.clone(),
            email: identity.email.clone(),
            exp: (chrono::Utc::now() + self.session_ttl).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| DiaryError::AuthFailure(format!("could not issue session: {}", e)))
    }
}

impl IdentityProvider for PasswordIdentity {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, DiaryError> {
        let identity = match self.lookup(email)? {
            Some(credential) => Self::check_password(credential, password)?,
            None => match self.sign_up(email, password)? {
                Some(identity) => identity,
                // Lost the race to a concurrent sign-up for this email
                None => {
                    let credential = self.lookup(email)?.ok_or_else(|| {
                        DiaryError::StoreUnavailable(anyhow!("credential for {} vanished", email))
                    })?;
                    Self::check_password(credential, password)?
                }
            },
        };

        let token = self.create_token(&identity)?;
        Ok(Session { identity, token })
    }

    fn verify(&self, token: &str) -> Result<Identity, DiaryError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| DiaryError::AuthFailure(format!("invalid session: {}", e)))?;

        Ok(Identity {
            user_id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}
