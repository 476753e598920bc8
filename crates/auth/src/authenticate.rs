//! Credential verification and token minting.

use serde::Serialize;

use warden_core::UserId;

use crate::{AuthError, Credentials, PrincipalRecord, Role, SecretVerifier, Token, TokenService};

/// Read access to the external user record store.
pub trait PrincipalStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<PrincipalRecord>;
    fn find_by_id(&self, id: UserId) -> Option<PrincipalRecord>;
    fn exists_by_id(&self, id: UserId) -> bool;
}

impl<S> PrincipalStore for std::sync::Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    fn find_by_username(&self, username: &str) -> Option<PrincipalRecord> {
        (**self).find_by_username(username)
    }

    fn find_by_id(&self, id: UserId) -> Option<PrincipalRecord> {
        (**self).find_by_id(id)
    }

    fn exists_by_id(&self, id: UserId) -> bool {
        (**self).exists_by_id(id)
    }
}

/// Result of a successful authentication.
#[derive(Debug, Clone, Serialize)]
pub struct Authenticated {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub token: Token,
    pub message: String,
    pub role_message: String,
}

impl Authenticated {
    fn new(record: &PrincipalRecord, token: Token) -> Self {
        Self {
            user_id: record.id,
            username: record.username.clone(),
            role: record.role,
            token,
            message: "Authentication successful".to_string(),
            role_message: format!(
                "Welcome, {}! Your role is: {}",
                record.username, record.role
            ),
        }
    }
}

/// Result of re-minting a token after a profile update.
#[derive(Debug, Clone, Serialize)]
pub struct Reissued {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub token: Token,
    pub message: String,
    pub role_message: String,
}

impl Reissued {
    fn new(record: &PrincipalRecord, token: Token) -> Self {
        Self {
            user_id: record.id,
            username: record.username.clone(),
            role: record.role,
            token,
            message: "User updated successfully".to_string(),
            role_message: format!("Role: {}", record.role),
        }
    }
}

/// Unauthenticated -> Authenticated, in one step, with no internal retries.
pub struct AuthenticationFlow<S, V> {
    store: S,
    verifier: V,
    tokens: TokenService,
}

impl<S, V> AuthenticationFlow<S, V>
where
    S: PrincipalStore,
    V: SecretVerifier,
{
    pub fn new(store: S, verifier: V, tokens: TokenService) -> Self {
        Self {
            store,
            verifier,
            tokens,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated, AuthError> {
        let Some(record) = self.store.find_by_username(&credentials.username) else {
            // Same verification cost as a wrong secret.
            let _ = self
                .verifier
                .matches(&credentials.secret, self.verifier.decoy_hash());
            tracing::warn!(username = %credentials.username, "authentication failed");
            tracing::debug!(username = %credentials.username, "no such principal");
            return Err(AuthError::AuthenticationFailed);
        };

        if !self
            .verifier
            .matches(&credentials.secret, &record.password_hash)
        {
            tracing::warn!(username = %credentials.username, "authentication failed");
            tracing::debug!(username = %credentials.username, "secret mismatch");
            return Err(AuthError::AuthenticationFailed);
        }

        let token = self.issue_for(&record)?;
        tracing::info!(user_id = %record.id, role = %record.role, "principal authenticated");
        Ok(Authenticated::new(&record, token))
    }

    /// Mint a token from the record's current username and role.
    pub fn issue_for(&self, record: &PrincipalRecord) -> Result<Token, AuthError> {
        Ok(self.tokens.issue(&record.username, [record.role.as_str()])?)
    }

    /// Re-mint for an updated record, with the profile-update messages.
    pub fn reissue(&self, record: &PrincipalRecord) -> Result<Reissued, AuthError> {
        let token = self.issue_for(record)?;
        tracing::info!(user_id = %record.id, role = %record.role, "token reissued");
        Ok(Reissued::new(record, token))
    }
}
