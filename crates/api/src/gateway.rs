//! The boundary the inbound request dispatcher talks to.

use warden_auth::{
    AuthError, AuthResult, Authenticated, AuthenticationFlow, AuthorizationDecision, Credentials,
    Policy, PrincipalRecord, PrincipalStore, Reissued, SecretVerifier, Token, TokenService,
};
use warden_core::UserId;

use crate::access::UserOperation;
use crate::context::CallerContext;

pub struct AuthGateway<S, V> {
    flow: AuthenticationFlow<S, V>,
}

impl<S, V> AuthGateway<S, V>
where
    S: PrincipalStore,
    V: SecretVerifier,
{
    pub fn new(store: S, verifier: V, tokens: TokenService) -> Self {
        Self {
            flow: AuthenticationFlow::new(store, verifier, tokens),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        self.flow.tokens()
    }

    pub fn authenticate(&self, username: &str, secret: &str) -> AuthResult<Authenticated> {
        self.flow.authenticate(&Credentials::new(username, secret))
    }

    pub fn refresh(&self, token: &str) -> AuthResult<Token> {
        Ok(self.tokens().refresh(token)?)
    }

    /// Decode the token and resolve the caller's record id.
    pub fn caller(&self, token: &str) -> AuthResult<CallerContext> {
        self.caller_for(token, true)
    }

    fn caller_for(&self, token: &str, resolve_id: bool) -> AuthResult<CallerContext> {
        let identity = self.tokens().extract_identity(token)?;
        let user_id = if resolve_id {
            self.flow
                .store()
                .find_by_username(&identity.username)
                .map(|record| record.id)
        } else {
            None
        };
        Ok(CallerContext::new(identity, user_id))
    }

    /// Evaluate `policy` for the bearer of `token`.
    ///
    /// Token failures are errors; a policy denial is a decision, not an error.
    pub fn authorize(&self, token: &str, policy: &Policy) -> AuthResult<AuthorizationDecision> {
        let caller = self.caller_for(token, policy.needs_caller_id())?;
        Ok(self.decide(&caller, policy))
    }

    fn decide(&self, caller: &CallerContext, policy: &Policy) -> AuthorizationDecision {
        let decision = policy.evaluate(caller.identity(), caller.user_id());
        tracing::debug!(
            username = %caller.username(),
            allow = decision.allow,
            reason = %decision.reason,
            "authorization decision"
        );
        decision
    }

    /// Like [`authorize`](Self::authorize), but a denial becomes
    /// [`AuthError::AccessDenied`] and the caller context is returned on success.
    pub fn require(&self, token: &str, policy: &Policy) -> AuthResult<CallerContext> {
        let caller = self.caller_for(token, policy.needs_caller_id())?;
        self.decide(&caller, policy).into_result()?;
        Ok(caller)
    }

    /// Authorize a user-record operation, then check that its target exists.
    ///
    /// Existence is only revealed to callers the policy already admitted.
    pub fn guard(&self, token: &str, operation: UserOperation) -> AuthResult<CallerContext> {
        let caller = self.require(token, &operation.policy())?;
        if let Some(target) = operation.target() {
            if !self.flow.store().exists_by_id(target) {
                return Err(AuthError::UserNotFound(target));
            }
        }
        Ok(caller)
    }

    /// The record of the token's bearer.
    pub fn current_user(&self, token: &str) -> AuthResult<PrincipalRecord> {
        let identity = self.tokens().extract_identity(token)?;
        self.flow
            .store()
            .find_by_username(&identity.username)
            .ok_or_else(|| {
                tracing::debug!(username = %identity.username, "token subject has no record");
                AuthError::InvalidOrExpiredToken
            })
    }

    /// Mint a token from the record's current state, e.g. after a profile
    /// update changed its username or role. Existing tokens are unaffected.
    pub fn reissue(&self, user_id: UserId) -> AuthResult<Reissued> {
        let record = self
            .flow
            .store()
            .find_by_id(user_id)
            .ok_or(AuthError::UserNotFound(user_id))?;
        self.flow.reissue(&record)
    }
}
