//! `warden-auth` : token & authorization engine.
//!
//! This crate is intentionally decoupled from HTTP and storage: the record
//! store and secret verifier are traits, time comes from an injected clock.

pub mod authenticate;
pub mod authorize;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod principal;
pub mod roles;
pub mod secret;
pub mod token;

pub use authenticate::{Authenticated, AuthenticationFlow, PrincipalStore, Reissued};
pub use authorize::{
    AuthorizationDecision, DenialKind, Policy, decide_admin_only, decide_role_allowed,
    decide_self_only, decide_self_or_admin,
};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use codec::{ClaimsCodec, CodecError, Hs256Codec, Token};
pub use config::{AuthConfig, AuthSettings, ConfigError, SigningKey};
pub use error::{AuthError, AuthResult};
pub use principal::{Credentials, Identity, PrincipalRecord};
pub use roles::{Role, UnknownRole};
pub use secret::{Argon2Secrets, SecretHashError, SecretVerifier};
pub use token::{TokenError, TokenService};
