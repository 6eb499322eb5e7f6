//! Authentication and identity resolution.
//!
//! This module covers the two halves of the caller-identity story:
//!
//! - `principal` - the resolved caller identity (a claim set or anonymous)
//!   and the username fallback chain, used by every tool
//! - `validator` / `middleware` - bearer-token validation for the HTTP
//!   transport: OIDC key discovery, RS256 verification against the
//!   configured issuer and audience, and the axum layer that turns an
//!   `Authorization` header into a [`Principal`]
//!
//! The STDIO transport carries no bearer token, so it never constructs an
//! authenticated principal.

mod principal;

#[cfg(feature = "http")]
mod middleware;
#[cfg(feature = "http")]
mod validator;

pub use principal::Principal;

#[cfg(feature = "http")]
pub use middleware::{AuthLayerState, require_bearer};
#[cfg(feature = "http")]
pub use validator::{AuthError, Jwk, JwkSet, TokenValidator};
