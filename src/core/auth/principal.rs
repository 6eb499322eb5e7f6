//! Caller identity and username resolution.
//!
//! A [`Principal`] is either an authenticated claim set (produced by the
//! bearer-token validator) or anonymous (STDIO transport, which carries no
//! token). Username resolution probes a fixed list of claims and falls back
//! to sentinel values, so a display name always exists.

use std::collections::BTreeMap;

use tracing::debug;

/// Long-form name claim URI emitted by some identity providers in place of
/// the short `name` claim.
const STANDARD_NAME_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";

/// Claims probed for a display name, in priority order. The first claim
/// present with a non-empty value wins.
const USERNAME_CLAIMS: [&str; 5] = [
    "preferred_username",
    "upn",
    "name",
    STANDARD_NAME_CLAIM,
    "sub",
];

/// The identity attached to a tool invocation.
#[derive(Debug, Clone)]
pub enum Principal {
    /// A validated caller carrying the claim set from its bearer token.
    Authenticated {
        /// Claim name to claim value, stringified.
        claims: BTreeMap<String, String>,
    },

    /// A caller with no bearer token.
    Anonymous,
}

impl Principal {
    /// Create an authenticated principal from a claim set.
    pub fn authenticated(claims: BTreeMap<String, String>) -> Self {
        Self::Authenticated { claims }
    }

    /// Whether this principal carries a validated token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Resolve a display username for this principal.
    ///
    /// Authenticated principals are probed against [`USERNAME_CLAIMS`] in
    /// order; an authenticated caller with no usable name claim resolves to
    /// `"Unknown User"`, and anonymous callers to `"Anonymous"`.
    pub fn username(&self) -> String {
        match self {
            Self::Anonymous => "Anonymous".to_string(),
            Self::Authenticated { claims } => {
                for (name, value) in claims {
                    debug!("claim {} = {}", name, value);
                }

                USERNAME_CLAIMS
                    .iter()
                    .find_map(|name| claims.get(*name).filter(|v| !v.is_empty()))
                    .cloned()
                    .unwrap_or_else(|| "Unknown User".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_anonymous_resolves_to_sentinel() {
        assert_eq!(Principal::Anonymous.username(), "Anonymous");
    }

    #[test]
    fn test_preferred_username_wins() {
        let principal = Principal::authenticated(claims(&[
            ("preferred_username", "alice@example.com"),
            ("upn", "a@b.com"),
            ("sub", "123"),
        ]));
        assert_eq!(principal.username(), "alice@example.com");
    }

    #[test]
    fn test_upn_beats_sub() {
        let principal =
            Principal::authenticated(claims(&[("upn", "a@b.com"), ("sub", "123")]));
        assert_eq!(principal.username(), "a@b.com");
    }

    #[test]
    fn test_sub_is_last_resort() {
        let principal = Principal::authenticated(claims(&[("sub", "123")]));
        assert_eq!(principal.username(), "123");
    }

    #[test]
    fn test_standard_name_claim_beats_sub() {
        let principal = Principal::authenticated(claims(&[
            (STANDARD_NAME_CLAIM, "Alice"),
            ("sub", "123"),
        ]));
        assert_eq!(principal.username(), "Alice");
    }

    #[test]
    fn test_no_matching_claims() {
        let principal =
            Principal::authenticated(claims(&[("aud", "api://x"), ("iss", "https://y")]));
        assert_eq!(principal.username(), "Unknown User");
    }

    #[test]
    fn test_empty_claim_values_are_skipped() {
        let principal = Principal::authenticated(claims(&[
            ("preferred_username", ""),
            ("upn", ""),
            ("sub", "123"),
        ]));
        assert_eq!(principal.username(), "123");
    }

    #[test]
    fn test_empty_claim_set() {
        let principal = Principal::authenticated(BTreeMap::new());
        assert_eq!(principal.username(), "Unknown User");
    }
}
