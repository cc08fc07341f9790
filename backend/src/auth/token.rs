//! Signing and verification of access and refresh tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{TokenClaim, TokenKind};
use crate::config::AuthConfig;

/// Upper bound for a configured token lifetime (ten years).
const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Signing key is not configured")]
    MissingKey,
    #[error("Invalid {0} token lifetime: {1} seconds")]
    InvalidLifetime(TokenKind, i64),
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and checks HS256-signed tokens with a process-wide key.
///
/// Holds no mutable state, so one instance is shared by every request.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        if config.signing_secret.is_empty() {
            return Err(TokenError::MissingKey);
        }
        check_lifetime(TokenKind::Access, config.access_ttl_secs)?;
        check_lifetime(TokenKind::Refresh, config.refresh_ttl_secs)?;

        let secret = config.signing_secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        })
    }

    /// Build a fresh claim for `subject` with the configured lifetime of `kind`.
    pub fn claim(&self, kind: TokenKind, subject: i64) -> TokenClaim {
        let lifetime = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        TokenClaim::new(kind, subject, lifetime)
    }

    /// Serialize and sign a claim.
    pub fn issue(&self, claim: &TokenClaim) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claim, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature, expiry and kind. Never fails loudly.
    pub fn verify(&self, token: &str, kind: TokenKind) -> bool {
        self.decode(token, kind).is_some()
    }

    /// Subject of a token that passes [`verify`](Self::verify).
    ///
    /// Corrupt, expired and wrong-kind tokens all yield `None`.
    pub fn subject_of(&self, token: &str, kind: TokenKind) -> Option<i64> {
        self.decode(token, kind).map(|claim| claim.sub)
    }

    fn decode(&self, token: &str, kind: TokenKind) -> Option<TokenClaim> {
        let data = match decode::<TokenClaim>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Rejected {} token: {}", kind, e);
                return None;
            }
        };

        if data.claims.typ != kind {
            tracing::debug!("Rejected {} token: carries kind {}", kind, data.claims.typ);
            return None;
        }

        Some(data.claims)
    }
}

fn check_lifetime(kind: TokenKind, secs: i64) -> Result<(), TokenError> {
    if (1..=MAX_TTL_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(TokenError::InvalidLifetime(kind, secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_auth_config;

    fn codec() -> TokenCodec {
        TokenCodec::new(&test_auth_config()).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        let mut config = test_auth_config();
        config.signing_secret = String::new();
        assert!(matches!(TokenCodec::new(&config), Err(TokenError::MissingKey)));
    }

    #[test]
    fn test_new_rejects_out_of_range_lifetimes() {
        let mut config = test_auth_config();
        config.access_ttl_secs = 0;
        assert!(matches!(
            TokenCodec::new(&config),
            Err(TokenError::InvalidLifetime(TokenKind::Access, 0))
        ));

        let mut config = test_auth_config();
        config.refresh_ttl_secs = i64::MAX;
        assert!(matches!(
            TokenCodec::new(&config),
            Err(TokenError::InvalidLifetime(TokenKind::Refresh, i64::MAX))
        ));
    }

    #[test]
    fn test_issued_access_token_verifies() {
        let codec = codec();
        let token = codec.issue(&codec.claim(TokenKind::Access, 7)).unwrap();
        assert!(codec.verify(&token, TokenKind::Access));
        assert_eq!(codec.subject_of(&token, TokenKind::Access), Some(7));
    }

    #[test]
    fn test_issued_refresh_token_verifies() {
        let codec = codec();
        let token = codec.issue(&codec.claim(TokenKind::Refresh, 9)).unwrap();
        assert!(codec.verify(&token, TokenKind::Refresh));
        assert_eq!(codec.subject_of(&token, TokenKind::Refresh), Some(9));
    }

    #[test]
    fn test_claim_lifetimes() {
        let codec = codec();
        let access = codec.claim(TokenKind::Access, 1);
        let refresh = codec.claim(TokenKind::Refresh, 1);
        assert_eq!(access.exp - access.iat, 3600);
        assert_eq!(refresh.exp - refresh.iat, 1_209_600);
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let codec = codec();
        let access = codec.issue(&codec.claim(TokenKind::Access, 7)).unwrap();
        let refresh = codec.issue(&codec.claim(TokenKind::Refresh, 7)).unwrap();
        assert!(!codec.verify(&access, TokenKind::Refresh));
        assert!(!codec.verify(&refresh, TokenKind::Access));
        assert_eq!(codec.subject_of(&access, TokenKind::Refresh), None);
        assert_eq!(codec.subject_of(&refresh, TokenKind::Access), None);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let codec = codec();
        let token = codec.issue(&TokenClaim::new(TokenKind::Refresh, 7, -60)).unwrap();
        assert!(!codec.verify(&token, TokenKind::Refresh));
        assert_eq!(codec.subject_of(&token, TokenKind::Refresh), None);
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let codec = codec();
        assert!(!codec.verify("", TokenKind::Access));
        assert!(!codec.verify("not.a.token", TokenKind::Access));
        assert_eq!(codec.subject_of("garbage", TokenKind::Refresh), None);
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let mut other_config = test_auth_config();
        other_config.signing_secret = "another-secret".to_string();
        let other = TokenCodec::new(&other_config).unwrap();
        let token = other.issue(&other.claim(TokenKind::Access, 7)).unwrap();
        assert!(!codec().verify(&token, TokenKind::Access));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let codec = codec();
        let token = codec.issue(&codec.claim(TokenKind::Access, 7)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(!codec.verify(&tampered, TokenKind::Access));
    }

    #[test]
    fn test_tokens_for_same_subject_differ() {
        let codec = codec();
        let first = codec.issue(&codec.claim(TokenKind::Refresh, 7)).unwrap();
        let second = codec.issue(&codec.claim(TokenKind::Refresh, 7)).unwrap();
        assert_ne!(first, second);
    }
}
