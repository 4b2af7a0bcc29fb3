//! Bearer token issuance and verification
//!
//! Builds the claim set for a user as the union of fixed identity claims,
//! the user's stored custom claims, and one role entry per held role, then
//! signs it with HMAC-SHA256 under the configured issuer/audience.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{StoredClaim, User};

/// Token signing configuration.
///
/// Constructed once from [`crate::config::AppConfig`] at startup and passed
/// explicitly; there is no ambient/global lookup.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Issuer claim (`iss`)
    pub issuer: String,
    /// Audience claim (`aud`)
    pub audience: String,
    /// Symmetric signing key
    pub signing_key: String,
    /// Token validity in days
    pub duration_in_days: i64,
}

/// Claims embedded in an issued token.
///
/// Custom claims are flattened into the payload as-is. No de-duplication is
/// performed against the fixed claims: a stored claim that reuses a reserved
/// key (`sub`, `jti`, `email`, `uid`, `roles`) appears alongside it in the
/// serialized payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (username)
    pub sub: String,
    /// Token identifier, freshly generated per issuance
    pub jti: String,
    /// User's email
    pub email: String,
    /// Internal user id
    pub uid: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// One entry per role the user holds
    pub roles: Vec<String>,
    /// Stored custom claims, flattened into the payload
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

/// A signed token together with its expiry timestamp.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

/// Issue a signed bearer token for `user`.
///
/// Expiry is computed from wall-clock time at call time. The only failure
/// path is the signing primitive's error on a malformed key, which callers
/// treat as startup misconfiguration.
pub fn issue_token(
    user: &User,
    roles: &[String],
    custom_claims: &[StoredClaim],
    settings: &TokenSettings,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_on = now + Duration::days(settings.duration_in_days);

    let mut custom = Map::new();
    for claim in custom_claims {
        custom.insert(
            claim.claim_type.clone(),
            Value::String(claim.claim_value.clone()),
        );
    }

    let claims = AccessClaims {
        sub: user.username.clone(),
        jti: uuid::Uuid::new_v4().to_string(),
        email: user.email.clone(),
        uid: user.id.clone(),
        iss: settings.issuer.clone(),
        aud: settings.audience.clone(),
        iat: now.timestamp(),
        exp: expires_on.timestamp(),
        roles: roles.to_vec(),
        custom,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.signing_key.as_bytes()),
    )?;

    Ok(IssuedToken { token, expires_on })
}

/// Verify and decode a bearer token.
pub fn verify_token(
    token: &str,
    settings: &TokenSettings,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&settings.issuer]);
    validation.set_audience(&[&settings.audience]);

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(settings.signing_key.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    use super::*;

    fn test_settings() -> TokenSettings {
        TokenSettings {
            issuer: "idgate-test".to_string(),
            audience: "idgate-clients".to_string(),
            signing_key: "unit-test-signing-key-not-for-production".to_string(),
            duration_in_days: 7,
        }
    }

    fn test_user() -> User {
        User {
            id: "user-123".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$12$irrelevant".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let settings = test_settings();
        let user = test_user();
        let roles = vec!["User".to_string(), "Admin".to_string()];
        let custom = vec![StoredClaim {
            claim_type: "department".to_string(),
            claim_value: "engineering".to_string(),
        }];

        let issued = issue_token(&user, &roles, &custom, &settings).unwrap();
        let claims = verify_token(&issued.token, &settings).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.uid, "user-123");
        assert_eq!(claims.iss, "idgate-test");
        assert_eq!(claims.aud, "idgate-clients");
        assert_eq!(claims.roles, roles);
        assert_eq!(
            claims.custom.get("department"),
            Some(&Value::String("engineering".to_string()))
        );
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expiry_is_issuance_plus_configured_days() {
        let settings = test_settings();
        let before = Utc::now();
        let issued = issue_token(&test_user(), &[], &[], &settings).unwrap();
        let after = Utc::now();

        let min = before + Duration::days(settings.duration_in_days);
        let max = after + Duration::days(settings.duration_in_days) + Duration::seconds(1);
        assert!(issued.expires_on >= min && issued.expires_on <= max);

        let claims = verify_token(&issued.token, &settings).unwrap();
        assert_eq!(claims.exp, issued.expires_on.timestamp());
    }

    #[test]
    fn test_fresh_jti_per_issuance() {
        let settings = test_settings();
        let user = test_user();
        let a = issue_token(&user, &[], &[], &settings).unwrap();
        let b = issue_token(&user, &[], &[], &settings).unwrap();

        let ca = verify_token(&a.token, &settings).unwrap();
        let cb = verify_token(&b.token, &settings).unwrap();
        assert_ne!(ca.jti, cb.jti);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let settings = test_settings();
        assert!(verify_token("not-a-token", &settings).is_err());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let settings = test_settings();
        let issued = issue_token(&test_user(), &[], &[], &settings).unwrap();

        let other = TokenSettings {
            signing_key: "a-different-key".to_string(),
            ..settings
        };
        assert!(verify_token(&issued.token, &other).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let settings = test_settings();
        let issued = issue_token(&test_user(), &[], &[], &settings).unwrap();

        let other = TokenSettings {
            audience: "someone-else".to_string(),
            ..settings
        };
        assert!(verify_token(&issued.token, &other).is_err());
    }

    // A stored claim reusing a reserved key is not de-duplicated: both
    // occurrences coexist in the serialized payload. Checked against the raw
    // payload because JSON parsers collapse duplicate keys on read.
    #[test]
    fn test_reserved_key_custom_claim_coexists_in_payload() {
        let settings = test_settings();
        let custom = vec![StoredClaim {
            claim_type: "email".to_string(),
            claim_value: "other@example.com".to_string(),
        }];
        let issued = issue_token(&test_user(), &[], &custom, &settings).unwrap();

        let payload_b64 = issued.token.split('.').nth(1).unwrap();
        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(payload_b64).unwrap()).unwrap();

        assert_eq!(payload.matches("\"email\"").count(), 2);
        assert!(payload.contains("alice@example.com"));
        assert!(payload.contains("other@example.com"));
    }
}
