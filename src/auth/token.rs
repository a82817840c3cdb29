use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::config::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub member_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub company_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub user_roles: Vec<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.exp).ok()
    }
}

/// Claim fields supplied by the caller of the test-token endpoint; the
/// registered claims are filled in from config and the injected `now`.
pub struct TokenRequest {
    pub member_id: i64,
    pub unit_id: i64,
    pub company_id: i64,
    pub name: String,
    pub email: String,
    pub user_roles: Vec<String>,
}

pub fn issue_token(
    config: &AuthConfig,
    request: TokenRequest,
    now: OffsetDateTime,
) -> Result<(String, Claims), AppError> {
    let claims = Claims {
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        iat: now.unix_timestamp(),
        exp: (now + Duration::days(config.token_ttl_days)).unix_timestamp(),
        member_id: Some(request.member_id),
        unit_id: Some(request.unit_id),
        company_id: Some(request.company_id),
        name: Some(request.name),
        email: Some(request.email),
        user_roles: request.user_roles,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|err| AppError::Internal(format!("Failed to sign token: {err}")))?;
    Ok((token, claims))
}

pub fn decode_token(config: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => AppError::Unauthorized("Token has expired".to_string()),
        ErrorKind::InvalidSignature => {
            AppError::Unauthorized("Invalid token signature".to_string())
        }
        _ => AppError::Unauthorized("Invalid token".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use time::macros::datetime;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::from("test-secret".to_string()),
            issuer: "oneapp".to_string(),
            audience: "member-staff-api".to_string(),
            token_ttl_days: 7,
        }
    }

    fn test_request() -> TokenRequest {
        TokenRequest {
            member_id: 7,
            unit_id: 12,
            company_id: 3,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            user_roles: vec!["committee".to_string()],
        }
    }

    #[test]
    fn issued_tokens_round_trip() {
        let config = test_config();
        // Far-future issuance keeps the token unexpired at decode time.
        let now = datetime!(2100-01-01 10:00 UTC);
        let (token, _) = issue_token(&config, test_request(), now).unwrap();

        let claims = decode_token(&config, &token).unwrap();
        assert_eq!(claims.member_id, Some(7));
        assert_eq!(claims.unit_id, Some(12));
        assert_eq!(claims.company_id, Some(3));
        assert_eq!(claims.user_roles, vec!["committee".to_string()]);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let config = test_config();
        let now = datetime!(2020-01-01 10:00 UTC);
        let (token, _) = issue_token(&config, test_request(), now).unwrap();
        match decode_token(&config, &token) {
            Err(AppError::Unauthorized(message)) => assert_eq!(message, "Token has expired"),
            other => panic!("expected expiry rejection, got {other:?}"),
        }
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let now = OffsetDateTime::from_unix_timestamp(4_102_444_800).unwrap();
        let (token, _) = issue_token(&config, test_request(), now).unwrap();

        let mut other = test_config();
        other.jwt_secret = SecretString::from("other-secret".to_string());
        assert!(matches!(
            decode_token(&other, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn expiry_is_ttl_days_after_issuance() {
        let config = test_config();
        let now = datetime!(2025-04-21 10:00 UTC);
        let (_, claims) = issue_token(&config, test_request(), now).unwrap();
        assert_eq!(
            claims.expires_at().unwrap(),
            datetime!(2025-04-28 10:00 UTC)
        );
    }
}
