use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use super::token::{decode_token, Claims};
use crate::config;
use crate::error::AppError;

/// The caller's decoded identity, passed into handlers explicitly instead
/// of being resolved ambiently at each check site.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.claims.user_roles.iter().any(|r| r == role)
    }

    pub fn require_committee(&self) -> Result<(), AppError> {
        if self.has_role("committee") {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Unauthorized. Committee access required.".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.has_role("admin") {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Unauthorized. You do not have permission to access this resource.".to_string(),
            ))
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = decode_token(&config::get().auth, token)?;
        Ok(AuthContext { claims })
    }
}

/// Member-scoped routes additionally need the full member/unit/company
/// triple from the token.
#[derive(Debug, Clone)]
pub struct MemberContext {
    pub member_id: i64,
    pub unit_id: i64,
    pub company_id: i64,
}

impl MemberContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        match (claims.member_id, claims.unit_id, claims.company_id) {
            (Some(member_id), Some(unit_id), Some(company_id)) => Ok(MemberContext {
                member_id,
                unit_id,
                company_id,
            }),
            _ => Err(AppError::PreconditionFailed(
                "Member context is missing".to_string(),
            )),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MemberContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        MemberContext::from_claims(&auth.claims)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(member_id: Option<i64>, roles: &[&str]) -> Claims {
        Claims {
            iss: "oneapp".to_string(),
            aud: "member-staff-api".to_string(),
            iat: 0,
            exp: 0,
            member_id,
            unit_id: member_id.map(|_| 12),
            company_id: member_id.map(|_| 3),
            name: None,
            email: None,
            user_roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn committee_role_gates_reports() {
        let committee = AuthContext {
            claims: claims(None, &["committee"]),
        };
        assert!(committee.require_committee().is_ok());
        assert!(committee.require_admin().is_err());

        let member = AuthContext {
            claims: claims(Some(7), &[]),
        };
        assert!(matches!(
            member.require_committee(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn member_context_requires_the_full_triple() {
        let full = MemberContext::from_claims(&claims(Some(7), &[])).unwrap();
        assert_eq!(full.member_id, 7);
        assert_eq!(full.unit_id, 12);
        assert_eq!(full.company_id, 3);

        assert!(matches!(
            MemberContext::from_claims(&claims(None, &["admin"])),
            Err(AppError::PreconditionFailed(_))
        ));
    }
}
