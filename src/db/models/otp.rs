use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

use super::staff::validate_mobile;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Otp {
    pub id: i64,
    pub mobile: String,
    pub otp: String,
    pub verified: bool,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtp {
    #[validate(custom(function = validate_mobile))]
    pub mobile: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtp {
    #[validate(custom(function = validate_mobile))]
    pub mobile: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}
