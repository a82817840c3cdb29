use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::Otp;
use crate::db::DatabaseError;

pub struct OtpRepository;

impl OtpRepository {
    /// Expire any outstanding unverified codes for this mobile before a
    /// new one is issued.
    pub async fn invalidate_unverified(
        pool: &PgPool,
        mobile: &str,
        now: OffsetDateTime,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE otps SET expires_at = $2 WHERE mobile = $1 AND verified = FALSE")
            .bind(mobile)
            .bind(now)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn insert(
        pool: &PgPool,
        mobile: &str,
        otp: &str,
        expires_at: OffsetDateTime,
    ) -> Result<Otp, DatabaseError> {
        let otp = sqlx::query_as::<_, Otp>(
            r#"
            INSERT INTO otps (mobile, otp, verified, expires_at)
            VALUES ($1, $2, FALSE, $3)
            RETURNING *
            "#,
        )
        .bind(mobile)
        .bind(otp)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;
        Ok(otp)
    }

    pub async fn find_valid(
        pool: &PgPool,
        mobile: &str,
        otp: &str,
        now: OffsetDateTime,
    ) -> Result<Option<Otp>, DatabaseError> {
        let otp = sqlx::query_as::<_, Otp>(
            r#"
            SELECT * FROM otps
            WHERE mobile = $1 AND otp = $2 AND verified = FALSE AND expires_at > $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(mobile)
        .bind(otp)
        .bind(now)
        .fetch_optional(pool)
        .await?;
        Ok(otp)
    }

    pub async fn mark_verified(pool: &PgPool, otp_id: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE otps SET verified = TRUE WHERE id = $1")
            .bind(otp_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
