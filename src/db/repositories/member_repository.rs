use sqlx::PgPool;

use crate::db::models::Member;
use crate::db::DatabaseError;

pub struct MemberRepository;

impl MemberRepository {
    pub async fn find(pool: &PgPool, member_id: i64) -> Result<Option<Member>, DatabaseError> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(pool)
            .await?;
        Ok(member)
    }
}
