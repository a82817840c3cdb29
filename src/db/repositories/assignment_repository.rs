use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{AssignStaff, MemberStaffAssignment, Staff};
use crate::db::DatabaseError;

pub struct AssignmentRepository;

impl AssignmentRepository {
    pub async fn find_active(
        pool: &PgPool,
        member_id: i64,
        staff_id: Uuid,
    ) -> Result<Option<MemberStaffAssignment>, DatabaseError> {
        let assignment = sqlx::query_as::<_, MemberStaffAssignment>(
            r#"
            SELECT * FROM member_staff_assignments
            WHERE member_id = $1 AND staff_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(member_id)
        .bind(staff_id)
        .fetch_optional(pool)
        .await?;
        Ok(assignment)
    }

    pub async fn is_assigned(
        pool: &PgPool,
        member_id: i64,
        staff_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM member_staff_assignments
                WHERE member_id = $1 AND staff_id = $2 AND is_active = TRUE
            )
            "#,
        )
        .bind(member_id)
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn insert(
        pool: &PgPool,
        assignment: &AssignStaff,
    ) -> Result<MemberStaffAssignment, DatabaseError> {
        let assignment = sqlx::query_as::<_, MemberStaffAssignment>(
            r#"
            INSERT INTO member_staff_assignments (id, member_id, staff_id, assigned_by, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(assignment.member_id)
        .bind(assignment.staff_id)
        .bind(assignment.assigned_by)
        .fetch_one(pool)
        .await?;
        Ok(assignment)
    }

    pub async fn deactivate(pool: &PgPool, assignment_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE member_staff_assignments SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(assignment_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Staff actively assigned to a member.
    pub async fn staff_for_member(
        pool: &PgPool,
        member_id: i64,
    ) -> Result<Vec<Staff>, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT s.* FROM staff s
            JOIN member_staff_assignments a ON a.staff_id = s.id
            WHERE a.member_id = $1 AND a.is_active = TRUE AND s.deleted_at IS NULL
            ORDER BY s.name
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;
        Ok(staff)
    }
}
