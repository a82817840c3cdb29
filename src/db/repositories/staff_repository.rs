use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{
    NewStaff, Staff, StaffRef, StaffScope, StaffSummary, UpdateStaff, VerifyStaff,
};
use crate::db::DatabaseError;

pub struct StaffRepository;

impl StaffRepository {
    pub async fn find_active(pool: &PgPool, staff_id: Uuid) -> Result<Option<Staff>, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .fetch_optional(pool)
        .await?;
        Ok(staff)
    }

    pub async fn find_by_mobile(pool: &PgPool, mobile: &str) -> Result<Option<Staff>, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE mobile = $1 AND deleted_at IS NULL",
        )
        .bind(mobile)
        .fetch_optional(pool)
        .await?;
        Ok(staff)
    }

    pub async fn create(
        pool: &PgPool,
        new_staff: &NewStaff,
        created_by: i64,
    ) -> Result<Staff, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (id, name, mobile, email, staff_scope, department, designation,
                               society_id, unit_id, company_id, is_verified, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_staff.name)
        .bind(&new_staff.mobile)
        .bind(&new_staff.email)
        .bind(new_staff.staff_scope)
        .bind(&new_staff.department)
        .bind(&new_staff.designation)
        .bind(new_staff.society_id)
        .bind(new_staff.unit_id)
        .bind(new_staff.company_id)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(staff)
    }

    pub async fn update_details(
        pool: &PgPool,
        staff_id: Uuid,
        update: &UpdateStaff,
        updated_by: i64,
    ) -> Result<Staff, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                department = COALESCE($3, department),
                designation = COALESCE($4, designation),
                updated_by = $5,
                updated_at = NOW()
            WHERE id = $6 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.department)
        .bind(&update.designation)
        .bind(updated_by)
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
        Ok(staff)
    }

    pub async fn mark_verified(
        pool: &PgPool,
        staff_id: Uuid,
        details: &VerifyStaff,
        verified_by: i64,
        now: OffsetDateTime,
    ) -> Result<Staff, DatabaseError> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff
            SET aadhaar_number = $1,
                residential_address = $2,
                next_of_kin_name = $3,
                next_of_kin_mobile = $4,
                photo_url = COALESCE($5, photo_url),
                is_verified = TRUE,
                verified_at = $6,
                verified_by_member_id = $7,
                updated_by = $7,
                updated_at = NOW()
            WHERE id = $8 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&details.aadhaar_number)
        .bind(&details.residential_address)
        .bind(&details.next_of_kin_name)
        .bind(&details.next_of_kin_mobile)
        .bind(&details.photo_url)
        .bind(now)
        .bind(verified_by)
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
        Ok(staff)
    }

    pub async fn soft_delete(pool: &PgPool, staff_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE staff SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: i64,
        scope: Option<StaffScope>,
        verified: Option<bool>,
    ) -> Result<Vec<Staff>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM staff WHERE deleted_at IS NULL AND company_id = ");
        query.push_bind(company_id);
        if let Some(scope) = scope {
            query.push(" AND staff_scope = ").push_bind(scope);
        }
        if let Some(verified) = verified {
            query.push(" AND is_verified = ").push_bind(verified);
        }
        query.push(" ORDER BY name");
        let staff = query.build_query_as::<Staff>().fetch_all(pool).await?;
        Ok(staff)
    }

    pub async fn search(
        pool: &PgPool,
        company_id: i64,
        term: &str,
        scope: Option<StaffScope>,
        verified: Option<bool>,
    ) -> Result<Vec<Staff>, DatabaseError> {
        let pattern = format!("%{}%", term);
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM staff WHERE deleted_at IS NULL AND company_id = ");
        query.push_bind(company_id);
        query.push(" AND (name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR mobile ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR email ILIKE ");
        query.push_bind(pattern);
        query.push(")");
        if let Some(scope) = scope {
            query.push(" AND staff_scope = ").push_bind(scope);
        }
        if let Some(verified) = verified {
            query.push(" AND is_verified = ").push_bind(verified);
        }
        query.push(" ORDER BY name");
        let staff = query.build_query_as::<Staff>().fetch_all(pool).await?;
        Ok(staff)
    }

    /// Resolve a polymorphic staff reference against whichever table the
    /// discriminator points at.
    pub async fn resolve(
        pool: &PgPool,
        staff_ref: StaffRef,
    ) -> Result<Option<StaffSummary>, DatabaseError> {
        let summary = match staff_ref {
            StaffRef::Society(id) => {
                sqlx::query_as::<_, StaffSummary>(
                    "SELECT id, name, category, photo_url FROM society_staff WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(pool)
                .await?
            }
            StaffRef::Member(id) => {
                sqlx::query_as::<_, StaffSummary>(
                    r#"
                    SELECT id, name, designation AS category, photo_url
                    FROM staff
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(id)
                .fetch_optional(pool)
                .await?
            }
        };
        Ok(summary)
    }
}
