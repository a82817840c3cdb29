use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;

use crate::db::models::{AttendanceEntry, AttendanceRecord, AttendanceStatus};
use crate::db::DatabaseError;

const RECORD_COLUMNS: &str = r#"
    a.id, a.staff_id, s.name AS staff_name, s.designation AS staff_category,
    s.photo_url AS staff_photo, a.date, a.status, a.note, a.photo_url, a.updated_at
"#;

pub struct AttendanceRepository;

impl AttendanceRepository {
    /// One row per (member, staff, unit, date); saving the same day again
    /// overwrites status, note and photo.
    pub async fn upsert(
        pool: &PgPool,
        member_id: i64,
        unit_id: i64,
        date: Date,
        entry: &AttendanceEntry,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO member_staff_attendance (member_id, staff_id, unit_id, date, status, note, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (member_id, staff_id, unit_id, date)
            DO UPDATE SET status = EXCLUDED.status,
                          note = EXCLUDED.note,
                          photo_url = EXCLUDED.photo_url,
                          updated_at = NOW()
            "#,
        )
        .bind(member_id)
        .bind(entry.staff_id)
        .bind(unit_id)
        .bind(date)
        .bind(entry.status)
        .bind(&entry.note)
        .bind(&entry.photo_url)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn for_member_between(
        pool: &PgPool,
        member_id: i64,
        from: Date,
        to: Date,
    ) -> Result<Vec<AttendanceRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM member_staff_attendance a
            JOIN staff s ON s.id = a.staff_id
            WHERE a.member_id = $1 AND a.date >= $2 AND a.date < $3
            ORDER BY a.date, s.name
            "#
        ))
        .bind(member_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
        Ok(records)
    }

    fn push_admin_filters(
        query: &mut QueryBuilder<'_, Postgres>,
        date: Date,
        status: Option<AttendanceStatus>,
        search: Option<&str>,
    ) {
        query.push(" WHERE a.date = ").push_bind(date);
        if let Some(status) = status {
            query.push(" AND a.status = ").push_bind(status);
        }
        if let Some(search) = search {
            query
                .push(" AND s.name ILIKE ")
                .push_bind(format!("%{}%", search));
        }
    }

    pub async fn admin_page(
        pool: &PgPool,
        date: Date,
        status: Option<AttendanceStatus>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AttendanceRecord>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM member_staff_attendance a
            JOIN staff s ON s.id = a.staff_id
            "#
        ));
        Self::push_admin_filters(&mut query, date, status, search);
        query.push(" ORDER BY s.name LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);
        let records = query
            .build_query_as::<AttendanceRecord>()
            .fetch_all(pool)
            .await?;
        Ok(records)
    }

    pub async fn admin_count(
        pool: &PgPool,
        date: Date,
        status: Option<AttendanceStatus>,
        search: Option<&str>,
    ) -> Result<i64, DatabaseError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM member_staff_attendance a
            JOIN staff s ON s.id = a.staff_id
            "#,
        );
        Self::push_admin_filters(&mut query, date, status, search);
        let count = query.build_query_scalar::<i64>().fetch_one(pool).await?;
        Ok(count)
    }

    pub async fn status_count(
        pool: &PgPool,
        date: Date,
        status: AttendanceStatus,
    ) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM member_staff_attendance WHERE date = $1 AND status = $2",
        )
        .bind(date)
        .bind(status)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    pub async fn total_staff(pool: &PgPool) -> Result<i64, DatabaseError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn find_record(
        pool: &PgPool,
        attendance_id: i64,
    ) -> Result<Option<AttendanceRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM member_staff_attendance a
            JOIN staff s ON s.id = a.staff_id
            WHERE a.id = $1
            "#
        ))
        .bind(attendance_id)
        .fetch_optional(pool)
        .await?;
        Ok(record)
    }

    pub async fn update_status(
        pool: &PgPool,
        attendance_id: i64,
        status: AttendanceStatus,
        note: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE member_staff_attendance
            SET status = $1, note = COALESCE($2, note), updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(note)
        .bind(attendance_id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
