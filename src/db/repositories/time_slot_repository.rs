use sqlx::PgPool;
use time::{Date, Time};
use uuid::Uuid;

use crate::db::models::{NewTimeSlot, TimeSlot};
use crate::db::DatabaseError;

pub struct TimeSlotRepository;

impl TimeSlotRepository {
    /// All active (non-deleted) slots for a staff member on one date.
    /// This is the candidate set the conflict check runs against.
    pub async fn active_on_date(
        pool: &PgPool,
        staff_id: Uuid,
        date: Date,
    ) -> Result<Vec<TimeSlot>, DatabaseError> {
        let slots = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT * FROM time_slots
            WHERE staff_id = $1 AND date = $2 AND deleted_at IS NULL
            ORDER BY start_time
            "#,
        )
        .bind(staff_id)
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    /// Same as [`active_on_date`](Self::active_on_date) minus the slot
    /// under edit, for the update path.
    pub async fn active_on_date_excluding(
        pool: &PgPool,
        staff_id: Uuid,
        date: Date,
        excluded_slot_id: Uuid,
    ) -> Result<Vec<TimeSlot>, DatabaseError> {
        let slots = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT * FROM time_slots
            WHERE staff_id = $1 AND date = $2 AND id <> $3 AND deleted_at IS NULL
            ORDER BY start_time
            "#,
        )
        .bind(staff_id)
        .bind(date)
        .bind(excluded_slot_id)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    pub async fn all_for_staff(
        pool: &PgPool,
        staff_id: Uuid,
    ) -> Result<Vec<TimeSlot>, DatabaseError> {
        let slots = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT * FROM time_slots
            WHERE staff_id = $1 AND deleted_at IS NULL
            ORDER BY date, start_time
            "#,
        )
        .bind(staff_id)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    pub async fn between(
        pool: &PgPool,
        staff_id: Uuid,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<TimeSlot>, DatabaseError> {
        let slots = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT * FROM time_slots
            WHERE staff_id = $1 AND date BETWEEN $2 AND $3 AND deleted_at IS NULL
            ORDER BY date, start_time
            "#,
        )
        .bind(staff_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    pub async fn find(
        pool: &PgPool,
        staff_id: Uuid,
        slot_id: Uuid,
    ) -> Result<Option<TimeSlot>, DatabaseError> {
        let slot = sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE id = $1 AND staff_id = $2 AND deleted_at IS NULL",
        )
        .bind(slot_id)
        .bind(staff_id)
        .fetch_optional(pool)
        .await?;
        Ok(slot)
    }

    pub async fn insert(
        pool: &PgPool,
        staff_id: Uuid,
        slot: &NewTimeSlot,
    ) -> Result<TimeSlot, DatabaseError> {
        let slot = sqlx::query_as::<_, TimeSlot>(
            r#"
            INSERT INTO time_slots (id, staff_id, date, start_time, end_time, is_booked)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(staff_id)
        .bind(slot.date)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.is_booked)
        .fetch_one(pool)
        .await?;
        Ok(slot)
    }

    pub async fn update(
        pool: &PgPool,
        slot_id: Uuid,
        date: Date,
        start_time: Time,
        end_time: Time,
        is_booked: bool,
    ) -> Result<TimeSlot, DatabaseError> {
        let slot = sqlx::query_as::<_, TimeSlot>(
            r#"
            UPDATE time_slots
            SET date = $1, start_time = $2, end_time = $3, is_booked = $4, updated_at = NOW()
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(is_booked)
        .bind(slot_id)
        .fetch_one(pool)
        .await?;
        Ok(slot)
    }

    pub async fn soft_delete(pool: &PgPool, slot_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE time_slots SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(slot_id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
