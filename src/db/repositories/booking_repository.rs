use sqlx::{PgPool, Postgres, Transaction};
use time::Date;

use crate::db::models::{Booking, BookingSlotRow, NewBooking};
use crate::db::DatabaseError;

pub struct BookingRepository;

impl BookingRepository {
    pub async fn insert_booking(
        tx: &mut Transaction<'_, Postgres>,
        new_booking: &NewBooking,
    ) -> Result<Booking, DatabaseError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO member_staff_bookings
                (staff_id, member_id, unit_id, company_id, start_date, end_date,
                 repeat_type, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING *
            "#,
        )
        .bind(new_booking.staff_id)
        .bind(new_booking.member_id)
        .bind(new_booking.unit_id)
        .bind(new_booking.company_id)
        .bind(new_booking.start_date)
        .bind(new_booking.end_date)
        .bind(new_booking.repeat_type)
        .bind(&new_booking.notes)
        .fetch_one(&mut **tx)
        .await?;
        Ok(booking)
    }

    pub async fn insert_slot(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        date: Date,
        hour: i32,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO booking_slots (booking_id, date, hour, is_confirmed)
            VALUES ($1, $2, $3, FALSE)
            "#,
        )
        .bind(booking_id)
        .bind(date)
        .bind(hour)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find(pool: &PgPool, booking_id: i64) -> Result<Option<Booking>, DatabaseError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM member_staff_bookings WHERE id = $1")
                .bind(booking_id)
                .fetch_optional(pool)
                .await?;
        Ok(booking)
    }

    pub async fn delete_slots(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM booking_slots WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Collapse the booking onto a single day and mark it rescheduled.
    pub async fn apply_reschedule(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        new_date: Date,
    ) -> Result<Booking, DatabaseError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE member_staff_bookings
            SET start_date = $1, end_date = $1, status = 'rescheduled', updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(new_date)
        .bind(booking_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(booking)
    }

    /// Bookings are removed outright on cancellation, unlike the
    /// soft-deleted staff and slot rows.
    pub async fn delete_booking(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
    ) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM member_staff_bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn slots_for_member(
        pool: &PgPool,
        member_id: i64,
    ) -> Result<Vec<BookingSlotRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, BookingSlotRow>(
            r#"
            SELECT bs.booking_id, b.staff_id, bs.date, bs.hour, b.status
            FROM booking_slots bs
            JOIN member_staff_bookings b ON b.id = bs.booking_id
            WHERE b.member_id = $1
            ORDER BY bs.date, bs.hour
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
