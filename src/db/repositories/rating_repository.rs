use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::db::models::{
    NewRating, RatingAggregate, RatingExportRow, RatingReview, StaffRating, StaffRef, StaffScope,
};
use crate::db::DatabaseError;

pub struct RatingRepository;

impl RatingRepository {
    /// The rating this member already left for the staff inside the given
    /// window, if any. Bounds come from `month_bounds` so the one-per-
    /// calendar-month rule stays testable.
    pub async fn find_in_window(
        pool: &PgPool,
        member_id: i64,
        staff_ref: StaffRef,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
    ) -> Result<Option<StaffRating>, DatabaseError> {
        let rating = sqlx::query_as::<_, StaffRating>(
            r#"
            SELECT * FROM staff_ratings
            WHERE member_id = $1 AND staff_id = $2 AND staff_type = $3
              AND created_at >= $4 AND created_at < $5
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .bind(staff_ref.id())
        .bind(staff_ref.scope())
        .bind(window_start)
        .bind(window_end)
        .fetch_optional(pool)
        .await?;
        Ok(rating)
    }

    pub async fn insert(pool: &PgPool, new_rating: &NewRating) -> Result<StaffRating, DatabaseError> {
        let rating = sqlx::query_as::<_, StaffRating>(
            r#"
            INSERT INTO staff_ratings (member_id, staff_id, staff_type, rating, feedback)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new_rating.member_id)
        .bind(new_rating.staff_id)
        .bind(new_rating.staff_type)
        .bind(new_rating.rating)
        .bind(&new_rating.feedback)
        .fetch_one(pool)
        .await?;
        Ok(rating)
    }

    pub async fn summary_stats(
        pool: &PgPool,
        staff_ref: StaffRef,
    ) -> Result<(Option<f64>, i64), DatabaseError> {
        let stats = sqlx::query_as::<_, (Option<f64>, i64)>(
            r#"
            SELECT AVG(rating)::float8, COUNT(*)
            FROM staff_ratings
            WHERE staff_id = $1 AND staff_type = $2
            "#,
        )
        .bind(staff_ref.id())
        .bind(staff_ref.scope())
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }

    pub async fn distribution(
        pool: &PgPool,
        staff_ref: StaffRef,
    ) -> Result<Vec<(i32, i64)>, DatabaseError> {
        let counts = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT rating, COUNT(*)
            FROM staff_ratings
            WHERE staff_id = $1 AND staff_type = $2
            GROUP BY rating
            "#,
        )
        .bind(staff_ref.id())
        .bind(staff_ref.scope())
        .fetch_all(pool)
        .await?;
        Ok(counts)
    }

    pub async fn recent_reviews(
        pool: &PgPool,
        staff_ref: StaffRef,
        limit: i64,
    ) -> Result<Vec<RatingReview>, DatabaseError> {
        let reviews = sqlx::query_as::<_, RatingReview>(
            r#"
            SELECT sr.id, sr.rating, sr.feedback, m.name AS member_name, sr.created_at
            FROM staff_ratings sr
            LEFT JOIN members m ON m.id = sr.member_id
            WHERE sr.staff_id = $1 AND sr.staff_type = $2
            ORDER BY sr.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(staff_ref.id())
        .bind(staff_ref.scope())
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    /// Average and count per rated staff, descending by average. The
    /// min/max filters apply to the aggregated average, so they go into
    /// HAVING rather than a post-fetch pass.
    pub async fn aggregates(
        pool: &PgPool,
        staff_type: Option<StaffScope>,
        min_average: Option<f64>,
        max_average: Option<f64>,
    ) -> Result<Vec<RatingAggregate>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT staff_id, staff_type,
                   AVG(rating)::float8 AS average_rating,
                   COUNT(*) AS total_ratings
            FROM staff_ratings
            "#,
        );
        if let Some(staff_type) = staff_type {
            query.push(" WHERE staff_type = ").push_bind(staff_type);
        }
        query.push(" GROUP BY staff_id, staff_type");
        let mut having_started = false;
        if let Some(min_average) = min_average {
            query.push(" HAVING AVG(rating) >= ").push_bind(min_average);
            having_started = true;
        }
        if let Some(max_average) = max_average {
            query.push(if having_started {
                " AND AVG(rating) <= "
            } else {
                " HAVING AVG(rating) <= "
            });
            query.push_bind(max_average);
        }
        query.push(" ORDER BY average_rating DESC");
        let aggregates = query
            .build_query_as::<RatingAggregate>()
            .fetch_all(pool)
            .await?;
        Ok(aggregates)
    }

    pub async fn export_rows(
        pool: &PgPool,
        staff_type: Option<StaffScope>,
        min_rating: Option<i32>,
        max_rating: Option<i32>,
    ) -> Result<Vec<RatingExportRow>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT sr.id, sr.member_id, m.name AS member_name, sr.staff_id, sr.staff_type,
                   sr.rating, sr.feedback, sr.created_at
            FROM staff_ratings sr
            LEFT JOIN members m ON m.id = sr.member_id
            WHERE TRUE
            "#,
        );
        if let Some(staff_type) = staff_type {
            query.push(" AND sr.staff_type = ").push_bind(staff_type);
        }
        if let Some(min_rating) = min_rating {
            query.push(" AND sr.rating >= ").push_bind(min_rating);
        }
        if let Some(max_rating) = max_rating {
            query.push(" AND sr.rating <= ").push_bind(max_rating);
        }
        query.push(" ORDER BY sr.created_at DESC");
        let rows = query
            .build_query_as::<RatingExportRow>()
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}
