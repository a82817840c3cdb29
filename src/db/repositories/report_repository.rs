use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;

use crate::db::models::{DuesRow, DuesSummaryRow};
use crate::db::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuesStatus {
    Unpaid,
    Partial,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuesDimension {
    Building,
    Floor,
    Member,
}

#[derive(Debug, Default, Clone)]
pub struct DuesFilters {
    pub building: Option<String>,
    pub wing: Option<String>,
    pub floor: Option<i32>,
    /// `YYYY-MM`, matched against the bill cycle.
    pub month: Option<String>,
    pub min_due: Option<Decimal>,
    pub max_due: Option<Decimal>,
    pub status: Option<DuesStatus>,
    pub search: Option<String>,
}

const DUE_EXPR: &str = "mb.amount - COALESCE(p.total_paid, 0)";

const DUES_JOINS: &str = r#"
    FROM member_bills mb
    JOIN members m ON m.id = mb.member_id
    JOIN units u ON u.id = m.unit_id
    LEFT JOIN buildings b ON b.id = u.building_id
    LEFT JOIN (
        SELECT bill_id, SUM(amount) AS total_paid, MAX(payment_date) AS last_payment_date
        FROM payments
        GROUP BY bill_id
    ) p ON p.bill_id = mb.id
"#;

pub struct ReportRepository;

impl ReportRepository {
    fn push_dues_filters(
        query: &mut QueryBuilder<'_, Postgres>,
        filters: &DuesFilters,
        today: Date,
    ) {
        // Fully settled bills never appear in the report.
        query.push(format!(" WHERE {DUE_EXPR} > 0"));
        if let Some(month) = &filters.month {
            query
                .push(" AND to_char(mb.bill_cycle, 'YYYY-MM') = ")
                .push_bind(month.clone());
        }
        if let Some(building) = &filters.building {
            query
                .push(" AND (b.name = ")
                .push_bind(building.clone())
                .push(" OR b.code = ")
                .push_bind(building.clone())
                .push(")");
        }
        if let Some(wing) = &filters.wing {
            query.push(" AND b.name = ").push_bind(wing.clone());
        }
        if let Some(floor) = filters.floor {
            query.push(" AND u.floor = ").push_bind(floor);
        }
        if let Some(min_due) = filters.min_due {
            query
                .push(format!(" AND {DUE_EXPR} >= "))
                .push_bind(min_due);
        }
        if let Some(max_due) = filters.max_due {
            query
                .push(format!(" AND {DUE_EXPR} <= "))
                .push_bind(max_due);
        }
        match filters.status {
            Some(DuesStatus::Unpaid) => {
                query.push(" AND COALESCE(p.total_paid, 0) = 0");
            }
            Some(DuesStatus::Partial) => {
                query.push(" AND p.total_paid > 0 AND p.total_paid < mb.amount");
            }
            Some(DuesStatus::Overdue) => {
                query.push(" AND mb.due_date < ").push_bind(today);
            }
            None => {}
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (m.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.unit_no ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    fn dues_select() -> String {
        format!(
            r#"
            SELECT m.name AS member_name, u.unit_no, u.floor, b.name AS building_name,
                   mb.bill_cycle, mb.amount AS bill_amount,
                   COALESCE(p.total_paid, 0) AS amount_paid,
                   {DUE_EXPR} AS due_amount,
                   mb.due_date, p.last_payment_date
            {DUES_JOINS}
            "#
        )
    }

    pub async fn dues_page(
        pool: &PgPool,
        filters: &DuesFilters,
        today: Date,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DuesRow>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(Self::dues_select());
        Self::push_dues_filters(&mut query, filters, today);
        query.push(" ORDER BY mb.due_date ASC LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);
        let rows = query.build_query_as::<DuesRow>().fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn dues_count(
        pool: &PgPool,
        filters: &DuesFilters,
        today: Date,
    ) -> Result<i64, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT COUNT(*) {DUES_JOINS}"));
        Self::push_dues_filters(&mut query, filters, today);
        let count = query.build_query_scalar::<i64>().fetch_one(pool).await?;
        Ok(count)
    }

    pub async fn dues_all(
        pool: &PgPool,
        filters: &DuesFilters,
        today: Date,
    ) -> Result<Vec<DuesRow>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(Self::dues_select());
        Self::push_dues_filters(&mut query, filters, today);
        query.push(" ORDER BY mb.due_date ASC");
        let rows = query.build_query_as::<DuesRow>().fetch_all(pool).await?;
        Ok(rows)
    }

    /// Outstanding dues summed per dimension, largest first. Groups whose
    /// bills are all settled drop out via the per-row due > 0 predicate;
    /// the member dimension is truncated to the ten largest debtors.
    pub async fn dues_summary(
        pool: &PgPool,
        dimension: DuesDimension,
        filters: &DuesFilters,
        today: Date,
    ) -> Result<Vec<DuesSummaryRow>, DatabaseError> {
        let label_expr = match dimension {
            DuesDimension::Building => "COALESCE(b.name, 'Unknown')",
            DuesDimension::Floor => "COALESCE(u.floor::text, 'Unknown')",
            DuesDimension::Member => "m.name",
        };
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT {label_expr} AS label, SUM({DUE_EXPR}) AS total_due
            {DUES_JOINS}
            "#
        ));
        Self::push_dues_filters(&mut query, filters, today);
        query.push(format!(
            " GROUP BY {label_expr} HAVING SUM({DUE_EXPR}) > 0 ORDER BY total_due DESC"
        ));
        if dimension == DuesDimension::Member {
            query.push(" LIMIT 10");
        }
        let rows = query
            .build_query_as::<DuesSummaryRow>()
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}
