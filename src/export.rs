//! CSV attachments for the admin and committee report downloads.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use time::format_description::well_known::Rfc3339;

use crate::db::{DuesRow, RatingExportRow};
use crate::error::{AppError, AppResult};
use crate::schedule::timefmt;

pub struct RatingCsvLine {
    pub staff_name: String,
    pub row: RatingExportRow,
}

pub fn write_ratings_csv(lines: &[RatingCsvLine]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "ID",
            "Member ID",
            "Member Name",
            "Staff ID",
            "Staff Type",
            "Staff Name",
            "Rating",
            "Feedback",
            "Created At",
        ])
        .map_err(csv_failed)?;
    for line in lines {
        let row = &line.row;
        writer
            .write_record([
                row.id.to_string(),
                row.member_id.to_string(),
                row.member_name.clone().unwrap_or_else(|| "Unknown".to_string()),
                row.staff_id.to_string(),
                row.staff_type.as_str().to_string(),
                line.staff_name.clone(),
                row.rating.to_string(),
                row.feedback.clone().unwrap_or_default(),
                row.created_at.format(&Rfc3339).unwrap_or_default(),
            ])
            .map_err(csv_failed)?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn write_dues_csv(rows: &[DuesRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Member Name",
            "Unit Number",
            "Building",
            "Bill Cycle",
            "Bill Amount",
            "Amount Paid",
            "Due Amount",
            "Due Date",
            "Last Payment Date",
        ])
        .map_err(csv_failed)?;
    for row in rows {
        writer
            .write_record([
                row.member_name.clone(),
                row.unit_no.clone(),
                row.building_name.clone().unwrap_or_default(),
                timefmt::format_ymd(row.bill_cycle),
                row.bill_amount.to_string(),
                row.amount_paid.to_string(),
                row.due_amount.to_string(),
                timefmt::format_ymd(row.due_date),
                row.last_payment_date
                    .map(timefmt::format_ymd)
                    .unwrap_or_else(|| "No payment received".to_string()),
            ])
            .map_err(csv_failed)?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn csv_attachment(filename: &str, bytes: Vec<u8>) -> AppResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|err| AppError::Internal(err.to_string()))
}

fn csv_failed(err: csv::Error) -> AppError {
    AppError::Internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StaffScope;
    use rust_decimal::Decimal;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn ratings_csv_escapes_embedded_quotes_and_commas() {
        let line = RatingCsvLine {
            staff_name: "Ramesh".to_string(),
            row: RatingExportRow {
                id: 1,
                member_id: 7,
                member_name: Some("Asha, \"A\"".to_string()),
                staff_id: Uuid::nil(),
                staff_type: StaffScope::Member,
                rating: 4,
                feedback: Some("good, reliable".to_string()),
                created_at: datetime!(2025-04-21 10:00 UTC),
            },
        };
        let bytes = write_ratings_csv(&[line]).unwrap();
        let csv = String::from_utf8(bytes).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Member ID,Member Name,Staff ID,Staff Type,Staff Name,Rating,Feedback,Created At"
        );
        let data = lines.next().unwrap();
        assert!(data.contains("\"Asha, \"\"A\"\"\""));
        assert!(data.contains("\"good, reliable\""));
        assert!(data.contains("member"));
    }

    #[test]
    fn dues_csv_marks_missing_payments() {
        let row = DuesRow {
            member_name: "Asha".to_string(),
            unit_no: "A-101".to_string(),
            floor: Some(1),
            building_name: None,
            bill_cycle: date!(2025 - 04 - 01),
            bill_amount: Decimal::new(150000, 2),
            amount_paid: Decimal::ZERO,
            due_amount: Decimal::new(150000, 2),
            due_date: date!(2025 - 04 - 10),
            last_payment_date: None,
        };
        let bytes = write_dues_csv(&[row]).unwrap();
        let csv = String::from_utf8(bytes).unwrap();
        assert!(csv.contains("No payment received"));
        assert!(csv.contains("1500.00"));
        assert!(csv.contains("2025-04-10"));
    }
}
