use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::MemberContext;
use crate::db::repositories::{StaffRepository, TimeSlotRepository};
use crate::db::{BulkTimeSlots, ConflictingSlot, NewTimeSlot, Staff, TimeSlot, UpdateTimeSlot};
use crate::error::{field_error, AppError, AppResult};
use crate::schedule::{find_conflict, timefmt, Interval};

async fn find_staff(state: &AppState, staff_id: Uuid) -> AppResult<Staff> {
    StaffRepository::find_active(&state.db, staff_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))
}

fn require_verified(staff: &Staff) -> AppResult<()> {
    if staff.is_verified {
        Ok(())
    } else {
        Err(AppError::PreconditionFailed(
            "Staff must be verified before adding time slots".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default, with = "timefmt::ymd::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "timefmt::ymd::option")]
    pub end_date: Option<Date>,
}

pub async fn get_schedule(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let staff = find_staff(&state, staff_id).await?;

    let start_date = query
        .start_date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let end_date = query.end_date.unwrap_or(start_date + Duration::days(6));
    if end_date < start_date {
        return Err(field_error(
            "end_date",
            "after_or_equal",
            "end_date must not be before start_date",
        ));
    }

    let time_slots = TimeSlotRepository::between(&state.db, staff_id, start_date, end_date).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "staff": staff,
            "time_slots": time_slots,
            "start_date": timefmt::format_ymd(start_date),
            "end_date": timefmt::format_ymd(end_date),
        },
    })))
}

pub async fn get_slots_for_date(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path((staff_id, date)): Path<(Uuid, String)>,
) -> AppResult<Json<serde_json::Value>> {
    find_staff(&state, staff_id).await?;
    let date = timefmt::parse_ymd(&date)
        .map_err(|_| field_error("date", "date", "date must be in YYYY-MM-DD form"))?;

    let time_slots = TimeSlotRepository::active_on_date(&state.db, staff_id, date).await?;

    Ok(Json(json!({
        "success": true,
        "data": time_slots,
    })))
}

pub async fn add_time_slot(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<NewTimeSlot>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;
    let staff = find_staff(&state, staff_id).await?;
    require_verified(&staff)?;

    let existing = TimeSlotRepository::active_on_date(&state.db, staff_id, payload.date).await?;
    if let Some(conflict) = find_conflict(&payload.interval(), &existing) {
        return Err(AppError::SlotConflict {
            message: "Time slot conflicts with an existing time slot".to_string(),
            conflicting_slot: Box::new(conflict.clone()),
        });
    }

    let slot = TimeSlotRepository::insert(&state.db, staff_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Time slot added successfully",
            "data": slot,
        })),
    ))
}

pub async fn update_time_slot(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path((staff_id, slot_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTimeSlot>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    find_staff(&state, staff_id).await?;
    let current = TimeSlotRepository::find(&state.db, staff_id, slot_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Time slot not found".to_string()))?;

    // Merge the partial payload over the stored slot before re-checking.
    let date = payload.date.unwrap_or(current.date);
    let start_time = payload.start_time.unwrap_or(current.start_time);
    let end_time = payload.end_time.unwrap_or(current.end_time);
    let is_booked = payload.is_booked.unwrap_or(current.is_booked);
    if start_time >= end_time {
        return Err(field_error(
            "end_time",
            "after",
            "end_time must be after start_time",
        ));
    }

    let existing =
        TimeSlotRepository::active_on_date_excluding(&state.db, staff_id, date, slot_id).await?;
    let updated_interval = Interval::new(date, start_time, end_time);
    if let Some(conflict) = find_conflict(&updated_interval, &existing) {
        return Err(AppError::SlotConflict {
            message: "Updated time slot conflicts with an existing time slot".to_string(),
            conflicting_slot: Box::new(conflict.clone()),
        });
    }

    let slot =
        TimeSlotRepository::update(&state.db, slot_id, date, start_time, end_time, is_booked)
            .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Time slot updated successfully",
        "data": slot,
    })))
}

pub async fn remove_time_slot(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path((staff_id, slot_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<serde_json::Value>> {
    find_staff(&state, staff_id).await?;
    TimeSlotRepository::find(&state.db, staff_id, slot_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Time slot not found".to_string()))?;

    TimeSlotRepository::soft_delete(&state.db, slot_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Time slot removed successfully",
    })))
}

pub async fn bulk_add_time_slots(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<BulkTimeSlots>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    let staff = find_staff(&state, staff_id).await?;
    require_verified(&staff)?;

    // Snapshot the persisted slots per date before inserting anything;
    // the whole batch is judged against that snapshot.
    let mut existing_by_date: HashMap<Date, Vec<TimeSlot>> = HashMap::new();
    for slot in &payload.time_slots {
        if !existing_by_date.contains_key(&slot.date) {
            let existing =
                TimeSlotRepository::active_on_date(&state.db, staff_id, slot.date).await?;
            existing_by_date.insert(slot.date, existing);
        }
    }

    let (to_insert, conflicting_time_slots) =
        plan_bulk_slots(&payload.time_slots, &existing_by_date);

    let mut added_time_slots = Vec::with_capacity(to_insert.len());
    for slot in to_insert {
        let inserted = TimeSlotRepository::insert(&state.db, staff_id, slot).await?;
        added_time_slots.push(inserted);
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("{} time slots added successfully", added_time_slots.len()),
        "data": {
            "added_time_slots": added_time_slots,
            "conflicting_time_slots": conflicting_time_slots,
        },
    })))
}

/// Partition a bulk request into insertable and conflicting items,
/// checking each proposal against the pre-batch snapshot only. Items
/// are NOT cross-checked against each other: two proposals in the same
/// batch that overlap each other both pass when the stored calendar is
/// clear. Partial success is expected and reported itemized; the batch
/// is deliberately not atomic.
fn plan_bulk_slots<'a>(
    proposed: &'a [NewTimeSlot],
    existing_by_date: &HashMap<Date, Vec<TimeSlot>>,
) -> (Vec<&'a NewTimeSlot>, Vec<ConflictingSlot>) {
    let mut to_insert = Vec::new();
    let mut conflicting = Vec::new();
    for slot in proposed {
        let existing = existing_by_date
            .get(&slot.date)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        match find_conflict(&slot.interval(), existing) {
            Some(conflict) => conflicting.push(ConflictingSlot {
                new_slot: slot.clone(),
                existing_slot: conflict.clone(),
            }),
            None => to_insert.push(slot),
        }
    }
    (to_insert, conflicting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    fn stored_slot(date: Date, start: time::Time, end: time::Time) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            date,
            start_time: start,
            end_time: end,
            is_booked: false,
            created_at: datetime!(2025-04-01 00:00 UTC),
            updated_at: datetime!(2025-04-01 00:00 UTC),
        }
    }

    fn proposal(date: Date, start: time::Time, end: time::Time) -> NewTimeSlot {
        NewTimeSlot {
            date,
            start_time: start,
            end_time: end,
            is_booked: false,
        }
    }

    #[test]
    fn bulk_items_conflicting_with_stored_slots_are_reported() {
        let day = date!(2025 - 04 - 21);
        let stored = stored_slot(day, time!(09:00), time!(10:00));
        let mut existing_by_date = HashMap::new();
        existing_by_date.insert(day, vec![stored.clone()]);

        let slots = vec![
            proposal(day, time!(09:30), time!(10:30)),
            proposal(day, time!(10:00), time!(11:00)),
        ];
        let (to_insert, conflicting) = plan_bulk_slots(&slots, &existing_by_date);

        // The first overlaps the stored slot; the second only touches its
        // end and is accepted.
        assert_eq!(to_insert.len(), 1);
        assert_eq!(to_insert[0].start_time, time!(10:00));
        assert_eq!(conflicting.len(), 1);
        assert_eq!(conflicting[0].existing_slot.id, stored.id);
    }

    #[test]
    fn overlapping_items_within_one_batch_all_pass() {
        // Proposals are only checked against the persisted snapshot, so
        // a batch that overlaps itself is accepted in full. Intentional
        // first-wins-not-enforced behavior, kept as the contract.
        let day = date!(2025 - 04 - 21);
        let mut existing_by_date = HashMap::new();
        existing_by_date.insert(day, Vec::new());

        let slots = vec![
            proposal(day, time!(09:00), time!(10:00)),
            proposal(day, time!(09:30), time!(10:30)),
        ];
        let (to_insert, conflicting) = plan_bulk_slots(&slots, &existing_by_date);

        assert_eq!(to_insert.len(), 2);
        assert!(conflicting.is_empty());
    }

    #[test]
    fn unverified_staff_cannot_take_slots() {
        let staff = Staff {
            id: Uuid::new_v4(),
            name: "Ramesh".to_string(),
            mobile: "919876543210".to_string(),
            email: None,
            staff_scope: crate::db::StaffScope::Member,
            department: None,
            designation: None,
            society_id: None,
            unit_id: Some(12),
            company_id: 3,
            aadhaar_number: None,
            residential_address: None,
            next_of_kin_name: None,
            next_of_kin_mobile: None,
            photo_url: None,
            is_verified: false,
            verified_at: None,
            verified_by_member_id: None,
            created_by: 7,
            updated_by: 7,
            created_at: datetime!(2025-04-01 00:00 UTC),
            updated_at: datetime!(2025-04-01 00:00 UTC),
        };
        assert!(matches!(
            require_verified(&staff),
            Err(AppError::PreconditionFailed(_))
        ));

        let verified = Staff {
            is_verified: true,
            ..staff
        };
        assert!(require_verified(&verified).is_ok());
    }
}
