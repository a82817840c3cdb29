use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "staff_scope", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffScope {
    Society,
    Member,
}

impl StaffScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffScope::Society => "society",
            StaffScope::Member => "member",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub staff_scope: StaffScope,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub society_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub company_id: i64,
    pub aadhaar_number: Option<String>,
    pub residential_address: Option<String>,
    pub next_of_kin_name: Option<String>,
    pub next_of_kin_mobile: Option<String>,
    pub photo_url: Option<String>,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub verified_at: Option<OffsetDateTime>,
    pub verified_by_member_id: Option<i64>,
    pub created_by: i64,
    pub updated_by: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Tagged reference to either staff table. Constructed once at the API
/// boundary from the (staff_id, staff_type) pair so the scope branching
/// lives in a single resolver instead of every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRef {
    Society(Uuid),
    Member(Uuid),
}

impl StaffRef {
    pub fn new(scope: StaffScope, id: Uuid) -> Self {
        match scope {
            StaffScope::Society => StaffRef::Society(id),
            StaffScope::Member => StaffRef::Member(id),
        }
    }

    pub fn scope(&self) -> StaffScope {
        match self {
            StaffRef::Society(_) => StaffScope::Society,
            StaffRef::Member(_) => StaffScope::Member,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            StaffRef::Society(id) | StaffRef::Member(id) => *id,
        }
    }
}

/// Display fields shared by both staff tables.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StaffSummary {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub photo_url: Option<String>,
}

pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if mobile.len() == 12 && mobile.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mobile");
        err.message = Some("must be a 12 digit mobile number".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_scope_ids))]
pub struct NewStaff {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = validate_mobile))]
    pub mobile: String,
    #[validate(email)]
    pub email: Option<String>,
    pub staff_scope: StaffScope,
    #[validate(length(max = 255))]
    pub department: Option<String>,
    #[validate(length(max = 255))]
    pub designation: Option<String>,
    pub society_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub company_id: i64,
}

fn validate_scope_ids(staff: &NewStaff) -> Result<(), ValidationError> {
    match staff.staff_scope {
        StaffScope::Society if staff.society_id.is_none() => {
            let mut err = ValidationError::new("society_id");
            err.message = Some("society_id is required for society staff".into());
            Err(err)
        }
        StaffScope::Member if staff.unit_id.is_none() => {
            let mut err = ValidationError::new("unit_id");
            err.message = Some("unit_id is required for member staff".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaff {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub department: Option<String>,
    #[validate(length(max = 255))]
    pub designation: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyStaff {
    #[validate(length(equal = 12))]
    pub aadhaar_number: String,
    #[validate(length(min = 1))]
    pub residential_address: String,
    #[validate(length(min = 1, max = 255))]
    pub next_of_kin_name: String,
    #[validate(custom(function = validate_mobile))]
    pub next_of_kin_mobile: String,
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_must_be_twelve_digits() {
        assert!(validate_mobile("919876543210").is_ok());
        assert!(validate_mobile("9876543210").is_err());
        assert!(validate_mobile("91987654321a").is_err());
        assert!(validate_mobile("9198765432101").is_err());
    }

    #[test]
    fn staff_ref_round_trips_scope_and_id() {
        let id = Uuid::new_v4();
        let society = StaffRef::new(StaffScope::Society, id);
        assert_eq!(society.scope(), StaffScope::Society);
        assert_eq!(society.id(), id);

        let member = StaffRef::new(StaffScope::Member, id);
        assert_eq!(member.scope(), StaffScope::Member);
        assert_eq!(member.id(), id);
    }

    #[test]
    fn society_staff_requires_society_id() {
        let staff = NewStaff {
            name: "Ramesh".to_string(),
            mobile: "919876543210".to_string(),
            email: None,
            staff_scope: StaffScope::Society,
            department: None,
            designation: None,
            society_id: None,
            unit_id: None,
            company_id: 1,
        };
        assert!(staff.validate().is_err());
    }
}
