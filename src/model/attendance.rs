use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::time_window;
use crate::model::employee::Employee;

/// On-time / late classification of a check-in. Never persisted.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    OnTime,
    Late,
}

impl AttendanceStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "On Time",
            AttendanceStatus::Late => "Late",
        }
    }
}

/// One stored check-in event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub attendance_id: Uuid,
    pub employee_id: Uuid,
    /// Local calendar date of the check-in.
    pub check_in_date: NaiveDate,
    /// Local time of day of the check-in.
    pub check_in_time: NaiveTime,
    /// UTC audit timestamp, set once at insert.
    pub created_date: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn is_on_time(&self) -> bool {
        self.status() == AttendanceStatus::OnTime
    }

    pub fn is_late(&self) -> bool {
        !self.is_on_time()
    }

    pub fn status(&self) -> AttendanceStatus {
        time_window::classify(self.check_in_time)
    }

    pub fn check_in_date_string(&self) -> String {
        self.check_in_date.format("%Y-%m-%d").to_string()
    }

    pub fn check_in_time_string(&self) -> String {
        self.check_in_time.format("%H:%M").to_string()
    }
}

/// Insert payload; the store assigns the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendanceRecord {
    pub employee_id: Uuid,
    pub check_in_date: NaiveDate,
    pub check_in_time: NaiveTime,
    pub created_date: DateTime<Utc>,
}

/// A record joined with the employee name columns needed for sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub record: AttendanceRecord,
    pub employee_first_name: String,
    pub employee_last_name: String,
}

// -------------------- Projections --------------------

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "attendance_id": "0f8fad5b-d9cb-469f-a165-70867728950e",
    "employee_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
    "employee_full_name": "John Doe",
    "check_in_date": "2026-01-15",
    "check_in_time": "08:12:40",
    "is_on_time": true,
    "status": "OnTime",
    "status_display_name": "On Time"
}))]
pub struct AttendanceListItem {
    #[schema(value_type = String, format = "uuid")]
    pub attendance_id: Uuid,
    #[schema(value_type = String, format = "uuid")]
    pub employee_id: Uuid,
    pub employee_full_name: Option<String>,
    #[schema(value_type = String, format = "date")]
    pub check_in_date: NaiveDate,
    #[schema(value_type = String, example = "08:12:40")]
    pub check_in_time: NaiveTime,
    pub is_on_time: bool,
    pub status: AttendanceStatus,
    pub status_display_name: String,
}

impl AttendanceListItem {
    pub fn project(record: &AttendanceRecord, employee_full_name: Option<String>) -> Self {
        let status = record.status();
        Self {
            attendance_id: record.attendance_id,
            employee_id: record.employee_id,
            employee_full_name,
            check_in_date: record.check_in_date,
            check_in_time: record.check_in_time,
            is_on_time: record.is_on_time(),
            status,
            status_display_name: status.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceDetail {
    #[schema(value_type = String, format = "uuid")]
    pub attendance_id: Uuid,
    #[schema(value_type = String, format = "uuid")]
    pub employee_id: Uuid,
    pub employee_full_name: Option<String>,
    pub employee_email: Option<String>,
    #[schema(value_type = String, format = "date")]
    pub check_in_date: NaiveDate,
    #[schema(value_type = String, example = "08:12:40")]
    pub check_in_time: NaiveTime,
    #[schema(value_type = String, format = "date-time")]
    pub created_date: DateTime<Utc>,
    #[schema(example = "2026-01-15")]
    pub check_in_date_string: String,
    #[schema(example = "08:12")]
    pub check_in_time_string: String,
    pub is_on_time: bool,
    pub is_late: bool,
    pub status: AttendanceStatus,
    pub status_display_name: String,
}

impl AttendanceDetail {
    pub fn project(record: &AttendanceRecord, employee: Option<&Employee>) -> Self {
        let status = record.status();
        Self {
            attendance_id: record.attendance_id,
            employee_id: record.employee_id,
            employee_full_name: employee.map(Employee::full_name),
            employee_email: employee.map(|e| e.email.clone()),
            check_in_date: record.check_in_date,
            check_in_time: record.check_in_time,
            created_date: record.created_date,
            check_in_date_string: record.check_in_date_string(),
            check_in_time_string: record.check_in_time_string(),
            is_on_time: record.is_on_time(),
            is_late: record.is_late(),
            status,
            status_display_name: status.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CheckInResponse {
    pub success: bool,
    #[schema(example = "Check-in successful")]
    pub message: String,
    pub attendance: Option<AttendanceDetail>,
    #[schema(value_type = Option<String>, example = "08:12:40")]
    pub check_in_time: Option<NaiveTime>,
    #[schema(value_type = String, format = "date")]
    pub check_in_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 1250)]
    pub total_records: u64,
    #[schema(example = 42)]
    pub today_count: u64,
    #[schema(example = 610)]
    pub month_count: u64,
}
