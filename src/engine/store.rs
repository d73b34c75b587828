use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::model::attendance::{AttendanceRecord, AttendanceRow, NewAttendanceRecord};
use crate::model::employee::Employee;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A record already exists for the same employee and date.
    #[error("attendance record already exists for this employee and date")]
    Conflict,

    #[error("storage failure: {0}")]
    Unavailable(String),
}

/// Storage-native predicates. Everything here can be evaluated by the store;
/// computed fields are filtered by the query engine afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Read access to employee profiles.
#[async_trait]
pub trait EmployeeLookup: Send + Sync {
    async fn get_by_id(&self, employee_id: Uuid) -> Result<Option<Employee>, StoreError>;
}

/// Durable attendance storage. Implementations must enforce uniqueness of
/// `(employee_id, check_in_date)` and report violations as `StoreError::Conflict`.
#[async_trait]
pub trait AttendanceRecordStore: Send + Sync {
    async fn exists_for_employee_on_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, StoreError>;

    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError>;

    /// Records of one employee with `from <= check_in_date <= to`, ordered by date then time.
    async fn query_by_employee_and_date_range(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Rows matching `filter`, unpaginated, with the count of matched rows.
    async fn query_filtered(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<(Vec<AttendanceRow>, usize), StoreError>;

    async fn count_all(&self) -> Result<u64, StoreError>;

    async fn count_on_date(&self, date: NaiveDate) -> Result<u64, StoreError>;

    async fn count_in_month(&self, year: i32, month: u32) -> Result<u64, StoreError>;

    /// Flushes pending writes.
    async fn commit(&self) -> Result<(), StoreError>;
}
