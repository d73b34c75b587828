use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, Timelike};
use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::engine::query::{AttendanceQueryEngine, PagedList, QuerySpec};
use crate::engine::result::{ApiResult, ErrorCode};
use crate::engine::store::{AttendanceRecordStore, EmployeeLookup, StoreError};
use crate::engine::time_window::{self, Clock, TimeWindowPolicy};
use crate::model::attendance::{
    AttendanceDetail, AttendanceListItem, AttendanceRecord, AttendanceSummary, CheckInResponse,
    NewAttendanceRecord,
};
use crate::model::role::Role;

/// Check-in admission and attendance reporting.
///
/// Holds no mutable state between calls; every durable fact lives in the
/// store. Domain outcomes come back as `ApiResult`, store faults as `Err`.
pub struct AttendanceTrackingEngine {
    store: Arc<dyn AttendanceRecordStore>,
    employees: Arc<dyn EmployeeLookup>,
    clock: Arc<dyn Clock>,
    policy: TimeWindowPolicy,
    queries: AttendanceQueryEngine,
}

impl AttendanceTrackingEngine {
    pub fn new(
        store: Arc<dyn AttendanceRecordStore>,
        employees: Arc<dyn EmployeeLookup>,
        clock: Arc<dyn Clock>,
        policy: TimeWindowPolicy,
    ) -> Self {
        Self {
            queries: AttendanceQueryEngine::new(store.clone()),
            store,
            employees,
            clock,
            policy,
        }
    }

    #[instrument(name = "attendance_check_in", skip(self))]
    pub async fn check_in(
        &self,
        employee_id: Uuid,
        role: Role,
    ) -> Result<ApiResult<CheckInResponse>, StoreError> {
        if role != Role::Employee {
            return Ok(ApiResult::fail(
                ErrorCode::Unauthorized,
                "Only employees can check in.",
            ));
        }

        if employee_id.is_nil() {
            return Ok(ApiResult::fail(
                ErrorCode::ValidationError,
                "Employee ID is required.",
            ));
        }

        let Some(employee) = self.employees.get_by_id(employee_id).await? else {
            info!("Check-in rejected: employee not found");
            return Ok(ApiResult::fail(ErrorCode::NotFound, "Employee not found."));
        };

        let now = self.clock.now_utc();
        let local = self.policy.zone().to_local(now);
        if !self.policy.is_within_check_in_window(local.time()) {
            info!(local_time = %local.time(), "Check-in rejected: outside window");
            return Ok(ApiResult::fail(
                ErrorCode::TimeRestriction,
                "Check-in is only allowed between 7:30 AM and 9:00 AM.",
            ));
        }

        let today = local.date();
        if self
            .store
            .exists_for_employee_on_date(employee_id, today)
            .await?
        {
            info!(date = %today, "Duplicate check-in");
            return Ok(duplicate_check_in(today));
        }

        // stored at whole-second precision
        let check_in_time = local.time().with_nanosecond(0).unwrap_or(local.time());
        let inserted = self
            .store
            .insert(NewAttendanceRecord {
                employee_id,
                check_in_date: today,
                check_in_time,
                created_date: now,
            })
            .await;

        let record = match inserted {
            Ok(record) => record,
            Err(StoreError::Conflict) => {
                warn!(date = %today, "Concurrent check-in lost the insert race");
                return Ok(duplicate_check_in(today));
            }
            Err(e) => return Err(e),
        };
        self.store.commit().await?;

        info!(attendance_id = %record.attendance_id, status = %record.status(), "Checked in");

        Ok(ApiResult::ok(CheckInResponse {
            success: true,
            message: "Check-in successful".to_string(),
            attendance: Some(AttendanceDetail::project(&record, Some(&employee))),
            check_in_time: Some(record.check_in_time),
            check_in_date: record.check_in_date,
        }))
    }

    /// Monday through Sunday of the current UTC week.
    #[instrument(name = "attendance_weekly", skip(self))]
    pub async fn weekly_attendance(
        &self,
        employee_id: Uuid,
        role: Role,
    ) -> Result<ApiResult<Vec<AttendanceListItem>>, StoreError> {
        if role != Role::Employee {
            return Ok(ApiResult::fail(
                ErrorCode::Unauthorized,
                "Only employees can view their attendance.",
            ));
        }

        let week_start = time_window::start_of_week(self.clock.now_utc().date_naive());
        let week_end = week_start + Duration::days(6);
        let records = self
            .store
            .query_by_employee_and_date_range(employee_id, week_start, week_end)
            .await?;

        Ok(ApiResult::ok(self.project_list(&records, true).await?))
    }

    #[instrument(name = "attendance_monthly", skip(self))]
    pub async fn monthly_attendance(
        &self,
        employee_id: Uuid,
        year: i32,
        month: u32,
        role: Role,
    ) -> Result<ApiResult<Vec<AttendanceListItem>>, StoreError> {
        if role != Role::Employee {
            return Ok(ApiResult::fail(
                ErrorCode::Unauthorized,
                "Only employees can view their attendance.",
            ));
        }

        let Some((first, last)) = time_window::month_bounds(year, month) else {
            return Ok(ApiResult::fail(
                ErrorCode::ValidationError,
                "Month must be between 1 and 12.",
            ));
        };

        let records = self
            .store
            .query_by_employee_and_date_range(employee_id, first, last)
            .await?;

        Ok(ApiResult::ok(self.project_list(&records, true).await?))
    }

    /// Every record for the local current day.
    #[instrument(name = "attendance_daily", skip(self))]
    pub async fn daily_attendance_list(
        &self,
        role: Role,
    ) -> Result<ApiResult<Vec<AttendanceListItem>>, StoreError> {
        if role != Role::Admin {
            return Ok(ApiResult::fail(
                ErrorCode::Unauthorized,
                "Only admins can view daily attendance.",
            ));
        }

        let today = self.policy.local_now(self.clock.as_ref()).date();
        let spec = QuerySpec {
            from_date: Some(today),
            to_date: Some(today),
            page_number: 1,
            page_size: u32::MAX,
            ..QuerySpec::default()
        };

        let page = self.queries.run(&spec).await?;
        let records: Vec<AttendanceRecord> = page.items.into_iter().map(|r| r.record).collect();

        Ok(ApiResult::ok(self.project_list(&records, true).await?))
    }

    #[instrument(name = "attendance_paginated", skip(self, spec))]
    pub async fn paginated_attendance(
        &self,
        spec: &QuerySpec,
        role: Role,
    ) -> Result<ApiResult<PagedList<AttendanceListItem>>, StoreError> {
        if role != Role::Admin {
            return Ok(ApiResult::fail(
                ErrorCode::Unauthorized,
                "Only admins can view paginated attendance.",
            ));
        }

        let mut page = self.queries.run(spec).await?;
        let records: Vec<AttendanceRecord> =
            std::mem::take(&mut page.items).into_iter().map(|r| r.record).collect();
        let items = self.project_list(&records, spec.include_employee).await?;

        Ok(ApiResult::ok(page.with_items(items)))
    }

    /// Record counts: all time, local today, local current month.
    #[instrument(name = "attendance_summary", skip(self))]
    pub async fn attendance_summary(
        &self,
        role: Role,
    ) -> Result<ApiResult<AttendanceSummary>, StoreError> {
        if role != Role::Admin {
            return Ok(ApiResult::fail(
                ErrorCode::Unauthorized,
                "Only admins can view attendance summary.",
            ));
        }

        let today = self.policy.local_now(self.clock.as_ref()).date();
        let (total_records, today_count, month_count) = futures::try_join!(
            self.store.count_all(),
            self.store.count_on_date(today),
            self.store.count_in_month(today.year(), today.month()),
        )?;

        Ok(ApiResult::ok(AttendanceSummary {
            total_records,
            today_count,
            month_count,
        }))
    }

    async fn project_list(
        &self,
        records: &[AttendanceRecord],
        include_employee: bool,
    ) -> Result<Vec<AttendanceListItem>, StoreError> {
        let names = if include_employee {
            self.resolve_names(records).await?
        } else {
            HashMap::new()
        };

        Ok(records
            .iter()
            .map(|r| AttendanceListItem::project(r, names.get(&r.employee_id).cloned().flatten()))
            .collect())
    }

    /// One lookup per distinct employee, run concurrently.
    async fn resolve_names(
        &self,
        records: &[AttendanceRecord],
    ) -> Result<HashMap<Uuid, Option<String>>, StoreError> {
        let mut ids: Vec<Uuid> = records.iter().map(|r| r.employee_id).collect();
        ids.sort_unstable();
        ids.dedup();

        debug!(employees = ids.len(), "Resolving employee names");

        let employees = try_join_all(ids.iter().map(|id| self.employees.get_by_id(*id))).await?;
        Ok(ids
            .into_iter()
            .zip(employees)
            .map(|(id, employee)| (id, employee.map(|e| e.full_name())))
            .collect())
    }
}

fn duplicate_check_in(today: chrono::NaiveDate) -> ApiResult<CheckInResponse> {
    ApiResult::fail_with(
        ErrorCode::DuplicateCheckIn,
        "You have already checked in today.",
        CheckInResponse {
            success: false,
            message: "Duplicate check-in attempt".to_string(),
            attendance: None,
            check_in_time: None,
            check_in_date: today,
        },
    )
}
