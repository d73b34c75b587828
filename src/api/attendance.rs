use std::str::FromStr;

use actix_web::{
    HttpRequest, HttpResponse,
    error::{ErrorForbidden, InternalError, PathError, QueryPayloadError},
    web,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::engine::query::{DEFAULT_PAGE_SIZE, QuerySpec, SortOrder};
use crate::engine::result::{ApiResult, ErrorCode};
use crate::engine::store::StoreError;
use crate::engine::tracking::AttendanceTrackingEngine;
use crate::model::attendance::AttendanceStatus;
use crate::model::role::Role;

const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// Defaults to the employee linked to the caller's token
    #[schema(value_type = Option<String>, format = "uuid", example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    #[param(value_type = Option<String>, example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub employee_id: Option<Uuid>,
    #[param(value_type = Option<String>, example = "2026-01-01")]
    pub from_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2026-01-31")]
    pub to_date: Option<NaiveDate>,
    /// `OnTime` or `Late`
    #[param(example = "Late")]
    pub status: Option<String>,
    /// `employee`, `-employee`, `date` or `-date`
    #[param(example = "-date")]
    pub sort_order: Option<String>,
    #[param(example = 1)]
    pub page: Option<u32>,
    #[param(example = 10)]
    pub per_page: Option<u32>,
    #[param(example = true)]
    pub include_employee: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    #[param(example = 2026)]
    pub year: Option<i32>,
    #[param(example = 1)]
    pub month: Option<u32>,
}

impl AttendanceQuery {
    fn to_spec(&self) -> Result<QuerySpec, String> {
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                AttendanceStatus::from_str(raw)
                    .map_err(|_| format!("Unknown status '{raw}'. Use OnTime or Late."))?,
            ),
        };

        Ok(QuerySpec {
            employee_id: self.employee_id,
            from_date: self.from_date,
            to_date: self.to_date,
            status,
            sort_order: SortOrder::from_param(self.sort_order.as_deref()),
            page_number: self.page.unwrap_or(1).max(1),
            page_size: self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PER_PAGE),
            include_employee: self.include_employee.unwrap_or(true),
        })
    }
}

/// Employees act only on their own record; other roles pass the id through
/// and are turned away by the engine.
fn resolve_employee(auth: &AuthUser, requested: Option<Uuid>) -> actix_web::Result<Uuid> {
    match (requested, auth.employee_id) {
        (Some(requested), Some(own)) if requested != own => Err(ErrorForbidden(
            "Employees can only access their own attendance",
        )),
        (_, Some(own)) => Ok(own),
        (requested, None) if auth.role != Role::Employee => Ok(requested.unwrap_or_default()),
        _ => Err(ErrorForbidden("No employee profile")),
    }
}

fn respond<T: Serialize>(
    outcome: Result<ApiResult<T>, StoreError>,
) -> actix_web::Result<HttpResponse> {
    match outcome {
        Ok(result) if result.success => Ok(HttpResponse::Ok().json(result)),
        Ok(result) => {
            debug!(code = ?result.first_error_code(), "Attendance request refused");
            Ok(HttpResponse::BadRequest().json(result))
        }
        Err(e) => {
            error!(error = %e, "Attendance store failure");
            Ok(HttpResponse::InternalServerError().json(ApiResult::<()>::fail(
                ErrorCode::StorageError,
                "Something went wrong, Contact with system admin",
            )))
        }
    }
}

fn validation_failure(message: impl Into<String>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::BadRequest().json(ApiResult::<()>::fail(ErrorCode::ValidationError, message)))
}

/// Unparseable query strings get the same envelope as other validation failures.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected attendance query string");
    let body = ApiResult::<()>::fail(ErrorCode::ValidationError, format!("Invalid query: {err}"));
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

pub fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected attendance path");
    let body = ApiResult::<()>::fail(ErrorCode::ValidationError, "Employee ID must be a UUID.");
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "success": true,
            "data": {
                "success": true,
                "message": "Check-in successful",
                "check_in_time": "08:12:40",
                "check_in_date": "2026-01-15",
                "attendance": {
                    "attendance_id": "0f8fad5b-d9cb-469f-a165-70867728950e",
                    "employee_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                    "employee_full_name": "John Doe",
                    "employee_email": "john.doe@company.com",
                    "check_in_date": "2026-01-15",
                    "check_in_time": "08:12:40",
                    "created_date": "2026-01-15T06:12:40Z",
                    "check_in_date_string": "2026-01-15",
                    "check_in_time_string": "08:12",
                    "is_on_time": true,
                    "is_late": false,
                    "status": "OnTime",
                    "status_display_name": "On Time"
                }
            },
            "errors": []
        })),
        (status = 400, description = "Outside the window, duplicate, unknown employee or wrong role", body = Object, example = json!({
            "success": false,
            "data": null,
            "errors": [{ "code": "TimeRestriction", "message": "Check-in is only allowed between 7:30 AM and 9:00 AM." }]
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    engine: web::Data<AttendanceTrackingEngine>,
    payload: Option<web::Json<CheckInRequest>>,
) -> actix_web::Result<HttpResponse> {
    let requested = payload.and_then(|p| p.into_inner().employee_id);
    let employee_id = resolve_employee(&auth, requested)?;
    info!(
        user_id = auth.user_id,
        username = %auth.username,
        employee_id = %employee_id,
        "Check-in requested"
    );

    respond(engine.check_in(employee_id, auth.role).await)
}

/// Current week (Monday through Sunday) for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/weekly/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Weekly attendance", body = Object, example = json!({
            "success": true,
            "data": [{
                "attendance_id": "0f8fad5b-d9cb-469f-a165-70867728950e",
                "employee_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                "employee_full_name": "John Doe",
                "check_in_date": "2026-01-12",
                "check_in_time": "09:00:00",
                "is_on_time": true,
                "status": "OnTime",
                "status_display_name": "On Time"
            }],
            "errors": []
        })),
        (status = 400, description = "Wrong role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn weekly_attendance(
    auth: AuthUser,
    engine: web::Data<AttendanceTrackingEngine>,
    path: web::Path<Uuid>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = resolve_employee(&auth, Some(path.into_inner()))?;

    respond(engine.weekly_attendance(employee_id, auth.role).await)
}

/// One calendar month for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/monthly/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Monthly attendance", body = Object, example = json!({
            "success": true,
            "data": [],
            "errors": []
        })),
        (status = 400, description = "Missing or invalid year/month, or wrong role", body = Object, example = json!({
            "success": false,
            "data": null,
            "errors": [{ "code": "ValidationError", "message": "Month must be between 1 and 12." }]
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn monthly_attendance(
    auth: AuthUser,
    engine: web::Data<AttendanceTrackingEngine>,
    path: web::Path<Uuid>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = resolve_employee(&auth, Some(path.into_inner()))?;

    let (Some(year), Some(month)) = (query.year, query.month) else {
        return validation_failure("Year and month are required query parameters.");
    };

    respond(
        engine
            .monthly_attendance(employee_id, year, month, auth.role)
            .await,
    )
}

/// Everyone who checked in today (local date)
#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    responses(
        (status = 200, description = "Today's check-ins", body = Object, example = json!({
            "success": true,
            "data": [],
            "errors": []
        })),
        (status = 400, description = "Admins only"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn daily_attendance(
    auth: AuthUser,
    engine: web::Data<AttendanceTrackingEngine>,
) -> actix_web::Result<HttpResponse> {
    respond(engine.daily_attendance_list(auth.role).await)
}

/// Filtered, sorted, paginated attendance
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Paginated attendance list", body = Object, example = json!({
            "success": true,
            "data": {
                "items": [],
                "total_count": 25,
                "page_number": 3,
                "page_size": 10,
                "total_pages": 3,
                "has_previous_page": true,
                "has_next_page": false
            },
            "errors": []
        })),
        (status = 400, description = "Admins only, or bad status filter"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn paginated_attendance(
    auth: AuthUser,
    engine: web::Data<AttendanceTrackingEngine>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<HttpResponse> {
    let spec = match query.to_spec() {
        Ok(spec) => spec,
        Err(message) => return validation_failure(message),
    };

    respond(engine.paginated_attendance(&spec, auth.role).await)
}

/// Record counts for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    responses(
        (status = 200, description = "Attendance counts", body = Object, example = json!({
            "success": true,
            "data": { "total_records": 1250, "today_count": 42, "month_count": 610 },
            "errors": []
        })),
        (status = 400, description = "Admins only"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    auth: AuthUser,
    engine: web::Data<AttendanceTrackingEngine>,
) -> actix_web::Result<HttpResponse> {
    respond(engine.attendance_summary(auth.role).await)
}
