use crate::api::attendance::CheckInRequest;
use crate::engine::result::{ApiError, ErrorCode};
use crate::model::attendance::{
    AttendanceDetail, AttendanceListItem, AttendanceStatus, AttendanceSummary, CheckInResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance Tracking

Daily check-in for employees and attendance reporting for admins.

### 🔹 Key Features
- **Check-in**
  - Accepted between 07:30 and 09:00 local time, at most once per day
  - 09:00 or earlier is *On Time*, anything later is *Late*
- **Employee reports**
  - Current week and any calendar month
- **Admin reports**
  - Today's roster, a filtered and paginated list, and record counts

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Check-in and personal reports are for **Employee** tokens, the rest for **Admin**.

### 📦 Response Format
Every response is an envelope of `success`, `data` and `errors`.
Refusals come back as `400` with a machine-readable error code.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::weekly_attendance,
        crate::api::attendance::monthly_attendance,
        crate::api::attendance::daily_attendance,
        crate::api::attendance::paginated_attendance,
        crate::api::attendance::attendance_summary
    ),
    components(
        schemas(
            CheckInRequest,
            CheckInResponse,
            AttendanceDetail,
            AttendanceListItem,
            AttendanceStatus,
            AttendanceSummary,
            ApiError,
            ErrorCode
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance tracking APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
