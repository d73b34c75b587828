use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error};
use uuid::Uuid;

use crate::engine::store::{AttendanceFilter, AttendanceRecordStore, StoreError};
use crate::model::attendance::{AttendanceRecord, AttendanceRow, NewAttendanceRecord};
use crate::repository::{parse_uuid, storage_error};

#[derive(FromRow)]
struct AttendanceSql {
    attendance_id: String,
    employee_id: String,
    check_in_date: NaiveDate,
    check_in_time: NaiveTime,
    created_date: DateTime<Utc>,
}

impl TryFrom<AttendanceSql> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceSql) -> Result<Self, Self::Error> {
        Ok(AttendanceRecord {
            attendance_id: parse_uuid(&row.attendance_id)?,
            employee_id: parse_uuid(&row.employee_id)?,
            check_in_date: row.check_in_date,
            check_in_time: row.check_in_time,
            created_date: row.created_date,
        })
    }
}

#[derive(FromRow)]
struct AttendanceJoinedSql {
    #[sqlx(flatten)]
    attendance: AttendanceSql,
    first_name: Option<String>,
    last_name: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    Id(String),
    Date(NaiveDate),
}

/// MySQL-backed attendance storage.
///
/// Uniqueness of `(employee_id, check_in_date)` comes from the
/// `ux_attendance_employee_date` index; statements run in autocommit mode.
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRecordStore for MySqlAttendanceStore {
    async fn exists_for_employee_on_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, StoreError> {
        // EXISTS comes back as BIGINT on MySQL
        let found = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM attendance
                WHERE employee_id = ? AND check_in_date = ?
                LIMIT 1
            )
            "#,
        )
        .bind(employee_id.to_string())
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(found > 0)
    }

    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let attendance_id = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (attendance_id, employee_id, check_in_date, check_in_time, created_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(attendance_id.to_string())
        .bind(record.employee_id.to_string())
        .bind(record.check_in_date)
        .bind(record.check_in_time)
        .bind(record.created_date)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(AttendanceRecord {
                attendance_id,
                employee_id: record.employee_id,
                check_in_date: record.check_in_date,
                check_in_time: record.check_in_time,
                created_date: record.created_date,
            }),
            Err(e) => {
                // Duplicate check-in for same day
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return Err(StoreError::Conflict);
                    }
                }
                Err(storage_error(e))
            }
        }
    }

    async fn query_by_employee_and_date_range(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, AttendanceSql>(
            r#"
            SELECT attendance_id, employee_id, check_in_date, check_in_time, created_date
            FROM attendance
            WHERE employee_id = ?
            AND check_in_date BETWEEN ? AND ?
            ORDER BY check_in_date, check_in_time
            "#,
        )
        .bind(employee_id.to_string())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn query_filtered(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<(Vec<AttendanceRow>, usize), StoreError> {
        // ---------- build WHERE clause dynamically ----------
        let mut conditions = Vec::new();
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            conditions.push("a.employee_id = ?");
            args.push(FilterValue::Id(employee_id.to_string()));
        }

        if let Some(from) = filter.from_date {
            conditions.push("a.check_in_date >= ?");
            args.push(FilterValue::Date(from));
        }

        if let Some(to) = filter.to_date {
            conditions.push("a.check_in_date <= ?");
            args.push(FilterValue::Date(to));
        }

        let where_clause = if conditions.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let data_sql = format!(
            r#"
            SELECT a.attendance_id, a.employee_id, a.check_in_date, a.check_in_time,
                   a.created_date, e.first_name, e.last_name
            FROM attendance a
            LEFT JOIN employees e ON e.id = a.employee_id
            {}
            ORDER BY a.check_in_date DESC, a.check_in_time DESC
            "#,
            where_clause
        );
        debug!(sql = %data_sql, "Fetching attendance");

        let mut data_q = sqlx::query_as::<_, AttendanceJoinedSql>(&data_sql);
        for arg in args {
            data_q = match arg {
                FilterValue::Id(v) => data_q.bind(v),
                FilterValue::Date(d) => data_q.bind(d),
            };
        }

        let rows = data_q.fetch_all(&self.pool).await.map_err(|e| {
            error!(error = %e, sql = %data_sql, "Failed to fetch attendance");
            StoreError::Unavailable(e.to_string())
        })?;

        let rows = rows
            .into_iter()
            .map(|row| {
                Ok(AttendanceRow {
                    record: AttendanceRecord::try_from(row.attendance)?,
                    employee_first_name: row.first_name.unwrap_or_default(),
                    employee_last_name: row.last_name.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let matched = rows.len();

        Ok((rows, matched))
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(total.max(0) as u64)
    }

    async fn count_on_date(&self, date: NaiveDate) -> Result<u64, StoreError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE check_in_date = ?")
                .bind(date)
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error)?;
        Ok(total.max(0) as u64)
    }

    async fn count_in_month(&self, year: i32, month: u32) -> Result<u64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM attendance
            WHERE YEAR(check_in_date) = ? AND MONTH(check_in_date) = ?
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(total.max(0) as u64)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        // every statement above is autocommitted
        Ok(())
    }
}
