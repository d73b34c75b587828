//! In-memory collaborators for engine tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::engine::store::{AttendanceFilter, AttendanceRecordStore, EmployeeLookup, StoreError};
use crate::engine::time_window::Clock;
use crate::model::attendance::{AttendanceRecord, AttendanceRow, NewAttendanceRecord};
use crate::model::employee::Employee;

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> Self {
        FixedClock(Utc.with_ymd_and_hms(year, month, day, h, m, s).unwrap())
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn row(first: &str, last: &str, date: NaiveDate, time: NaiveTime) -> AttendanceRow {
    AttendanceRow {
        record: AttendanceRecord {
            attendance_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            check_in_date: date,
            check_in_time: time,
            created_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        },
        employee_first_name: first.to_string(),
        employee_last_name: last.to_string(),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AttendanceRecord>>,
    employees: Mutex<HashMap<Uuid, Employee>>,
    /// Makes the pre-insert existence check always miss, as a racing request would.
    pub blind_exists_check: AtomicBool,
    pub fail_queries: AtomicBool,
    pub calls: AtomicUsize,
    pub commits: AtomicUsize,
    pub lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn add_employee(&self, first: &str, last: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.employees.lock().unwrap().insert(
            id,
            Employee {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}.{}@company.com", first.to_lowercase(), last.to_lowercase()),
            },
        );
        id
    }

    pub fn seed(&self, employee_id: Uuid, date: NaiveDate, time: NaiveTime) -> AttendanceRecord {
        let mut records = self.records.lock().unwrap();
        let record = AttendanceRecord {
            attendance_id: Uuid::new_v4(),
            employee_id,
            check_in_date: date,
            check_in_time: time,
            created_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::seconds(records.len() as i64),
        };
        records.push(record.clone());
        record
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn store_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeLookup for MemoryStore {
    async fn get_by_id(&self, employee_id: Uuid) -> Result<Option<Employee>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.employees.lock().unwrap().get(&employee_id).cloned())
    }
}

#[async_trait]
impl AttendanceRecordStore for MemoryStore {
    async fn exists_for_employee_on_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, StoreError> {
        self.touch()?;
        if self.blind_exists_check.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.employee_id == employee_id && r.check_in_date == date))
    }

    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        self.touch()?;
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.employee_id == record.employee_id && r.check_in_date == record.check_in_date)
        {
            return Err(StoreError::Conflict);
        }
        let stored = AttendanceRecord {
            attendance_id: Uuid::new_v4(),
            employee_id: record.employee_id,
            check_in_date: record.check_in_date,
            check_in_time: record.check_in_time,
            created_date: record.created_date,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn query_by_employee_and_date_range(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.touch()?;
        let mut found: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.employee_id == employee_id && r.check_in_date >= from && r.check_in_date <= to)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.check_in_date, r.check_in_time));
        Ok(found)
    }

    async fn query_filtered(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<(Vec<AttendanceRow>, usize), StoreError> {
        self.touch()?;
        let employees = self.employees.lock().unwrap();
        let rows: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| filter.from_date.is_none_or(|from| r.check_in_date >= from))
            .filter(|r| filter.to_date.is_none_or(|to| r.check_in_date <= to))
            .map(|r| {
                let employee = employees.get(&r.employee_id);
                AttendanceRow {
                    record: r.clone(),
                    employee_first_name: employee.map(|e| e.first_name.clone()).unwrap_or_default(),
                    employee_last_name: employee.map(|e| e.last_name.clone()).unwrap_or_default(),
                }
            })
            .collect();
        let count = rows.len();
        Ok((rows, count))
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        self.touch()?;
        Ok(self.records.lock().unwrap().len() as u64)
    }

    async fn count_on_date(&self, date: NaiveDate) -> Result<u64, StoreError> {
        self.touch()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.check_in_date == date)
            .count() as u64)
    }

    async fn count_in_month(&self, year: i32, month: u32) -> Result<u64, StoreError> {
        self.touch()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.check_in_date.year() == year && r.check_in_date.month() == month)
            .count() as u64)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        self.touch()?;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
