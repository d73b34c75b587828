use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::store::{AttendanceFilter, AttendanceRecordStore, StoreError};
use crate::model::attendance::{AttendanceRow, AttendanceStatus};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SortOrder {
    EmployeeAsc,
    EmployeeDesc,
    DateAsc,
    #[default]
    DateDesc,
}

impl SortOrder {
    /// `employee`, `-employee`, `date`, `-date` (case-insensitive).
    /// Anything else, including no value, is the default order.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::to_lowercase).as_deref() {
            Some("employee") => SortOrder::EmployeeAsc,
            Some("-employee") => SortOrder::EmployeeDesc,
            Some("date") => SortOrder::DateAsc,
            _ => SortOrder::DateDesc,
        }
    }
}

/// Caller-supplied filter, sort and page parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub employee_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    pub sort_order: SortOrder,
    /// 1-based; values below 1 are treated as 1.
    pub page_number: u32,
    /// Values below 1 are treated as 1.
    pub page_size: u32,
    pub include_employee: bool,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            employee_id: None,
            from_date: None,
            to_date: None,
            status: None,
            sort_order: SortOrder::default(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            include_employee: true,
        }
    }
}

impl QuerySpec {
    fn storage_filter(&self) -> AttendanceFilter {
        AttendanceFilter {
            employee_id: self.employee_id,
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }
}

/// One page of a larger ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: usize, page_number: u32, page_size: u32) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1) as usize);
        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: (page_number as usize) < total_pages,
        }
    }

    /// Same page metadata over a different item type.
    pub fn with_items<U>(self, items: Vec<U>) -> PagedList<U> {
        PagedList {
            items,
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

fn compare_rows(order: SortOrder, a: &AttendanceRow, b: &AttendanceRow) -> Ordering {
    let by_employee = |a: &AttendanceRow, b: &AttendanceRow| {
        a.employee_first_name
            .cmp(&b.employee_first_name)
            .then_with(|| a.employee_last_name.cmp(&b.employee_last_name))
    };
    let by_date = |a: &AttendanceRow, b: &AttendanceRow| {
        a.record
            .check_in_date
            .cmp(&b.record.check_in_date)
            .then_with(|| a.record.check_in_time.cmp(&b.record.check_in_time))
    };

    let primary = match order {
        SortOrder::EmployeeAsc => by_employee(a, b),
        SortOrder::EmployeeDesc => by_employee(b, a),
        SortOrder::DateAsc => by_date(a, b),
        SortOrder::DateDesc => by_date(b, a),
    };

    // insertion order, then id, keeps the order total
    primary
        .then_with(|| a.record.created_date.cmp(&b.record.created_date))
        .then_with(|| a.record.attendance_id.cmp(&b.record.attendance_id))
}

/// Applies the computed-field filter, ordering and pagination to rows that
/// already passed the storage-native filters.
pub fn shape(mut rows: Vec<AttendanceRow>, spec: &QuerySpec) -> PagedList<AttendanceRow> {
    let page_number = spec.page_number.max(1);
    let page_size = spec.page_size.max(1);

    if let Some(status) = spec.status {
        rows.retain(|row| row.record.status() == status);
    }

    let total_count = rows.len();
    rows.sort_by(|a, b| compare_rows(spec.sort_order, a, b));

    let skip = (page_number as usize - 1).saturating_mul(page_size as usize);
    let items: Vec<AttendanceRow> = rows
        .into_iter()
        .skip(skip)
        .take(page_size as usize)
        .collect();

    PagedList::new(items, total_count, page_number, page_size)
}

/// Filtered, sorted, paginated views over the attendance store.
pub struct AttendanceQueryEngine {
    store: Arc<dyn AttendanceRecordStore>,
}

impl AttendanceQueryEngine {
    pub fn new(store: Arc<dyn AttendanceRecordStore>) -> Self {
        Self { store }
    }

    pub async fn run(&self, spec: &QuerySpec) -> Result<PagedList<AttendanceRow>, StoreError> {
        let (rows, matched) = self.store.query_filtered(&spec.storage_filter()).await?;
        let page = shape(rows, spec);

        debug!(
            storage_matches = matched,
            total_count = page.total_count,
            page_number = page.page_number,
            page_size = page.page_size,
            "Attendance query shaped"
        );

        Ok(page)
    }
}
