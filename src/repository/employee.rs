use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use crate::engine::store::{EmployeeLookup, StoreError};
use crate::model::employee::Employee;
use crate::repository::{parse_uuid, storage_error};

#[derive(FromRow)]
struct EmployeeSql {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
}

pub struct MySqlEmployeeLookup {
    pool: MySqlPool,
}

impl MySqlEmployeeLookup {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeLookup for MySqlEmployeeLookup {
    async fn get_by_id(&self, employee_id: Uuid) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, EmployeeSql>(
            r#"
            SELECT id, first_name, last_name, email
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(employee_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(|e| {
            Ok(Employee {
                id: parse_uuid(&e.id)?,
                first_name: e.first_name,
                last_name: e.last_name,
                email: e.email,
            })
        })
        .transpose()
    }
}
