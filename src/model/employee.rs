use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of an employee profile the attendance engine consumes.
///
/// Profiles are owned elsewhere; attendance code only reads names and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
