use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of account roles. Stored as its variant name.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
    sqlx::Type,
)]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Job title given to a freshly registered account.
    pub fn default_job_title(&self) -> &'static str {
        match self {
            Role::Admin => "HR",
            Role::Employee => "Employee",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_and_prints_variant_names() {
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert_eq!(Role::Employee.to_string(), "Employee");
        assert!(Role::from_str("Hr").is_err());
    }

    #[test]
    fn json_uses_variant_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Admin\"");
        let role: Role = serde_json::from_str("\"Employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
