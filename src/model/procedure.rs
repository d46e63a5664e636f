//! Stored procedures.

use serde::{Deserialize, Serialize};

use super::DbType;
use crate::metadata::qualified_name;

/// Direction of a procedure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcedureParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<ParameterDirection>,
    /// `None` when the reported type code has no portable equivalent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_type: Option<DbType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    /// Decimal digits; only recorded for decimal types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Procedure {
    pub name: String,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub returning_value: bool,
    #[serde(default)]
    pub parameters: Vec<ProcedureParameter>,
}

impl Procedure {
    pub fn new(name: impl Into<String>, catalog: Option<&str>, schema: Option<&str>) -> Self {
        Self {
            name: name.into(),
            catalog: catalog.map(str::to_string),
            schema: schema.map(str::to_string),
            returning_value: false,
            parameters: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(self.catalog.as_deref(), self.schema.as_deref(), &[&self.name])
    }
}
