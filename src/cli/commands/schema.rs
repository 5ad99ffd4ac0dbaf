//! `tb schema [task|task-input|page|error|all]`
//!
//! Prints JSON Schema for the types that cross the HTTP boundary.

use schemars::schema_for;
use serde_json::{Value, json};

use crate::api::ApiError;
use crate::cli::SchemaTarget;
use crate::cli::commands::print_json;
use crate::error::Result;
use crate::model::{PaginatedResult, Task, TaskInput};

/// Execute the schema command.
///
/// # Errors
///
/// Returns an error if a schema cannot be serialized.
pub fn execute(target: SchemaTarget) -> Result<()> {
    print_json(&schema(target)?)
}

/// The schema document for `target`.
///
/// # Errors
///
/// Returns an error if a schema cannot be serialized.
pub fn schema(target: SchemaTarget) -> Result<Value> {
    let value = match target {
        SchemaTarget::Task => serde_json::to_value(schema_for!(Task))?,
        SchemaTarget::TaskInput => serde_json::to_value(schema_for!(TaskInput))?,
        SchemaTarget::Page => serde_json::to_value(schema_for!(PaginatedResult<Task>))?,
        SchemaTarget::Error => serde_json::to_value(schema_for!(ApiError))?,
        SchemaTarget::All => json!({
            "Task": schema(SchemaTarget::Task)?,
            "TaskInput": schema(SchemaTarget::TaskInput)?,
            "PaginatedResult": schema(SchemaTarget::Page)?,
            "ApiError": schema(SchemaTarget::Error)?,
        }),
    };
    Ok(value)
}
