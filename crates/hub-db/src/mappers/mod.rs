//! Model to entity mappers
//!
//! Rows carry enum columns as text; converting them back to domain types can
//! fail, so every mapping is a `TryFrom<Model>` yielding `DomainError`.

mod audit_log;
mod file;
mod project;
mod user;

pub use project::ProjectCount;

use hub_core::DomainError;

/// Convert a batch of rows, failing on the first bad one
pub fn map_rows<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}

/// A text column held a value outside the domain's closed set
fn corrupt_column(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("unexpected value in {column}: {err}"))
}
