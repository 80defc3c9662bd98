//! sqlx implementations of the catalog store traits.

pub mod category;
pub mod product;
pub mod role;
pub mod schema;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use role::RoleRepository;
pub use schema::SchemaRepository;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::types::SchemaGap;

/// PostgreSQL `undefined_column`.
const UNDEFINED_COLUMN: &str = "42703";

/// Whether the database rejected the statement for naming a missing column.
fn is_undefined_column(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNDEFINED_COLUMN))
}

/// Map a sqlx error into an [`AppError`].
///
/// `optional` names the optional column the failed statement carried, if
/// any. An undefined-column failure is attributed to that column; every
/// other failure is a repository (transport/store) error.
pub(crate) fn map_db_error(err: sqlx::Error, message: &str, optional: Option<SchemaGap>) -> AppError {
    if is_undefined_column(&err) {
        return match optional {
            Some(gap) => {
                let mut app_err = AppError::schema(gap);
                app_err.source = Some(Box::new(err));
                app_err
            }
            None => AppError::with_source(
                ErrorKind::Schema,
                format!("{message}: the database schema is older than expected"),
                err,
            ),
        };
    }
    AppError::with_source(ErrorKind::Repository, format!("{message}: {err}"), err)
}

/// The gap a statement is exposed to when it names an optional column.
pub(crate) fn carried(gap: SchemaGap, names_column: bool) -> Option<SchemaGap> {
    names_column.then_some(gap)
}
