//! Shared helpers for Diesel persistence adapters.

use diesel::sql_types::{Bool, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

#[derive(diesel::QueryableByName)]
struct Presence {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Whether a table exists in the connected database.
///
/// Mirrors the legacy schema probe: read components check this once per
/// request and fall back to placeholder data when the table is absent.
/// The name is bound as a parameter, never interpolated.
pub(crate) async fn table_present(
    conn: &mut AsyncPgConnection,
    table: &str,
) -> Result<bool, diesel::result::Error> {
    let row: Presence = diesel::sql_query("SELECT to_regclass($1) IS NOT NULL AS present")
        .bind::<Text, _>(table)
        .get_result(conn)
        .await?;
    Ok(row.present)
}

/// Reduce a Diesel error to a log-safe message for port error payloads.
pub(crate) fn describe_diesel_error(error: &diesel::result::Error) -> String {
    use diesel::result::Error as DieselError;

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            "database error".to_owned()
        }
        DieselError::NotFound => "record not found".to_owned(),
        other => {
            debug!(
                error_type = %std::any::type_name_of_val(other),
                "diesel operation failed"
            );
            "database error".to_owned()
        }
    }
}
