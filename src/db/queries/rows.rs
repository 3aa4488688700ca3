//! Route row database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{OrderAssignment, Row, RowPatch, RowRecord};

const ROW_COLUMNS: &str = r#"
    id, sort_order, route, code, location, delivery, delivery_alt,
    active, latitude, longitude, kilometer
"#;

/// List all rows in persisted order
pub async fn list_rows(pool: &PgPool) -> Result<Vec<Row>> {
    let records = sqlx::query_as::<_, RowRecord>(&format!(
        "SELECT {} FROM route_rows ORDER BY sort_order ASC, id ASC",
        ROW_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(records.into_iter().map(Row::from).collect())
}

/// Single-statement partial update. Absent patch fields keep the stored value;
/// `$10` clears the coordinates before `$8`/`$9` are applied.
const UPDATE_ROW_SQL: &str = r#"
    UPDATE route_rows
    SET
        route = COALESCE($2, route),
        code = COALESCE($3, code),
        location = COALESCE($4, location),
        delivery = COALESCE($5, delivery),
        delivery_alt = COALESCE($6, delivery_alt),
        active = COALESCE($7, active),
        latitude = CASE WHEN $10 THEN $8 ELSE COALESCE($8, latitude) END,
        longitude = CASE WHEN $10 THEN $9 ELSE COALESCE($9, longitude) END,
        kilometer = COALESCE($11, kilometer),
        updated_at = NOW()
    WHERE id = $1
"#;

/// Update a row with a partial patch. `None` if the row does not exist.
pub async fn update_row(pool: &PgPool, id: Uuid, patch: &RowPatch) -> Result<Option<Row>> {
    let record = sqlx::query_as::<_, RowRecord>(&format!(
        "{} RETURNING {}",
        UPDATE_ROW_SQL, ROW_COLUMNS
    ))
    .bind(id)
    .bind(patch.route.as_deref())
    .bind(patch.code.as_deref())
    .bind(patch.location.as_deref())
    .bind(patch.delivery.as_deref())
    .bind(patch.delivery_alt.map(|alt| alt.as_str()))
    .bind(patch.active)
    .bind(patch.latitude)
    .bind(patch.longitude)
    .bind(patch.clear_coordinates)
    .bind(patch.kilometer.as_deref())
    .fetch_optional(pool)
    .await?;

    Ok(record.map(Row::from))
}

/// Result of a reorder attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Applied,
    UnknownId(Uuid),
    LengthMismatch { expected: usize, actual: usize },
}

/// Write new `sort_order` values for every row in one transaction.
/// Nothing is written unless the assignments cover exactly the stored rows.
pub async fn reorder_rows(pool: &PgPool, assignments: &[OrderAssignment]) -> Result<ReorderOutcome> {
    let mut tx = pool.begin().await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM route_rows")
        .fetch_one(&mut *tx)
        .await?;
    if count as usize != assignments.len() {
        return Ok(ReorderOutcome::LengthMismatch {
            expected: count as usize,
            actual: assignments.len(),
        });
    }

    for assignment in assignments {
        let result = sqlx::query(
            "UPDATE route_rows SET sort_order = $1, updated_at = NOW() WHERE id = $2"
        )
        .bind(assignment.order)
        .bind(assignment.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Ok(ReorderOutcome::UnknownId(assignment.id));
        }
    }

    tx.commit().await?;
    Ok(ReorderOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_row_keeps_unpatched_columns_in_sql() {
        for column in ["route", "code", "location", "delivery", "delivery_alt", "active", "kilometer"] {
            let assignment = format!("{} = COALESCE(", column);
            assert!(UPDATE_ROW_SQL.contains(&assignment), "{} must fall back to the stored value", column);
        }
        assert!(UPDATE_ROW_SQL.contains("COALESCE($8, latitude)"));
        assert!(UPDATE_ROW_SQL.contains("COALESCE($9, longitude)"));
    }

    #[test]
    fn test_update_row_is_a_single_statement() {
        assert_eq!(UPDATE_ROW_SQL.matches("UPDATE").count(), 1);
        assert!(!UPDATE_ROW_SQL.contains("SELECT"));
        assert!(UPDATE_ROW_SQL.contains("WHERE id = $1"));
    }
}
