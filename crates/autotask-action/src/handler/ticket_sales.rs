//! Ticket sales action handler.
//!
//! Sums `units * price` over Gold tickets in the sales database.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

const GOLD_TOTAL_SQL: &str = "SELECT SUM(units * price) FROM tickets WHERE type = 'Gold'";

pub struct TicketSalesHandler;

/// Render a SQL aggregate the way it is written to the output file.
pub fn format_total(value: &Value) -> Result<String, HandlerError> {
    match value {
        Value::Null => Ok("0".to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(f) if f.is_finite() && f.fract() == 0.0 => Ok(format!("{:.1}", f)),
        Value::Real(f) => Ok(f.to_string()),
        Value::Text(_) | Value::Blob(_) => Err(HandlerError::domain(
            "ticket total is not numeric".to_string(),
        )),
    }
}

fn query_gold_total(conn: &Connection) -> Result<Value, HandlerError> {
    conn.query_row(GOLD_TOTAL_SQL, [], |row| row.get::<_, Value>(0))
        .map_err(|e| HandlerError::domain(format!("ticket sales query failed: {}", e)))
}

#[async_trait]
impl ActionHandler for TicketSalesHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::TicketSales
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let database = ctx.target("database")?.clone();
        let output = ctx.target("output")?.clone();

        let total = fs::blocking(move || {
            fs::require_input(&database)?;
            let conn = Connection::open_with_flags(
                &database.path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| {
                HandlerError::domain(format!("failed to open {}: {}", database.relative, e))
            })?;
            let total = format_total(&query_gold_total(&conn)?)?;
            fs::write_output(&output, total.as_bytes())?;
            Ok(total)
        })
        .await?;

        tracing::info!(total = %total, "Gold ticket sales calculated");
        Ok("Ticket sales calculated successfully.".to_string())
    }
}
