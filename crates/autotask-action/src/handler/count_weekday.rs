//! Weekday counting action handler.
//!
//! Counts the lines of a dates file that contain a weekday token and writes
//! the count as plain decimal text.

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct CountWeekdayHandler {
    token: &'static str,
    message: &'static str,
}

impl CountWeekdayHandler {
    pub fn new(token: &'static str, message: &'static str) -> Self {
        Self { token, message }
    }

    /// Handler for the "count wednesdays" catalogue entry.
    pub fn wednesdays() -> Self {
        Self::new("Wed", "Wednesdays counted successfully.")
    }
}

fn count_lines_containing(content: &str, token: &str) -> usize {
    content.lines().filter(|line| line.contains(token)).count()
}

#[async_trait]
impl ActionHandler for CountWeekdayHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CountWeekday
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let input = ctx.target("input")?.clone();
        let output = ctx.target("output")?.clone();
        let token = self.token;

        let count = fs::blocking(move || {
            let content = fs::read_input(&input)?;
            let count = count_lines_containing(&content, token);
            fs::write_output(&output, count.to_string().as_bytes())?;
            Ok(count)
        })
        .await?;

        tracing::info!(token = %self.token, count, "Weekday occurrences counted");
        Ok(self.message.to_string())
    }
}
