use std::fmt;

/// Aggregate result of a step or window: rows affected plus the first
/// error encountered, if any. Counts accumulated before a failure are
/// retained, never rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub rows: u64,
    pub error: Option<String>,
}

impl Outcome {
    pub fn ok(rows: u64) -> Self {
        Outcome { rows, error: None }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Outcome {
            rows: 0,
            error: Some(error.into()),
        }
    }

    pub fn from_result<E: fmt::Display>(result: Result<u64, E>) -> Self {
        match result {
            Ok(rows) => Outcome::ok(rows),
            Err(err) => Outcome::fail(err.to_string()),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Sum counts; keep the first error seen.
    pub fn absorb(&mut self, other: Outcome) {
        self.rows += other.rows;
        if self.error.is_none() {
            self.error = other.error;
        }
    }
}
