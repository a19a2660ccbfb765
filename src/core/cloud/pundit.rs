//! Stack status classification.
//!
//! A classifier answers two questions about a CloudFormation status string:
//! is the stack done changing, and if so, did it land somewhere healthy.
//! The same poll loop serves both upserts and deletes by swapping the
//! classifier it is handed.

/// Status reported for a stack the provider no longer knows about.
pub const STACK_NOT_FOUND: &str = "STACK_NOT_FOUND";

/// Strategy for judging stack statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClassifier {
    /// Judges statuses produced by a create or update.
    Upsert,
    /// Judges statuses produced by a delete.
    Delete,
}

impl StatusClassifier {
    /// No further polling is needed.
    pub fn is_complete(self, status: &str) -> bool {
        match self {
            Self::Upsert => {
                status.ends_with("_COMPLETE")
                    || status.ends_with("_FAILED")
                    || status.starts_with("ROLLBACK_")
            }
            Self::Delete => matches!(status, "DELETE_COMPLETE" | "DELETE_FAILED" | STACK_NOT_FOUND),
        }
    }

    /// The stack settled in a good state. Only meaningful once complete.
    pub fn is_healthy(self, status: &str) -> bool {
        match self {
            Self::Upsert => {
                status.ends_with("_COMPLETE")
                    && !status.contains("ROLLBACK")
                    && !status.starts_with("DELETE_")
            }
            Self::Delete => matches!(status, "DELETE_COMPLETE" | STACK_NOT_FOUND),
        }
    }

    /// Short description for logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Upsert => "upsert",
            Self::Delete => "delete",
        }
    }
}
