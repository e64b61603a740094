// fsgate - Write Confirmation
//
// Destructive operations require a confirmation collaborator. The real
// confirmation UI is out of scope: the shipped sink always reports
// Pending, so the server describes the write but never performs it.

/// A write operation awaiting confirmation.
#[derive(Debug, Clone, Copy)]
pub struct WriteRequest<'a> {
    pub path: &'a str,
    pub content: &'a str,
}

/// Outcome of asking the confirmation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The caller confirmed — the write may proceed.
    Approved,
    /// Confirmation has not been granted. Report the pending operation
    /// to the caller; do not touch the filesystem.
    Pending,
}

/// Capability interface for the confirmation workflow.
pub trait ConfirmationSink {
    fn confirm(&self, request: &WriteRequest) -> ConfirmOutcome;
}

/// Stub sink: every write stays pending until a real confirmation
/// collaborator is wired in.
#[derive(Debug, Default)]
pub struct PendingConfirmation;

impl ConfirmationSink for PendingConfirmation {
    fn confirm(&self, _request: &WriteRequest) -> ConfirmOutcome {
        ConfirmOutcome::Pending
    }
}

// ============================================================================
// TESTS
// ============================================================================
