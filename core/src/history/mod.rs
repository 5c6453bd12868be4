/// Transaction-history retrieval and normalization.
///
/// Two deliberately independent backends: a block-explorer REST API for
/// native transfers and an indexing query service for contract transfers.
/// Both normalize into `HistoryRecord` and both swallow failures into an
/// empty list — a failed history load is never surfaced to the user.
mod explorer;
mod indexer;

#[cfg(test)]
pub(crate) mod testserver;

pub use explorer::{ExplorerClient, NATIVE_HISTORY_LIMIT};
pub use indexer::{IndexerClient, CONTRACT_HISTORY_LIMIT};

/// Which transfer flow produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Native,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Success,
    Failed,
    Pending,
}

/// Normalized transaction summary for display. Built fresh on every fetch and
/// fully replaced on the next one; never cached across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Transaction hash or indexer log id.
    pub id: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Display-unit decimal string, e.g. "0.01".
    pub amount_eth: String,
    /// Local-time display string.
    pub timestamp: String,
    pub status: HistoryStatus,
    pub kind: HistoryKind,
}
