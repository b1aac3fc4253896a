// Data Models
pub mod file_entry;
pub mod operation;
pub mod panel_state;
pub mod selection;

pub use file_entry::FileEntry;
pub use operation::{
    BatchReport, BatchSummary, ConflictDecision, OperationItem, OperationKind, OperationProgress,
    OperationResult,
};
pub use panel_state::{EnterOutcome, PanelState};
pub use selection::Selection;
