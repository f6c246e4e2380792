mod record;
mod reimbursed;

pub use record::{outstanding, total, Field, Record, RecordDraft, RecordError};
pub use reimbursed::Reimbursed;
