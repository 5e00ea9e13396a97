mod orchestrator;
mod types;
mod validate;

pub use orchestrator::{run_documents_upload, run_portfolio_upload};
pub use types::{Destination, FileFailure, PendingFile, ProgressReport, UploadEvent, UploadOutcome};
pub use validate::{validate, ValidationError, ALLOWED_EXTENSIONS, MAX_FILE_BYTES};
