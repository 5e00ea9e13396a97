use std::sync::Arc;

/// Where a batch of selected files is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// An existing portfolio, all files in one multipart request.
    Portfolio,
    /// The user's flat documents collection, one request per file.
    Documents,
}

/// A file the user has selected but not yet uploaded. The bytes are read at
/// selection time so a later upload cannot hit the filesystem mid-batch.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub message: String,
}

/// Workflow progress. Overwritten on every step, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub percent: u8,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Success {
        message: String,
    },
    /// Some files landed, some did not. The session still clears; the
    /// failures are surfaced individually.
    PartialFailure {
        success_count: usize,
        failures: Vec<FileFailure>,
    },
    /// Nothing was uploaded. Selected files are kept so the user can retry.
    Failure {
        message: String,
        failures: Vec<FileFailure>,
    },
}

/// Messages a running upload sends back to the UI thread.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress(ProgressReport),
    Finished(UploadOutcome),
}

#[cfg(test)]
impl PendingFile {
    pub fn stub(name: &str) -> Self {
        Self {
            name: name.to_string(),
            byte_size: 4,
            mime_type: "application/pdf".to_string(),
            bytes: Arc::from(vec![0u8; 4].into_boxed_slice()),
        }
    }
}
