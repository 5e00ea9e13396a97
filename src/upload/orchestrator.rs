//! The two upload strategies. Both are generic over the actual send
//! operation so the control flow (progress, failure isolation, outcome
//! classification) can be exercised without a server.
//!
//! Uploads are strictly sequential: the next file is not sent until the
//! previous response has resolved, which keeps progress reporting and
//! per-file error attribution deterministic. There is no cancellation for an
//! in-flight batch.

use std::future::Future;

use crate::api::ApiError;

use super::types::{FileFailure, PendingFile, ProgressReport, UploadOutcome};

fn progress(report: &impl Fn(ProgressReport), percent: u8, message: impl Into<String>) {
    report(ProgressReport {
        percent,
        message: message.into(),
    });
}

/// Portfolio-destination strategy: the whole batch goes out in one multipart
/// request. The checkpoints are workflow milestones, not measured transfer
/// progress.
///
/// An empty portfolio selection fails before `send_batch` is ever called.
pub async fn run_portfolio_upload<F, Fut>(
    target_portfolio_id: Option<i64>,
    send_batch: F,
    report: impl Fn(ProgressReport),
) -> UploadOutcome
where
    F: FnOnce(i64) -> Fut,
    Fut: Future<Output = Result<String, ApiError>>,
{
    let Some(portfolio_id) = target_portfolio_id else {
        return UploadOutcome::Failure {
            message: "Please select a portfolio".to_string(),
            failures: Vec::new(),
        };
    };

    progress(&report, 10, "Preparing upload...");
    progress(&report, 30, "Uploading files to server...");

    match send_batch(portfolio_id).await {
        Ok(message) => {
            progress(&report, 70, "Processing files...");
            progress(&report, 100, "Upload complete!");
            UploadOutcome::Success { message }
        }
        Err(err) => {
            progress(&report, 0, "Upload failed");
            UploadOutcome::Failure {
                message: err.to_string(),
                failures: Vec::new(),
            }
        }
    }
}

/// Documents-destination strategy: one request per file, in selection order.
///
/// A failed file never aborts the loop; its error is recorded and the next
/// file is attempted. Percent is `floor(index / total * 100)` before each
/// request, with 100 set explicitly after the loop.
pub async fn run_documents_upload<F, Fut>(
    files: &[PendingFile],
    mut send_file: F,
    report: impl Fn(ProgressReport),
) -> UploadOutcome
where
    F: FnMut(PendingFile) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let total = files.len();
    if total == 0 {
        return UploadOutcome::Failure {
            message: "Please select files to upload".to_string(),
            failures: Vec::new(),
        };
    }

    let mut failures = Vec::new();
    for (index, file) in files.iter().enumerate() {
        progress(
            &report,
            (index * 100 / total) as u8,
            format!("Uploading {} of {}: {}", index + 1, total, file.name),
        );

        if let Err(err) = send_file(file.clone()).await {
            failures.push(FileFailure {
                file_name: file.name.clone(),
                message: err.to_string(),
            });
        }
    }

    progress(&report, 100, "Upload complete!");

    let success_count = total - failures.len();
    if failures.is_empty() {
        UploadOutcome::Success {
            message: format!("Successfully uploaded {success_count} file(s) to documents"),
        }
    } else if success_count > 0 {
        UploadOutcome::PartialFailure {
            success_count,
            failures,
        }
    } else {
        UploadOutcome::Failure {
            message: format!("{} file(s) failed to upload", failures.len()),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    fn collect_progress(percents: &RefCell<Vec<u8>>) -> impl Fn(ProgressReport) + '_ {
        |report| percents.borrow_mut().push(report.percent)
    }

    #[tokio::test]
    async fn documents_upload_isolates_per_file_failures() {
        let files = vec![
            PendingFile::stub("a.pdf"),
            PendingFile::stub("b.pdf"),
            PendingFile::stub("c.pdf"),
        ];
        let attempted = RefCell::new(Vec::new());
        let percents = RefCell::new(Vec::new());

        let outcome = run_documents_upload(
            &files,
            |file| {
                attempted.borrow_mut().push(file.name.clone());
                let fail = file.name == "b.pdf";
                async move {
                    if fail {
                        Err(ApiError::Application("Storage quota exceeded".to_string()))
                    } else {
                        Ok(())
                    }
                }
            },
            collect_progress(&percents),
        )
        .await;

        // Files one and three were still attempted, in order.
        assert_eq!(*attempted.borrow(), vec!["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(*percents.borrow(), vec![0, 33, 66, 100]);
        match outcome {
            UploadOutcome::PartialFailure {
                success_count,
                failures,
            } => {
                assert_eq!(success_count, 2);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].file_name, "b.pdf");
                assert_eq!(failures[0].message, "Storage quota exceeded");
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn documents_upload_with_no_successes_is_a_failure() {
        let files = vec![PendingFile::stub("a.pdf"), PendingFile::stub("b.pdf")];
        let outcome = run_documents_upload(
            &files,
            |_file| async { Err(ApiError::Application("rejected".to_string())) },
            |_report| {},
        )
        .await;

        match outcome {
            UploadOutcome::Failure { message, failures } => {
                assert_eq!(message, "2 file(s) failed to upload");
                assert_eq!(failures.len(), 2);
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn documents_upload_success_reports_full_progress() {
        let files = vec![PendingFile::stub("a.pdf"), PendingFile::stub("b.pdf")];
        let percents = RefCell::new(Vec::new());
        let outcome =
            run_documents_upload(&files, |_file| async { Ok(()) }, collect_progress(&percents))
                .await;

        assert_eq!(*percents.borrow(), vec![0, 50, 100]);
        assert!(matches!(outcome, UploadOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn portfolio_upload_without_selection_never_sends() {
        let sent = Cell::new(false);
        let percents = RefCell::new(Vec::new());
        let outcome = run_portfolio_upload(
            None,
            |_portfolio_id| {
                sent.set(true);
                async { Ok(String::new()) }
            },
            collect_progress(&percents),
        )
        .await;

        assert!(!sent.get());
        assert!(percents.borrow().is_empty());
        match outcome {
            UploadOutcome::Failure { message, failures } => {
                assert_eq!(message, "Please select a portfolio");
                assert!(failures.is_empty());
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn portfolio_upload_walks_the_milestones() {
        let percents = RefCell::new(Vec::new());
        let outcome = run_portfolio_upload(
            Some(42),
            |portfolio_id| async move {
                assert_eq!(portfolio_id, 42);
                Ok("3 files uploaded".to_string())
            },
            collect_progress(&percents),
        )
        .await;

        assert_eq!(*percents.borrow(), vec![10, 30, 70, 100]);
        match outcome {
            UploadOutcome::Success { message } => assert_eq!(message, "3 files uploaded"),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn portfolio_upload_surfaces_the_server_message() {
        let percents = RefCell::new(Vec::new());
        let outcome = run_portfolio_upload(
            Some(42),
            |_portfolio_id| async {
                Err(ApiError::Application("Portfolio is read-only".to_string()))
            },
            collect_progress(&percents),
        )
        .await;

        assert_eq!(*percents.borrow(), vec![10, 30, 0]);
        match outcome {
            UploadOutcome::Failure { message, .. } => assert_eq!(message, "Portfolio is read-only"),
            other => panic!("expected Failure, got {other:?}"),
        }
    }
}
