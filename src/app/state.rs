//! Session-scoped state: page context, the upload session and its phase
//! machine, and the re-entrancy guards.
//!
//! Everything here runs on the UI thread, so no locking is involved; the
//! guards exist because a user can trigger a handler again (rapid clicks)
//! before the previous invocation's async work has finished.

use std::time::{Duration, Instant};

use crate::config::Role;
use crate::upload::{Destination, PendingFile};

/// Process-wide page context, created once at startup. Initialization is
/// guarded so it runs at most once per session.
#[derive(Debug)]
pub struct SessionState {
    current_portfolio_id: Option<i64>,
    current_folder_id: Option<i64>,
    user_role: Role,
    is_initialized: bool,
    is_initializing: bool,
}

impl SessionState {
    pub fn new(
        user_role: Role,
        current_portfolio_id: Option<i64>,
        current_folder_id: Option<i64>,
    ) -> Self {
        Self {
            current_portfolio_id,
            current_folder_id,
            user_role,
            is_initialized: false,
            is_initializing: false,
        }
    }

    pub fn user_role(&self) -> Role {
        self.user_role
    }

    pub fn current_portfolio_id(&self) -> Option<i64> {
        self.current_portfolio_id
    }

    pub fn current_folder_id(&self) -> Option<i64> {
        self.current_folder_id
    }

    /// True when the client was launched into a specific portfolio rather
    /// than the main page.
    pub fn in_details_context(&self) -> bool {
        self.current_portfolio_id.is_some()
    }

    /// Claims the right to run initialization. Any call while a previous one
    /// is pending or done is a no-op.
    pub fn begin_initialization(&mut self) -> bool {
        if self.is_initialized || self.is_initializing {
            return false;
        }
        self.is_initializing = true;
        true
    }

    pub fn finish_initialization(&mut self) {
        self.is_initialized = true;
        self.is_initializing = false;
    }

    /// Releases the guard without marking success so a later attempt can run.
    pub fn fail_initialization(&mut self) {
        self.is_initializing = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FilesSelected,
    Uploading,
}

/// The client upload state machine. Owned by the app; created when the
/// upload modal opens and cleared on close or completion.
///
/// Transitions: `Idle → FilesSelected → Uploading`, then back to `Idle` on
/// success or partial failure (session clears) or to `FilesSelected` on
/// failure (files kept for retry).
#[derive(Debug)]
pub struct UploadSession {
    destination: Destination,
    target_portfolio_id: Option<i64>,
    target_folder_id: Option<i64>,
    files: Vec<PendingFile>,
    phase: UploadPhase,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self {
            destination: Destination::Portfolio,
            target_portfolio_id: None,
            target_folder_id: None,
            files: Vec::new(),
            phase: UploadPhase::Idle,
        }
    }
}

impl UploadSession {
    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Destination) {
        self.destination = destination;
    }

    pub fn target_portfolio_id(&self) -> Option<i64> {
        self.target_portfolio_id
    }

    pub fn set_target_portfolio(&mut self, portfolio_id: Option<i64>) {
        self.target_portfolio_id = portfolio_id;
    }

    pub fn target_folder_id(&self) -> Option<i64> {
        self.target_folder_id
    }

    pub fn set_target_folder(&mut self, folder_id: Option<i64>) {
        self.target_folder_id = folder_id;
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn in_progress(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    /// Name is the identity key: selecting a file whose name is already in
    /// the session replaces the earlier entry in place.
    pub fn add_file(&mut self, file: PendingFile) {
        if self.phase == UploadPhase::Uploading {
            return;
        }
        if let Some(existing) = self.files.iter_mut().find(|f| f.name == file.name) {
            *existing = file;
        } else {
            self.files.push(file);
        }
        self.phase = UploadPhase::FilesSelected;
    }

    pub fn remove_file(&mut self, name: &str) {
        if self.phase == UploadPhase::Uploading {
            return;
        }
        self.files.retain(|f| f.name != name);
        if self.files.is_empty() {
            self.phase = UploadPhase::Idle;
        }
    }

    /// Moves to `Uploading`; false if there is nothing to upload or a batch
    /// is already running.
    pub fn begin(&mut self) -> bool {
        if self.phase != UploadPhase::FilesSelected {
            return false;
        }
        self.phase = UploadPhase::Uploading;
        true
    }

    pub fn finish_success(&mut self) {
        if self.phase == UploadPhase::Uploading {
            self.clear();
        }
    }

    pub fn finish_failure(&mut self) {
        if self.phase == UploadPhase::Uploading {
            self.phase = UploadPhase::FilesSelected;
        }
    }

    /// Files are cleared iff the session is cleared; the destination toggle
    /// and the target selection survive so the modal reopens where the user
    /// left it.
    pub fn clear(&mut self) {
        self.files.clear();
        self.phase = UploadPhase::Idle;
    }
}

pub const CREATE_COOLDOWN: Duration = Duration::from_secs(2);

/// Single in-flight guard for portfolio creation, with a fixed cooldown
/// after completion to absorb rapid double-submission.
#[derive(Debug, Default)]
pub struct CreateGuard {
    in_flight: bool,
    cooldown_until: Option<Instant>,
}

impl CreateGuard {
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn try_begin(&mut self, now: Instant) -> bool {
        if self.in_flight {
            return false;
        }
        if let Some(until) = self.cooldown_until {
            if now < until {
                return false;
            }
        }
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self, now: Instant) {
        self.in_flight = false;
        self.cooldown_until = Some(now + CREATE_COOLDOWN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialization_runs_at_most_once() {
        let mut session = SessionState::new(Role::Faculty, None, None);

        assert!(session.begin_initialization());
        // Second call lands before the first resolves.
        assert!(!session.begin_initialization());

        session.finish_initialization();
        assert!(session.is_initialized());
        assert!(!session.begin_initialization());
    }

    #[test]
    fn failed_initialization_releases_the_guard() {
        let mut session = SessionState::new(Role::Faculty, None, None);
        assert!(session.begin_initialization());
        session.fail_initialization();
        assert!(session.begin_initialization());
    }

    #[test]
    fn duplicate_file_name_overwrites_in_place() {
        let mut upload = UploadSession::default();
        upload.add_file(PendingFile::stub("a.pdf"));
        upload.add_file(PendingFile::stub("b.pdf"));

        let mut replacement = PendingFile::stub("a.pdf");
        replacement.byte_size = 99;
        upload.add_file(replacement);

        assert_eq!(upload.file_count(), 2);
        assert_eq!(upload.files()[0].name, "a.pdf");
        assert_eq!(upload.files()[0].byte_size, 99);
    }

    #[test]
    fn phase_follows_selection_and_removal() {
        let mut upload = UploadSession::default();
        assert_eq!(upload.phase(), UploadPhase::Idle);

        upload.add_file(PendingFile::stub("a.pdf"));
        assert_eq!(upload.phase(), UploadPhase::FilesSelected);

        upload.remove_file("a.pdf");
        assert_eq!(upload.phase(), UploadPhase::Idle);
    }

    #[test]
    fn begin_requires_selected_files_and_blocks_reentry() {
        let mut upload = UploadSession::default();
        assert!(!upload.begin());

        upload.add_file(PendingFile::stub("a.pdf"));
        assert!(upload.begin());
        assert!(!upload.begin());
    }

    #[test]
    fn failure_keeps_files_for_retry_and_success_clears() {
        let mut upload = UploadSession::default();
        upload.add_file(PendingFile::stub("a.pdf"));
        assert!(upload.begin());
        upload.finish_failure();
        assert_eq!(upload.phase(), UploadPhase::FilesSelected);
        assert_eq!(upload.file_count(), 1);

        assert!(upload.begin());
        upload.finish_success();
        assert_eq!(upload.phase(), UploadPhase::Idle);
        assert_eq!(upload.file_count(), 0);
    }

    #[test]
    fn target_selection_survives_a_cleared_session() {
        let mut upload = UploadSession::default();
        upload.set_target_portfolio(Some(7));
        upload.set_target_folder(Some(3));
        upload.add_file(PendingFile::stub("a.pdf"));
        assert!(upload.begin());
        upload.finish_success();

        assert_eq!(upload.file_count(), 0);
        assert_eq!(upload.target_portfolio_id(), Some(7));
        assert_eq!(upload.target_folder_id(), Some(3));
    }

    #[test]
    fn selection_is_frozen_while_uploading() {
        let mut upload = UploadSession::default();
        upload.add_file(PendingFile::stub("a.pdf"));
        assert!(upload.begin());

        upload.add_file(PendingFile::stub("b.pdf"));
        upload.remove_file("a.pdf");
        assert_eq!(upload.file_count(), 1);
        assert_eq!(upload.files()[0].name, "a.pdf");
    }

    #[test]
    fn create_guard_blocks_while_in_flight_and_during_cooldown() {
        let mut guard = CreateGuard::default();
        let start = Instant::now();

        assert!(guard.try_begin(start));
        assert!(!guard.try_begin(start));

        guard.finish(start);
        assert!(!guard.try_begin(start + Duration::from_millis(500)));
        assert!(guard.try_begin(start + CREATE_COOLDOWN));
    }

    #[test]
    fn create_guard_reports_in_flight_for_the_ui() {
        let mut guard = CreateGuard::default();
        assert!(!guard.is_in_flight());

        let start = Instant::now();
        assert!(guard.try_begin(start));
        assert!(guard.is_in_flight());

        guard.finish(start);
        assert!(!guard.is_in_flight());
    }
}
