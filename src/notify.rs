//! Toast notifications and modal lifecycle.
//!
//! At most one toast is visible at a time: showing a new one displaces
//! whatever is on screen. Toasts auto-dismiss after their duration and can be
//! dismissed manually.

use std::time::{Duration, Instant};

use eframe::egui::Color32;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn background(self) -> Color32 {
        match self {
            ToastKind::Success => Color32::from_rgb(212, 237, 218),
            ToastKind::Error => Color32::from_rgb(248, 215, 218),
            ToastKind::Warning => Color32::from_rgb(255, 243, 205),
            ToastKind::Info => Color32::from_rgb(209, 236, 241),
        }
    }

    pub fn foreground(self) -> Color32 {
        match self {
            ToastKind::Success => Color32::from_rgb(21, 87, 36),
            ToastKind::Error => Color32::from_rgb(114, 28, 36),
            ToastKind::Warning => Color32::from_rgb(133, 100, 4),
            ToastKind::Info => Color32::from_rgb(12, 84, 96),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Warning => "⚠",
            ToastKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
    duration: Duration,
}

#[derive(Default)]
pub struct Toasts {
    current: Option<Toast>,
}

impl Toasts {
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.show_for(message, kind, DEFAULT_TOAST_DURATION);
    }

    pub fn show_for(&mut self, message: impl Into<String>, kind: ToastKind, duration: Duration) {
        // Replacing `current` is what dismisses the previous toast.
        self.current = Some(Toast {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            duration,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Warning);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drops the toast once its duration has elapsed. Called every frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some(toast) = &self.current {
            if now.duration_since(toast.shown_at) >= toast.duration {
                self.current = None;
            }
        }
    }

    pub fn visible(&self) -> Option<&Toast> {
        self.current.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalId {
    Upload,
    CreatePortfolio,
    ItemDetails,
    ConfirmDelete,
}

/// Open modals, most recently opened last. The app layer reacts to closes
/// (e.g. closing the upload modal clears the upload session).
#[derive(Default)]
pub struct Modals {
    open: Vec<ModalId>,
}

impl Modals {
    pub fn open(&mut self, id: ModalId) {
        if !self.open.contains(&id) {
            self.open.push(id);
        }
    }

    /// Returns true if the modal was actually open.
    pub fn close(&mut self, id: ModalId) -> bool {
        let was_open = self.open.contains(&id);
        self.open.retain(|open| *open != id);
        was_open
    }

    /// Closes everything (the Escape path) and reports what was closed.
    pub fn close_all(&mut self) -> Vec<ModalId> {
        std::mem::take(&mut self.open)
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.open.contains(&id)
    }

    pub fn any_open(&self) -> bool {
        !self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_toast_displaces_the_visible_one() {
        let mut toasts = Toasts::default();
        toasts.success("saved");
        toasts.error("broke");

        let visible = toasts.visible().expect("a toast should be visible");
        assert_eq!(visible.message, "broke");
        assert_eq!(visible.kind, ToastKind::Error);
    }

    #[test]
    fn toast_expires_after_its_duration() {
        let mut toasts = Toasts::default();
        toasts.show_for("brief", ToastKind::Info, Duration::from_millis(100));
        let shown_at = toasts.visible().unwrap().shown_at;

        toasts.tick(shown_at + Duration::from_millis(99));
        assert!(toasts.visible().is_some());

        toasts.tick(shown_at + Duration::from_millis(100));
        assert!(toasts.visible().is_none());
    }

    #[test]
    fn manual_dismiss_clears_the_toast() {
        let mut toasts = Toasts::default();
        toasts.success("saved");
        toasts.dismiss();
        assert!(toasts.visible().is_none());
    }

    #[test]
    fn close_all_drains_every_open_modal() {
        let mut modals = Modals::default();
        modals.open(ModalId::Upload);
        modals.open(ModalId::ItemDetails);
        modals.open(ModalId::Upload); // no duplicates

        let closed = modals.close_all();
        assert_eq!(closed, vec![ModalId::Upload, ModalId::ItemDetails]);
        assert!(!modals.any_open());
    }

    #[test]
    fn close_reports_whether_the_modal_was_open() {
        let mut modals = Modals::default();
        modals.open(ModalId::CreatePortfolio);
        assert!(modals.close(ModalId::CreatePortfolio));
        assert!(!modals.close(ModalId::CreatePortfolio));
    }
}
