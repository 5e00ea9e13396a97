mod filter;
mod state;
mod ui;

pub use state::{CreateGuard, SessionState, UploadPhase, UploadSession};

use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::{egui, App};
use tracing::{info, warn};

use crate::api::types::{Category, DocumentItem, ItemDetails, Portfolio};
use crate::api::{ApiClient, ApiError};
use crate::config::ServerConfig;
use crate::notify::{ModalId, Modals, Toasts};
use crate::upload::{
    self, Destination, PendingFile, ProgressReport, UploadEvent, UploadOutcome,
};
use filter::{CategoryFilter, DocumentRow};

/// Results coming back from worker threads, drained once per frame.
pub enum AppEvent {
    Upload(UploadEvent),
    MyPortfoliosLoaded(Result<Vec<Portfolio>, ApiError>),
    DepartmentPortfoliosLoaded(Result<Vec<Portfolio>, ApiError>),
    CollegePortfoliosLoaded(Result<Vec<Portfolio>, ApiError>),
    DocumentsLoaded(Result<Vec<DocumentItem>, ApiError>),
    PortfolioCreated(Result<String, ApiError>),
    PortfolioDeleted {
        portfolio_id: i64,
        result: Result<String, ApiError>,
    },
    DocumentDeleted(Result<String, ApiError>),
    ItemDeleted(Result<String, ApiError>),
    ItemDetailsLoaded {
        item_id: i64,
        result: Result<ItemDetails, ApiError>,
    },
}

pub enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::NotLoaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    MyPortfolios,
    Documents,
    DepartmentPortfolios,
    CollegePortfolios,
}

pub enum DeleteTarget {
    Portfolio { id: i64, name: String },
    Document { id: i64 },
    Item { id: i64 },
}

impl DeleteTarget {
    fn prompt(&self) -> String {
        match self {
            DeleteTarget::Portfolio { name, .. } => format!(
                "Are you sure you want to delete \"{name}\"?\n\nThis action cannot be undone. \
                 All files and folders will be permanently deleted."
            ),
            DeleteTarget::Document { .. } => {
                "Are you sure you want to delete this document?".to_string()
            }
            DeleteTarget::Item { .. } => "Are you sure you want to delete this item?".to_string(),
        }
    }
}

#[derive(Default)]
pub struct CreateForm {
    pub name: String,
    pub description: String,
    pub portfolio_type: String,
}

impl CreateForm {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct PortfolioApp {
    api: ApiClient,
    session: SessionState,
    upload: UploadSession,
    create_guard: CreateGuard,
    toasts: Toasts,
    modals: Modals,

    active_tab: Tab,
    my_portfolios: LoadState<Vec<Portfolio>>,
    department_portfolios: LoadState<Vec<Portfolio>>,
    college_portfolios: LoadState<Vec<Portfolio>>,
    documents: LoadState<Vec<DocumentRow>>,

    search_query: String,
    category_filter: CategoryFilter,
    upload_category: Category,
    create_form: CreateForm,
    progress: Option<ProgressReport>,
    item_details: Option<(i64, ItemDetails)>,
    pending_delete: Option<DeleteTarget>,

    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
}

impl PortfolioApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &ServerConfig) -> Self {
        let (events_tx, events_rx) = channel();
        let mut app = Self {
            api: ApiClient::new(config),
            session: SessionState::new(config.user_role, config.portfolio_id, config.folder_id),
            upload: UploadSession::default(),
            create_guard: CreateGuard::default(),
            toasts: Toasts::default(),
            modals: Modals::default(),
            active_tab: Tab::MyPortfolios,
            my_portfolios: LoadState::default(),
            department_portfolios: LoadState::default(),
            college_portfolios: LoadState::default(),
            documents: LoadState::default(),
            search_query: String::new(),
            category_filter: CategoryFilter::default(),
            upload_category: Category::default(),
            create_form: CreateForm::default(),
            progress: None,
            item_details: None,
            pending_delete: None,
            events_tx,
            events_rx,
        };
        app.initialize();
        app
    }

    /// One-shot setup. A second call while the first is pending (or after it
    /// finished) does nothing.
    pub fn initialize(&mut self) {
        if !self.session.begin_initialization() {
            info!("portfolio client already initialized or initializing");
            return;
        }
        info!(
            details_context = self.session.in_details_context(),
            "initializing portfolio client"
        );

        self.load_my_portfolios();
        if self.active_tab == Tab::Documents {
            self.load_documents();
        }
        self.session.finish_initialization();
    }

    /// Runs one API call on a worker thread and feeds the result back
    /// through the event channel.
    fn spawn_task<F, Fut>(&self, task: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = AppEvent>,
    {
        let api = self.api.clone();
        let sender = self.events_tx.clone();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
            let event = rt.block_on(task(api));
            let _ = sender.send(event);
        });
    }

    pub fn load_my_portfolios(&mut self) {
        self.my_portfolios = LoadState::Loading;
        self.spawn_task(|api| async move { AppEvent::MyPortfoliosLoaded(api.my_portfolios().await) });
    }

    pub fn load_department_portfolios(&mut self) {
        self.department_portfolios = LoadState::Loading;
        self.spawn_task(|api| async move {
            AppEvent::DepartmentPortfoliosLoaded(api.department_portfolios().await)
        });
    }

    pub fn load_college_portfolios(&mut self) {
        self.college_portfolios = LoadState::Loading;
        self.spawn_task(|api| async move {
            AppEvent::CollegePortfoliosLoaded(api.college_portfolios().await)
        });
    }

    pub fn load_documents(&mut self) {
        self.documents = LoadState::Loading;
        self.spawn_task(|api| async move { AppEvent::DocumentsLoaded(api.user_documents().await) });
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        match tab {
            Tab::MyPortfolios => self.load_my_portfolios(),
            Tab::Documents => self.load_documents(),
            Tab::DepartmentPortfolios => self.load_department_portfolios(),
            Tab::CollegePortfolios => self.load_college_portfolios(),
        }
    }

    fn available_tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![Tab::MyPortfolios, Tab::Documents];
        let role = self.session.user_role();
        if role.sees_department_portfolios() {
            tabs.push(Tab::DepartmentPortfolios);
        }
        if role.sees_college_portfolios() {
            tabs.push(Tab::CollegePortfolios);
        }
        tabs
    }

    // ---- modals ----------------------------------------------------------

    pub fn open_upload_modal(&mut self) {
        self.modals.open(ModalId::Upload);
        if self.session.in_details_context() {
            // Uploads from a details context default into that portfolio.
            self.upload.set_destination(Destination::Portfolio);
            self.upload
                .set_target_portfolio(self.session.current_portfolio_id());
            self.upload.set_target_folder(self.session.current_folder_id());
        }
        if matches!(self.my_portfolios, LoadState::NotLoaded | LoadState::Failed(_)) {
            self.load_my_portfolios();
        }
    }

    pub fn open_create_modal(&mut self) {
        self.modals.open(ModalId::CreatePortfolio);
    }

    pub fn close_modal(&mut self, id: ModalId) {
        if self.modals.close(id) {
            self.on_modal_closed(id);
        }
    }

    pub fn close_all_modals(&mut self) {
        for id in self.modals.close_all() {
            self.on_modal_closed(id);
        }
    }

    fn on_modal_closed(&mut self, id: ModalId) {
        match id {
            // Closing the upload modal is the one place the session clears
            // outside of a completed upload.
            ModalId::Upload => {
                self.upload.clear();
                self.progress = None;
            }
            ModalId::ItemDetails => self.item_details = None,
            ModalId::ConfirmDelete => self.pending_delete = None,
            ModalId::CreatePortfolio => {}
        }
    }

    // ---- file selection --------------------------------------------------

    pub fn select_files(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Documents", &upload::ALLOWED_EXTENSIONS)
            .pick_files();
        for path in picked.unwrap_or_default() {
            self.add_pending_file(path);
        }
    }

    fn add_pending_file(&mut self, path: PathBuf) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            self.toasts.error(format!("Invalid file path: {}", path.display()));
            return;
        };

        let byte_size = match std::fs::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                self.toasts.error(format!("Failed to read \"{name}\": {err}"));
                return;
            }
        };
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        // Validation failures never reach the network.
        if let Err(err) = upload::validate(&name, byte_size, &mime_type) {
            self.toasts.error(err.to_string());
            return;
        }

        let bytes: Arc<[u8]> = match std::fs::read(&path) {
            Ok(bytes) => Arc::from(bytes.into_boxed_slice()),
            Err(err) => {
                self.toasts.error(format!("Failed to read \"{name}\": {err}"));
                return;
            }
        };

        self.upload.add_file(PendingFile {
            name,
            byte_size,
            mime_type,
            bytes,
        });
    }

    // ---- upload ----------------------------------------------------------

    pub fn start_upload(&mut self) {
        if self.upload.file_count() == 0 {
            self.toasts.error("Please select files to upload");
            return;
        }
        if !self.upload.begin() {
            warn!("upload already in progress");
            return;
        }

        let files = self.upload.files().to_vec();
        let sender = self.events_tx.clone();
        let api = self.api.clone();

        match self.upload.destination() {
            Destination::Portfolio => {
                let target = self.upload.target_portfolio_id();
                let folder_id = self.upload.target_folder_id();
                info!(?target, file_count = files.len(), "uploading batch to portfolio");

                std::thread::spawn(move || {
                    let rt =
                        tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
                    rt.block_on(async {
                        let progress = |report: ProgressReport| {
                            let _ = sender.send(AppEvent::Upload(UploadEvent::Progress(report)));
                        };
                        let outcome = upload::run_portfolio_upload(
                            target,
                            move |portfolio_id| async move {
                                api.upload_to_portfolio(&files, portfolio_id, folder_id).await
                            },
                            progress,
                        )
                        .await;
                        let _ = sender.send(AppEvent::Upload(UploadEvent::Finished(outcome)));
                    });
                });
            }
            Destination::Documents => {
                let category = self.upload_category;
                info!(
                    category = category.as_str(),
                    file_count = files.len(),
                    "uploading files to documents"
                );

                std::thread::spawn(move || {
                    let rt =
                        tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
                    rt.block_on(async {
                        let progress = |report: ProgressReport| {
                            let _ = sender.send(AppEvent::Upload(UploadEvent::Progress(report)));
                        };
                        let send_file = |file: PendingFile| {
                            let api = api.clone();
                            async move { api.upload_to_documents(&file, category).await }
                        };
                        let outcome =
                            upload::run_documents_upload(&files, send_file, progress).await;
                        let _ = sender.send(AppEvent::Upload(UploadEvent::Finished(outcome)));
                    });
                });
            }
        }
    }

    fn finish_upload(&mut self, outcome: UploadOutcome) {
        self.progress = None;
        match outcome {
            UploadOutcome::Success { message } => {
                self.toasts.success(message);
                self.upload.finish_success();
                self.close_modal(ModalId::Upload);
                self.refresh_after_upload();
            }
            UploadOutcome::PartialFailure {
                success_count,
                failures,
            } => {
                self.toasts
                    .success(format!("Successfully uploaded {success_count} file(s) to documents"));
                for failure in &failures {
                    self.toasts
                        .error(format!("{}: {}", failure.file_name, failure.message));
                }
                self.toasts
                    .warning(format!("{} file(s) failed to upload", failures.len()));
                self.upload.finish_success();
                self.close_modal(ModalId::Upload);
                self.refresh_after_upload();
            }
            UploadOutcome::Failure { message, failures } => {
                if failures.is_empty() {
                    self.toasts.error(message);
                } else {
                    for failure in &failures {
                        self.toasts
                            .error(format!("{}: {}", failure.file_name, failure.message));
                    }
                    self.toasts.warning(message);
                }
                // Files stay selected so the user can retry without
                // re-picking them.
                self.upload.finish_failure();
            }
        }
    }

    fn refresh_after_upload(&mut self) {
        if self.session.in_details_context() {
            // The web client reloads the whole page here; the closest analog
            // is refetching every list we hold.
            self.load_my_portfolios();
            if self.active_tab == Tab::Documents {
                self.load_documents();
            }
        } else {
            // In-place reload of whichever view is active.
            self.switch_tab(self.active_tab);
        }
    }

    // ---- portfolio CRUD --------------------------------------------------

    pub fn create_portfolio(&mut self) {
        let name = self.create_form.name.trim().to_string();
        let description = self.create_form.description.trim().to_string();
        let portfolio_type = self.create_form.portfolio_type.clone();

        if name.is_empty() {
            self.toasts.error("Please enter portfolio name");
            return;
        }
        if portfolio_type.is_empty() {
            self.toasts.error("Please select portfolio type");
            return;
        }
        if !self.create_guard.try_begin(Instant::now()) {
            warn!("portfolio creation already in progress");
            return;
        }

        self.spawn_task(move |api| async move {
            AppEvent::PortfolioCreated(
                api.create_portfolio(&name, &description, &portfolio_type).await,
            )
        });
    }

    pub fn request_delete(&mut self, target: DeleteTarget) {
        self.pending_delete = Some(target);
        self.modals.open(ModalId::ConfirmDelete);
    }

    pub fn confirm_delete(&mut self) {
        self.modals.close(ModalId::ConfirmDelete);
        let Some(target) = self.pending_delete.take() else {
            return;
        };
        match target {
            DeleteTarget::Portfolio { id, .. } => self.spawn_task(move |api| async move {
                AppEvent::PortfolioDeleted {
                    portfolio_id: id,
                    result: api.delete_portfolio(id).await,
                }
            }),
            DeleteTarget::Document { id } => self.spawn_task(move |api| async move {
                AppEvent::DocumentDeleted(api.delete_document(id).await)
            }),
            DeleteTarget::Item { id } => self.spawn_task(move |api| async move {
                AppEvent::ItemDeleted(api.delete_item(id).await)
            }),
        }
    }

    // ---- documents -------------------------------------------------------

    pub fn download_document(&mut self, item_id: i64) {
        let url = self.api.download_url(item_id);
        if let Err(err) = open::that(&url) {
            warn!(%url, "failed to open download in browser: {err}");
            self.toasts.error("Failed to open download");
        }
    }

    pub fn view_document_details(&mut self, item_id: i64) {
        self.spawn_task(move |api| async move {
            AppEvent::ItemDetailsLoaded {
                item_id,
                result: api.item_details(item_id).await,
            }
        });
    }

    // ---- event handling --------------------------------------------------

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Upload(UploadEvent::Progress(report)) => self.progress = Some(report),
            AppEvent::Upload(UploadEvent::Finished(outcome)) => self.finish_upload(outcome),
            AppEvent::MyPortfoliosLoaded(result) => {
                self.my_portfolios = into_load_state(result);
            }
            AppEvent::DepartmentPortfoliosLoaded(result) => {
                self.department_portfolios = into_load_state(result);
            }
            AppEvent::CollegePortfoliosLoaded(result) => {
                self.college_portfolios = into_load_state(result);
            }
            AppEvent::DocumentsLoaded(result) => {
                self.documents =
                    into_load_state(result.map(|docs| docs.into_iter().map(DocumentRow::new).collect()));
            }
            AppEvent::PortfolioCreated(result) => {
                self.create_guard.finish(Instant::now());
                match result {
                    Ok(message) => {
                        self.toasts.success(message);
                        self.create_form.clear();
                        self.close_modal(ModalId::CreatePortfolio);
                        self.load_my_portfolios();
                    }
                    Err(err) => self.toasts.error(err.to_string()),
                }
            }
            AppEvent::PortfolioDeleted { portfolio_id, result } => match result {
                Ok(message) => {
                    self.toasts.success(message);
                    // Remove the card in place from every loaded list; no
                    // refetch needed.
                    prune_portfolio(&mut self.my_portfolios, portfolio_id);
                    prune_portfolio(&mut self.department_portfolios, portfolio_id);
                    prune_portfolio(&mut self.college_portfolios, portfolio_id);
                }
                Err(err) => self.toasts.error(err.to_string()),
            },
            AppEvent::DocumentDeleted(result) => match result {
                Ok(message) => {
                    self.toasts.success(message);
                    self.close_modal(ModalId::ItemDetails);
                    self.load_documents();
                }
                Err(err) => self.toasts.error(err.to_string()),
            },
            AppEvent::ItemDeleted(result) => match result {
                Ok(message) => {
                    self.toasts.success(message);
                    self.close_modal(ModalId::ItemDetails);
                    self.load_my_portfolios();
                }
                Err(err) => self.toasts.error(err.to_string()),
            },
            AppEvent::ItemDetailsLoaded { item_id, result } => match result {
                Ok(details) => {
                    self.item_details = Some((item_id, details));
                    self.modals.open(ModalId::ItemDetails);
                }
                Err(err) => self.toasts.error(err.to_string()),
            },
        }
    }

    fn update_state(&mut self, ctx: &egui::Context) {
        self.toasts.tick(Instant::now());

        let mut had_events = false;
        while let Ok(event) = self.events_rx.try_recv() {
            had_events = true;
            self.handle_event(event);
        }
        if had_events {
            ctx.request_repaint();
        }

        // Keep frames coming while timers or workers are pending.
        if self.upload.in_progress() || self.toasts.visible().is_some() || self.any_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn any_loading(&self) -> bool {
        matches!(self.my_portfolios, LoadState::Loading)
            || matches!(self.department_portfolios, LoadState::Loading)
            || matches!(self.college_portfolios, LoadState::Loading)
            || matches!(self.documents, LoadState::Loading)
    }
}

fn into_load_state<T>(result: Result<T, ApiError>) -> LoadState<T> {
    match result {
        Ok(value) => LoadState::Loaded(value),
        Err(err) => LoadState::Failed(err.to_string()),
    }
}

fn prune_portfolio(list: &mut LoadState<Vec<Portfolio>>, portfolio_id: i64) {
    if let LoadState::Loaded(portfolios) = list {
        portfolios.retain(|p| p.id != portfolio_id);
    }
}

/// An item viewed inside a portfolio context is deleted through the item
/// endpoint; a standalone document goes through the document endpoint.
fn details_delete_target(in_details_context: bool, item_id: i64) -> DeleteTarget {
    if in_details_context {
        DeleteTarget::Item { id: item_id }
    } else {
        DeleteTarget::Document { id: item_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio(id: i64) -> Portfolio {
        Portfolio {
            id,
            name: format!("Portfolio {id}"),
            description: None,
            item_count: 0,
            owner_name: None,
            created_at: None,
        }
    }

    #[test]
    fn deleted_portfolio_is_pruned_from_a_loaded_list() {
        let mut list = LoadState::Loaded(vec![portfolio(1), portfolio(2)]);
        prune_portfolio(&mut list, 1);
        match &list {
            LoadState::Loaded(portfolios) => {
                assert_eq!(portfolios.len(), 1);
                assert_eq!(portfolios[0].id, 2);
            }
            _ => panic!("list should stay loaded"),
        }

        // Unloaded lists are left alone.
        let mut unloaded: LoadState<Vec<Portfolio>> = LoadState::NotLoaded;
        prune_portfolio(&mut unloaded, 1);
        assert!(matches!(unloaded, LoadState::NotLoaded));
    }

    #[test]
    fn details_delete_routes_by_context() {
        assert!(matches!(
            details_delete_target(true, 9),
            DeleteTarget::Item { id: 9 }
        ));
        assert!(matches!(
            details_delete_target(false, 9),
            DeleteTarget::Document { id: 9 }
        ));
    }
}

impl App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.modals.any_open() {
            self.close_all_modals();
        }
        self.update_state(ctx);
        self.render(ctx);
    }
}
