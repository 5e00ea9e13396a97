//! egui rendering for the portfolio client. Widgets only write into locals
//! while a list is borrowed; the resulting actions are applied afterwards.

use eframe::egui::{
    self, Align, Align2, ComboBox, Layout, ProgressBar, RichText, ScrollArea, TextEdit,
};

use crate::api::types::Category;
use crate::notify::ModalId;
use crate::upload::Destination;
use crate::utils::{file_icon, file_size};

use super::filter::CategoryFilter;
use super::{details_delete_target, DeleteTarget, LoadState, PortfolioApp, Tab};

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::MyPortfolios => "My Portfolios",
            Tab::Documents => "My Documents",
            Tab::DepartmentPortfolios => "Department Portfolios",
            Tab::CollegePortfolios => "College Portfolios",
        }
    }
}

fn portfolio_type_label(portfolio_type: &str) -> &str {
    match portfolio_type {
        "PERSONAL" => "Personal",
        "DEPARTMENT" => "Department",
        "COLLEGE" => "College",
        _ => "Select type",
    }
}

enum DocAction {
    Download(i64),
    Details(i64),
    Delete(i64),
}

impl PortfolioApp {
    pub(super) fn render(&mut self, ctx: &egui::Context) {
        self.render_top_bar(ctx);
        self.render_central(ctx);
        self.render_upload_modal(ctx);
        self.render_create_modal(ctx);
        self.render_details_modal(ctx);
        self.render_confirm_modal(ctx);
        self.render_toast(ctx);
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Portfolio Manager");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("⬆ Upload Files").clicked() {
                        self.open_upload_modal();
                    }
                    if ui.button("➕ New Portfolio").clicked() {
                        self.open_create_modal();
                    }
                });
            });
        });
    }

    fn render_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut clicked = None;
            ui.horizontal(|ui| {
                for tab in self.available_tabs() {
                    if ui.selectable_label(self.active_tab == tab, tab.label()).clicked() {
                        clicked = Some(tab);
                    }
                }
            });
            if let Some(tab) = clicked {
                self.switch_tab(tab);
            }
            ui.separator();

            match self.active_tab {
                Tab::Documents => self.documents_tab(ui),
                tab => self.portfolio_tab(ui, tab),
            }
        });
    }

    fn portfolio_tab(&mut self, ui: &mut egui::Ui, tab: Tab) {
        let can_delete = tab == Tab::MyPortfolios;
        let state = match tab {
            Tab::MyPortfolios => &self.my_portfolios,
            Tab::DepartmentPortfolios => &self.department_portfolios,
            Tab::CollegePortfolios => &self.college_portfolios,
            Tab::Documents => unreachable!("documents tab has its own renderer"),
        };

        let mut retry = false;
        let mut delete: Option<(i64, String)> = None;

        match state {
            LoadState::NotLoaded | LoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading portfolios...");
                });
            }
            LoadState::Failed(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
                retry = ui.button("Retry").clicked();
            }
            LoadState::Loaded(portfolios) if portfolios.is_empty() => {
                ui.label("No portfolios yet");
            }
            LoadState::Loaded(portfolios) => {
                ScrollArea::vertical().auto_shrink([false, true]).show(ui, |ui| {
                    for portfolio in portfolios {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.strong(&portfolio.name);
                                    if let Some(description) = &portfolio.description {
                                        ui.label(description);
                                    }
                                    ui.horizontal(|ui| {
                                        ui.label(
                                            RichText::new(format!(
                                                "{} item(s)",
                                                portfolio.item_count
                                            ))
                                            .weak(),
                                        );
                                        if let Some(owner) = &portfolio.owner_name {
                                            ui.label(RichText::new(owner).weak());
                                        }
                                        if let Some(created) = &portfolio.created_at {
                                            ui.label(RichText::new(created).weak());
                                        }
                                    });
                                });
                                if can_delete {
                                    ui.with_layout(
                                        Layout::right_to_left(Align::Center),
                                        |ui| {
                                            if ui.button("🗑 Delete").clicked() {
                                                delete = Some((
                                                    portfolio.id,
                                                    portfolio.name.clone(),
                                                ));
                                            }
                                        },
                                    );
                                }
                            });
                        });
                        ui.add_space(4.0);
                    }
                });
            }
        }

        if retry {
            self.switch_tab(tab);
        }
        if let Some((id, name)) = delete {
            self.request_delete(DeleteTarget::Portfolio { id, name });
        }
    }

    fn documents_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                TextEdit::singleline(&mut self.search_query).hint_text("Search documents..."),
            );
            let mut filter = self.category_filter;
            ComboBox::from_id_source("category-filter")
                .selected_text(match filter {
                    CategoryFilter::All => "All Categories".to_string(),
                    CategoryFilter::Only(category) => category.label().to_string(),
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter, CategoryFilter::All, "All Categories");
                    for category in Category::ALL {
                        ui.selectable_value(
                            &mut filter,
                            CategoryFilter::Only(category),
                            category.label(),
                        );
                    }
                });
            self.category_filter = filter;
        });
        ui.add_space(4.0);

        let mut retry = false;
        let mut action = None;

        match &self.documents {
            LoadState::NotLoaded | LoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading documents...");
                });
            }
            LoadState::Failed(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
                retry = ui.button("Retry").clicked();
            }
            LoadState::Loaded(rows) => {
                let query = self.search_query.clone();
                let filter = self.category_filter;
                let mut shown = 0usize;
                ScrollArea::vertical().auto_shrink([false, true]).show(ui, |ui| {
                    for row in rows.iter().filter(|row| row.visible(&query, filter)) {
                        shown += 1;
                        let doc = &row.doc;
                        ui.horizontal(|ui| {
                            ui.label(file_icon::icon_for(&doc.name));
                            ui.strong(&doc.name);
                            let size = doc
                                .formatted_size
                                .clone()
                                .unwrap_or_else(|| file_size::format_size(doc.file_size));
                            ui.label(RichText::new(size).weak());
                            ui.label(RichText::new(doc.category.label()).weak());
                            if let Some(uploaded) = &doc.uploaded_at {
                                ui.label(RichText::new(uploaded).weak());
                            }
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                if ui.button("🗑").on_hover_text("Delete").clicked() {
                                    action = Some(DocAction::Delete(doc.id));
                                }
                                if ui.button("ℹ").on_hover_text("Details").clicked() {
                                    action = Some(DocAction::Details(doc.id));
                                }
                                if ui.button("⬇").on_hover_text("Download").clicked() {
                                    action = Some(DocAction::Download(doc.id));
                                }
                            });
                        });
                        ui.separator();
                    }
                    if shown == 0 {
                        ui.label("No documents found");
                    }
                });
            }
        }

        if retry {
            self.load_documents();
        }
        match action {
            Some(DocAction::Download(id)) => self.download_document(id),
            Some(DocAction::Details(id)) => self.view_document_details(id),
            Some(DocAction::Delete(id)) => self.request_delete(DeleteTarget::Document { id }),
            None => {}
        }
    }

    // ---- modals ----------------------------------------------------------

    fn render_upload_modal(&mut self, ctx: &egui::Context) {
        if !self.modals.is_open(ModalId::Upload) {
            return;
        }
        let mut open = true;
        egui::Window::new("Upload Files")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| self.upload_modal_contents(ui));
        if !open {
            self.close_modal(ModalId::Upload);
        }
    }

    fn upload_modal_contents(&mut self, ui: &mut egui::Ui) {
        let uploading = self.upload.in_progress();

        ui.add_enabled_ui(!uploading, |ui| {
            let mut destination = self.upload.destination();
            ui.horizontal(|ui| {
                ui.radio_value(&mut destination, Destination::Portfolio, "To a portfolio");
                ui.radio_value(&mut destination, Destination::Documents, "To my documents");
            });
            self.upload.set_destination(destination);

            match destination {
                Destination::Portfolio => self.portfolio_picker(ui),
                Destination::Documents => {
                    let mut category = self.upload_category;
                    ComboBox::from_id_source("upload-category")
                        .selected_text(category.label())
                        .show_ui(ui, |ui| {
                            for option in Category::ALL {
                                ui.selectable_value(&mut category, option, option.label());
                            }
                        });
                    self.upload_category = category;
                }
            }

            ui.add_space(6.0);
            if ui.button("Add Files...").clicked() {
                self.select_files();
            }
        });

        let mut remove = None;
        if !self.upload.files().is_empty() {
            ui.add_space(6.0);
            for file in self.upload.files() {
                ui.horizontal(|ui| {
                    ui.label(file_icon::icon_for(&file.name));
                    ui.label(&file.name);
                    ui.label(RichText::new(file_size::format_size(file.byte_size)).weak());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if !uploading && ui.button("✕").clicked() {
                            remove = Some(file.name.clone());
                        }
                    });
                });
            }
        }
        if let Some(name) = remove {
            self.upload.remove_file(&name);
        }

        if let Some(report) = &self.progress {
            ui.add_space(6.0);
            ui.add(
                ProgressBar::new(f32::from(report.percent) / 100.0)
                    .text(report.message.clone())
                    .desired_width(320.0),
            );
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let label = format!(
                "Upload {} File(s) to {}",
                self.upload.file_count(),
                match self.upload.destination() {
                    Destination::Portfolio => "Portfolio",
                    Destination::Documents => "Documents",
                }
            );
            let enabled = !uploading && self.upload.file_count() > 0;
            if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                self.start_upload();
            }
            if ui.button("Cancel").clicked() {
                self.close_modal(ModalId::Upload);
            }
        });
    }

    fn portfolio_picker(&mut self, ui: &mut egui::Ui) {
        let mut selected = self.upload.target_portfolio_id();
        match &self.my_portfolios {
            LoadState::Loaded(portfolios) => {
                let selected_text = selected
                    .and_then(|id| portfolios.iter().find(|p| p.id == id))
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Select a portfolio".to_string());
                ComboBox::from_id_source("upload-portfolio")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for portfolio in portfolios {
                            ui.selectable_value(&mut selected, Some(portfolio.id), &portfolio.name);
                        }
                    });
            }
            LoadState::Failed(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
            }
            LoadState::NotLoaded | LoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading portfolios...");
                });
            }
        }
        self.upload.set_target_portfolio(selected);
    }

    fn render_create_modal(&mut self, ctx: &egui::Context) {
        if !self.modals.is_open(ModalId::CreatePortfolio) {
            return;
        }
        let mut open = true;
        egui::Window::new("Create Portfolio")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut self.create_form.name);
                ui.label("Description");
                ui.text_edit_multiline(&mut self.create_form.description);
                ui.label("Type");
                let selected_text =
                    portfolio_type_label(&self.create_form.portfolio_type).to_string();
                ComboBox::from_id_source("portfolio-type")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for option in ["PERSONAL", "DEPARTMENT", "COLLEGE"] {
                            ui.selectable_value(
                                &mut self.create_form.portfolio_type,
                                option.to_string(),
                                portfolio_type_label(option),
                            );
                        }
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let creating = self.create_guard.is_in_flight();
                    let label = if creating { "Creating..." } else { "Create" };
                    if ui.add_enabled(!creating, egui::Button::new(label)).clicked() {
                        self.create_portfolio();
                    }
                    if ui.button("Cancel").clicked() {
                        self.close_modal(ModalId::CreatePortfolio);
                    }
                });
            });
        if !open {
            self.close_modal(ModalId::CreatePortfolio);
        }
    }

    fn render_details_modal(&mut self, ctx: &egui::Context) {
        if !self.modals.is_open(ModalId::ItemDetails) {
            return;
        }
        let Some((item_id, details)) = self.item_details.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Document Details")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("item-details").num_columns(2).show(ui, |ui| {
                    ui.label("Name");
                    ui.strong(&details.name);
                    ui.end_row();
                    if let Some(file_type) = &details.file_type {
                        ui.label("Type");
                        ui.label(file_type);
                        ui.end_row();
                    }
                    ui.label("Size");
                    ui.label(file_size::format_size(details.file_size));
                    ui.end_row();
                    if let Some(uploaded) = &details.uploaded_at {
                        ui.label("Uploaded");
                        ui.label(uploaded);
                        ui.end_row();
                    }
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("⬇ Download").clicked() {
                        self.download_document(item_id);
                    }
                    let delete = egui::Button::new(
                        RichText::new("🗑 Delete").color(ui.visuals().error_fg_color),
                    );
                    if ui.add(delete).clicked() {
                        let target =
                            details_delete_target(self.session.in_details_context(), item_id);
                        self.request_delete(target);
                    }
                    if ui.button("Close").clicked() {
                        self.close_modal(ModalId::ItemDetails);
                    }
                });
            });
        if !open {
            self.close_modal(ModalId::ItemDetails);
        }
    }

    fn render_confirm_modal(&mut self, ctx: &egui::Context) {
        if !self.modals.is_open(ModalId::ConfirmDelete) {
            return;
        }
        let Some(prompt) = self.pending_delete.as_ref().map(DeleteTarget::prompt) else {
            return;
        };
        let mut open = true;
        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(prompt);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let delete = egui::Button::new(
                        RichText::new("Delete").color(ui.visuals().error_fg_color),
                    );
                    if ui.add(delete).clicked() {
                        self.confirm_delete();
                    }
                    if ui.button("Cancel").clicked() {
                        self.close_modal(ModalId::ConfirmDelete);
                    }
                });
            });
        if !open {
            self.close_modal(ModalId::ConfirmDelete);
        }
    }

    fn render_toast(&mut self, ctx: &egui::Context) {
        let Some(toast) = self.toasts.visible().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Area::new(egui::Id::new("toast"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(toast.kind.background())
                    .rounding(6.0)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(toast.kind.icon());
                            ui.label(
                                RichText::new(&toast.message).color(toast.kind.foreground()),
                            );
                            if ui
                                .button(RichText::new("✕").color(toast.kind.foreground()))
                                .clicked()
                            {
                                dismissed = true;
                            }
                        });
                    });
            });
        if dismissed {
            self.toasts.dismiss();
        }
    }
}
