use std::path::PathBuf;

use eframe::{egui, CreationContext};
use egui::{Context, RichText, Ui, ViewportCommand};
use log::debug;
use rfd::FileDialog;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::analysis::AnalysisClient;
use crate::export;
use crate::model::{AnalysisResult, Theme};
use crate::prefs::ThemeStore;
use crate::workflow::{SelectionError, Workflow, WorkflowState};

use super::theme::{self, ACCENT};
use super::utils::{format_file_size, get_file_size, truncate_string};

/// The main application state
pub struct TermScanApp {
    // Runtime for the analysis call
    runtime: Runtime,

    // Workflow state machine (sole owner of the analysis lifecycle)
    workflow: Workflow,

    // Theme
    theme: Theme,
    theme_store: ThemeStore,

    // Completion channel for the outstanding analysis call
    analysis_rx: Option<mpsc::UnboundedReceiver<Result<AnalysisResult, String>>>,

    // Transient display state
    selection_error: Option<String>,
    export_status: Option<String>,
    selected_size: Option<u64>,
}

impl TermScanApp {
    pub fn new(cc: &CreationContext) -> Self {
        let theme_store = ThemeStore::new();
        let system_dark = cc.egui_ctx.style().visuals.dark_mode;
        let theme = theme_store.initial(system_dark);
        theme::apply_theme(&cc.egui_ctx, theme);

        let runtime = Runtime::new().expect("Failed to create Tokio runtime");

        Self {
            runtime,
            workflow: Workflow::new(),
            theme,
            theme_store,
            analysis_rx: None,
            selection_error: None,
            export_status: None,
            selected_size: None,
        }
    }

    /// Draw the top menu bar
    fn menu_bar(&mut self, ui: &mut Ui, ctx: &Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                // Upload is only offered while no analysis is in flight
                let can_select = !self.workflow.is_analyzing();
                if ui
                    .add_enabled(can_select, egui::Button::new("Open PDF..."))
                    .clicked()
                {
                    ui.close_menu();
                    self.open_file_dialog(ctx);
                }

                let can_export = self.workflow.result().is_some();
                if ui
                    .add_enabled(can_export, egui::Button::new("Export Study Guide..."))
                    .clicked()
                {
                    ui.close_menu();
                    self.export_study_guide();
                }

                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.radio_value(&mut self.theme, Theme::Light, "Light Theme").clicked() {
                    self.apply_and_save_theme(ctx);
                    ui.close_menu();
                }
                if ui.radio_value(&mut self.theme, Theme::Dark, "Dark Theme").clicked() {
                    self.apply_and_save_theme(ctx);
                    ui.close_menu();
                }
            });
        });
    }

    fn apply_and_save_theme(&self, ctx: &Context) {
        theme::apply_theme(ctx, self.theme);
        self.theme_store.set(self.theme);
    }

    fn open_file_dialog(&mut self, ctx: &Context) {
        if let Some(path) = FileDialog::new()
            .add_filter("PDF Files", &["pdf"])
            .pick_file()
        {
            self.select_file(path, ctx);
        }
    }

    /// Route a selection through the workflow and start the analysis call
    fn select_file(&mut self, path: PathBuf, ctx: &Context) {
        self.selection_error = None;
        self.export_status = None;

        match self.workflow.select_file(&path) {
            Ok(()) => {
                self.selected_size = get_file_size(&path);
                self.start_analysis(path, ctx);
            }
            // Selections while a call is in flight are dropped silently;
            // the upload controls are disabled in that state anyway
            Err(SelectionError::Busy) => {}
            Err(e) => self.selection_error = Some(e.to_string()),
        }
    }

    fn start_analysis(&mut self, path: PathBuf, ctx: &Context) {
        // A missing credential is surfaced before any read or network call
        let client = match AnalysisClient::from_env() {
            Ok(client) => client,
            Err(e) => {
                self.workflow.finish_analysis(Err(e.to_string()));
                return;
            }
        };

        let file_name = self
            .workflow
            .current_file()
            .unwrap_or_default()
            .to_string();
        debug!("Starting analysis of '{}'", file_name);

        let (tx, rx) = mpsc::unbounded_channel();
        self.analysis_rx = Some(rx);

        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = run_analysis(client, path, file_name).await;
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    /// Deliver a finished analysis outcome to the workflow, if one arrived
    fn poll_analysis(&mut self) {
        let Some(rx) = &mut self.analysis_rx else {
            return;
        };
        if let Ok(outcome) = rx.try_recv() {
            self.workflow.finish_analysis(outcome);
            self.analysis_rx = None;
        }
    }

    fn export_study_guide(&mut self) {
        let Some(result) = self.workflow.result().cloned() else {
            return;
        };

        if let Some(save_path) = FileDialog::new()
            .set_file_name(export::file_name(&result.title))
            .add_filter("PDF Files", &["pdf"])
            .save_file()
        {
            match export::save_study_guide(&result, self.theme, &save_path) {
                Ok(()) => {
                    self.export_status =
                        Some(format!("Saved study guide to '{}'", save_path.display()));
                }
                Err(e) => {
                    self.export_status = Some(format!("Export failed: {}", e));
                }
            }
        }
    }

    fn show_idle(&mut self, ui: &mut Ui, ctx: &Context) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading(RichText::new("TermScan").size(28.0).color(ACCENT));
            ui.add_space(8.0);
            ui.label("Extract key terms and definitions from your study material");
            ui.add_space(24.0);

            if ui
                .button(RichText::new("📄 Select a PDF").size(16.0))
                .clicked()
            {
                self.open_file_dialog(ctx);
            }

            ui.add_space(8.0);
            ui.label(
                RichText::new("or drop a file anywhere in this window · PDF up to 20 MB")
                    .color(theme::secondary_text(self.theme))
                    .small(),
            );

            if let Some(error) = &self.selection_error {
                ui.add_space(16.0);
                ui.colored_label(egui::Color32::RED, error);
            }
        });
    }

    fn show_analyzing(&self, ui: &mut Ui, file_name: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(140.0);
            ui.add(egui::Spinner::new().size(36.0));
            ui.add_space(16.0);

            let mut label = format!("Analyzing {}", truncate_string(file_name, 48));
            if let Some(size) = self.selected_size {
                label.push_str(&format!(" ({})", format_file_size(size)));
            }
            ui.heading(label);

            ui.add_space(8.0);
            ui.label(
                RichText::new("Extracting terms and definitions, this can take a moment")
                    .color(theme::secondary_text(self.theme)),
            );
        });
    }

    fn show_result(&mut self, ui: &mut Ui, result: &AnalysisResult) {
        ui.horizontal(|ui| {
            ui.heading(&result.title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Start Over").clicked() {
                    self.workflow.clear();
                    self.export_status = None;
                    self.selected_size = None;
                }
                if ui.button("⬇ Export Study Guide").clicked() {
                    self.export_study_guide();
                }
            });
        });

        ui.label(
            RichText::new(&result.summary)
                .italics()
                .color(theme::secondary_text(self.theme)),
        );

        if let Some(status) = &self.export_status {
            ui.add_space(4.0);
            ui.label(RichText::new(status).small());
        }

        ui.separator();

        if result.definitions.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(50.0);
                ui.label("No terms found in this document");
            });
            return;
        }

        ui.label(format!("{} terms extracted", result.definitions.len()));
        ui.add_space(8.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for def in &result.definitions {
                ui.group(|ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(&def.term).strong().color(ACCENT));
                    ui.label(&def.definition);
                    if let Some(context) = &def.context {
                        ui.label(
                            RichText::new(format!("“{}”", context))
                                .italics()
                                .small()
                                .color(theme::secondary_text(self.theme)),
                        );
                    }
                });
                ui.add_space(6.0);
            }
        });
    }

    fn show_failed(&mut self, ui: &mut Ui, ctx: &Context, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.label(RichText::new("⚠ Analysis failed").size(20.0).strong());
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::RED, message);
            ui.add_space(24.0);

            if ui.button("Try Another File").clicked() {
                self.open_file_dialog(ctx);
            }
        });
    }
}

impl eframe::App for TermScanApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_analysis();

        // Dropped files act like a file-picker selection
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.select_file(path, ctx);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.menu_bar(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.workflow.state().clone() {
                WorkflowState::Idle => self.show_idle(ui, ctx),
                WorkflowState::Analyzing { file_name } => self.show_analyzing(ui, &file_name),
                WorkflowState::Result(result) => self.show_result(ui, &result),
                WorkflowState::Failed { message } => self.show_failed(ui, ctx, &message),
            }
        });
    }
}

async fn run_analysis(
    client: AnalysisClient,
    path: PathBuf,
    file_name: String,
) -> Result<AnalysisResult, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read the file: {}", e))?;
    client
        .analyze(&bytes, &file_name)
        .await
        .map_err(|e| e.to_string())
}
