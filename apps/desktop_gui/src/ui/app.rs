//! Main window: renders the controller's view state and turns clicks into
//! controller actions.

use std::{
    collections::VecDeque,
    path::PathBuf,
    time::{Duration, Instant},
};

use client_core::{CaseController, Notice, Settings};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{NoticeKind, ACCEPTED_UPLOAD_EXTENSIONS};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_worker_failure, UiEvent};
use crate::controller::orchestration::dispatch_request;

pub const APP_TITLE: &str = "ISO/IEC 29100 - Casos de Estudio";
const FOOTER: &str = "GRUPO 9 - CARRASCO - MAYORGA - OLIVARES - SALAS - 2025/2025";
const TOAST_TTL: Duration = Duration::from_secs(5);
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub backend_url: String,
    pub export_dir: PathBuf,
}

impl StartupConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            backend_url: settings.backend_url.clone(),
            export_dir: settings.export_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    GenerateCase,
    UploadCase(PathBuf),
    ResetAll,
    DownloadCasePdf,
    RequestSolution,
    CompareAnswers,
    ClearAnswers,
    DownloadFullReport,
}

pub struct CaseStudyApp {
    controller: CaseController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    next_command_id: u64,
    backend_url: String,
    status: String,
    worker_error: Option<String>,
    toasts: VecDeque<(Notice, Instant)>,
}

impl CaseStudyApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            controller: CaseController::new(startup.export_dir),
            cmd_tx,
            ui_rx,
            next_command_id: 0,
            backend_url: startup.backend_url,
            status: "Iniciando...".to_string(),
            worker_error: None,
            toasts: VecDeque::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::WorkerReady { backend_url } => {
                    self.status = format!("Conectado a {backend_url}");
                    self.backend_url = backend_url;
                    self.worker_error = None;
                }
                UiEvent::WorkerFailed(message) => {
                    self.status = classify_worker_failure(&message);
                    self.worker_error = Some(message);
                }
                UiEvent::Completed { id, outcome } => {
                    tracing::debug!(id, "backend command completed");
                    self.controller.complete(outcome);
                }
            }
        }
        self.collect_notices();
    }

    fn collect_notices(&mut self) {
        let now = Instant::now();
        for notice in self.controller.take_notices() {
            self.toasts.push_back((notice, now));
        }
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts
            .retain(|(_, shown_at)| now.duration_since(*shown_at) < TOAST_TTL);
    }

    pub fn apply_action(&mut self, action: UiAction) {
        let request = match action {
            UiAction::GenerateCase => self.controller.begin_generate_case(),
            UiAction::UploadCase(path) => {
                if !self.controller.select_upload_file(path.clone()) {
                    return;
                }
                self.controller.begin_upload_case(path)
            }
            UiAction::ResetAll => {
                self.controller.reset();
                None
            }
            UiAction::DownloadCasePdf => {
                self.controller.download_case_pdf();
                None
            }
            UiAction::RequestSolution => self.controller.begin_request_solution(),
            UiAction::CompareAnswers => self.controller.begin_compare_answers(),
            UiAction::ClearAnswers => {
                self.controller.clear_derived();
                None
            }
            UiAction::DownloadFullReport => {
                self.controller.download_full_report_pdf();
                None
            }
        };
        dispatch_request(
            &self.cmd_tx,
            &mut self.controller,
            &mut self.next_command_id,
            request,
            &mut self.status,
        );
        self.collect_notices();
    }

    fn show_toolbar(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let loading = self.controller.state().is_loading();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!loading, egui::Button::new("Generar Caso de Estudio"))
                .clicked()
            {
                actions.push(UiAction::GenerateCase);
            }
            if ui
                .add_enabled(!loading, egui::Button::new("Cargar Caso..."))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Documentos", &ACCEPTED_UPLOAD_EXTENSIONS[..])
                    .pick_file()
                {
                    actions.push(UiAction::UploadCase(path));
                }
            }
            if ui.button("Limpiar Todo").clicked() {
                actions.push(UiAction::ResetAll);
            }
        });
    }

    fn show_case(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let loading = self.controller.state().is_loading();

        ui.group(|ui| {
            ui.label(egui::RichText::new("Caso Generado").heading());
            ui.separator();
            ui.label(self.controller.state().case_study());
        });
        if ui.button("Descargar Caso en PDF").clicked() {
            actions.push(UiAction::DownloadCasePdf);
        }
        ui.add_space(8.0);

        ui.columns(2, |columns| {
            columns[0].label(egui::RichText::new("Tu Respuesta").strong());
            columns[0].add(
                egui::TextEdit::multiline(self.controller.manual_input_mut())
                    .hint_text("Escribe tu solución aquí...")
                    .desired_rows(10)
                    .desired_width(f32::INFINITY),
            );

            columns[1].label(egui::RichText::new("Solución Generada por IA").strong());
            let ia_solution = self.controller.state().ia_solution();
            if ia_solution.is_empty() {
                columns[1].weak("Presiona el botón para obtener la solución.");
            } else {
                columns[1].label(ia_solution);
            }
        });
        ui.add_space(8.0);

        let has_solution = !self.controller.state().ia_solution().is_empty();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!loading, egui::Button::new("Obtener Solución IA"))
                .clicked()
            {
                actions.push(UiAction::RequestSolution);
            }
            if ui
                .add_enabled(
                    has_solution && !loading,
                    egui::Button::new("Comparar Respuestas"),
                )
                .clicked()
            {
                actions.push(UiAction::CompareAnswers);
            }
            if ui.button("Limpiar respuestas").clicked() {
                actions.push(UiAction::ClearAnswers);
            }
            if ui.button("Descargar Reporte Completo").clicked() {
                actions.push(UiAction::DownloadFullReport);
            }
        });

        let comparison = self.controller.state().comparison();
        if !comparison.is_empty() {
            ui.add_space(8.0);
            ui.group(|ui| {
                ui.label(egui::RichText::new("Resultado de la Comparación").heading());
                ui.separator();
                ui.label(comparison);
            });
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            for (notice, _) in &self.toasts {
                ui.colored_label(notice_color(notice.kind), &notice.message);
            }
            ui.horizontal(|ui| {
                if self.worker_error.is_some() {
                    ui.colored_label(egui::Color32::RED, &self.status);
                } else {
                    ui.label(&self.status);
                }
                ui.separator();
                ui.weak(&self.backend_url);
            });
            ui.vertical_centered(|ui| {
                ui.small(FOOTER);
            });
        });
    }
}

fn notice_color(kind: NoticeKind) -> egui::Color32 {
    match kind {
        NoticeKind::Info => egui::Color32::LIGHT_BLUE,
        NoticeKind::Success => egui::Color32::from_rgb(25, 135, 84),
        NoticeKind::Error => egui::Color32::from_rgb(220, 53, 69),
    }
}

impl eframe::App for CaseStudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let now = tokio::time::Instant::now();
        self.controller.prune_expired(now);

        let mut actions = Vec::new();
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(APP_TITLE);
                });
                ui.add_space(8.0);
                self.show_toolbar(ui, &mut actions);

                if let Some(notice) = self.controller.state().upload_notice_at(now) {
                    ui.colored_label(notice_color(notice.kind), &notice.message);
                }
                if self.controller.state().is_loading() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Cargando...");
                    });
                }

                if !self.controller.state().case_study().is_empty() {
                    ui.add_space(8.0);
                    self.show_case(ui, &mut actions);
                }
            });
        });

        for action in actions {
            self.apply_action(action);
        }

        let upload_notice_left = self
            .controller
            .state()
            .upload_notice_at(now)
            .map(|notice| notice.remaining(now));
        let repaint_after = match upload_notice_left {
            Some(left) if left < Duration::from_millis(100) => left,
            _ => Duration::from_millis(100),
        };
        ctx.request_repaint_after(repaint_after);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
