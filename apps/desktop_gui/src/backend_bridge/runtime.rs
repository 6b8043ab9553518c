//! Backend worker thread: owns the tokio runtime and the HTTP backend, runs
//! queued requests and reports their outcomes to the UI.

use std::{sync::Arc, thread};

use client_core::{execute, CaseBackend, HttpCaseBackend, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(settings: &Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let settings = settings.clone();
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let http_backend = match HttpCaseBackend::from_settings(&settings) {
                Ok(backend) => backend,
                Err(err) => {
                    tracing::error!("backend worker startup failure: {err}");
                    let _ = ui_tx.try_send(UiEvent::WorkerFailed(err.to_string()));
                    return;
                }
            };
            tracing::info!(base_url = %http_backend.base_url(), "backend worker ready");
            let backend: Arc<dyn CaseBackend> = Arc::new(http_backend);
            let _ = ui_tx.try_send(UiEvent::WorkerReady {
                backend_url: settings.backend_url.clone(),
            });

            while let Ok(cmd) = cmd_rx.recv() {
                let backend = Arc::clone(&backend);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let name = cmd.request.name();
                    tracing::debug!(command = name, id = cmd.id, "running backend command");
                    let outcome = execute(backend.as_ref(), cmd.request).await;
                    if ui_tx
                        .send(UiEvent::Completed {
                            id: cmd.id,
                            outcome,
                        })
                        .is_err()
                    {
                        tracing::debug!(command = name, "ui closed before command completed");
                    }
                });
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    });
}
