//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{BackendError, BackendOutcome, BackendRequest, CaseController};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `request` for the worker. When the queue refuses it the request is
/// completed as failed, so the loading flag never sticks.
pub fn dispatch_request(
    cmd_tx: &Sender<BackendCommand>,
    controller: &mut CaseController,
    next_id: &mut u64,
    request: Option<BackendRequest>,
    status: &mut String,
) {
    let Some(request) = request else {
        return;
    };
    *next_id = next_id.wrapping_add(1);
    let cmd = BackendCommand {
        id: *next_id,
        request,
    };
    let cmd_name = cmd.request.name();

    let rejected = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, id = *next_id, "queued ui->backend command");
            return;
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "La cola de comandos está llena; inténtalo de nuevo".to_string();
            cmd
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status = "El proceso de red no está disponible; reinicia la aplicación".to_string();
            cmd
        }
    };
    tracing::warn!(command = cmd_name, "backend command not queued");
    controller.complete(BackendOutcome::failed(
        &rejected.request,
        BackendError::WorkerUnavailable(status.clone()),
    ));
}
