//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// Queues `cmd` for the backend worker. The error describes why the worker could not take it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui command queue is full");
            Err(UiError::from_message(
                UiErrorContext::General,
                "UI command queue is full; please retry",
            ))
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(UiError::from_message(
                UiErrorContext::General,
                "Backend command processor disconnected (possible startup/runtime failure); restart the app",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorCategory;
    use client_core::ListState;
    use crossbeam_channel::bounded;

    #[test]
    fn queues_command_while_worker_listens() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let ticket = ListState::default().begin_fetch();

        dispatch_backend_command(&cmd_tx, BackendCommand::FetchCategories(ticket.clone()))
            .expect("queued");

        match cmd_rx.try_recv() {
            Ok(BackendCommand::FetchCategories(queued)) => assert_eq!(queued, ticket),
            _ => panic!("expected queued fetch"),
        }
    }

    #[test]
    fn disconnected_worker_is_reported_as_transport_error() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);

        let err = dispatch_backend_command(
            &cmd_tx,
            BackendCommand::FetchCategories(ListState::default().begin_fetch()),
        )
        .expect_err("worker gone");
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }
}
