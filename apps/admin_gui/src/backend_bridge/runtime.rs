//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use anyhow::Context;
use client_core::{CategoryApi, CategoryClient, ClientSettings};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::runtime::Runtime;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        emit(&ui_tx, UiEvent::Info("Backend worker starting...".to_string()));
        let (runtime, client) = match prepare_worker(&settings) {
            Ok(prepared) => prepared,
            Err(err) => {
                emit(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )),
                );
                tracing::error!("backend worker startup failure: {err:#}");
                return;
            }
        };

        runtime.block_on(async move {
            let delete_close_delay = settings.delete_close_delay();
            tracing::info!(api_base_url = %settings.api_base_url, "backend worker ready");
            emit(
                &ui_tx,
                UiEvent::Info(format!("Connected to {}", settings.api_base_url)),
            );

            while let Ok(cmd) = cmd_rx.recv() {
                let api = client.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    run_command(api.as_ref(), cmd, &ui_tx, delete_close_delay).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn prepare_worker(settings: &ClientSettings) -> anyhow::Result<(Runtime, Arc<CategoryClient>)> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let client = CategoryClient::new(settings).with_context(|| {
        format!("failed to prepare category client for '{}'", settings.api_base_url)
    })?;
    Ok((runtime, Arc::new(client)))
}

/// Performs one command against `api` and reports its result as [`UiEvent`]s.
pub async fn run_command<A>(
    api: &A,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
    delete_close_delay: Duration,
) where
    A: CategoryApi + ?Sized,
{
    match cmd {
        BackendCommand::FetchCategories(ticket) => {
            let result = api.list_categories(&ticket.query).await;
            emit(
                ui_tx,
                UiEvent::CategoriesFetched {
                    generation: ticket.generation,
                    result,
                },
            );
        }
        BackendCommand::DeleteCategory { category_id } => {
            match api.delete_category(&category_id).await {
                Ok(()) => {
                    tracing::info!(%category_id, "category deleted");
                    emit(ui_tx, UiEvent::CategoryDeleted);
                    if !delete_close_delay.is_zero() {
                        tokio::time::sleep(delete_close_delay).await;
                    }
                    emit(ui_tx, UiEvent::DeleteSettled { category_id });
                }
                Err(err) => emit(ui_tx, UiEvent::DeleteFailed(err)),
            }
        }
        BackendCommand::CreateCategory(request) => match api.create_category(&request).await {
            Ok(()) => {
                tracing::info!(name = %request.name, "category created");
                emit(ui_tx, UiEvent::CategoryCreated { name: request.name });
            }
            Err(err) => emit(ui_tx, UiEvent::CreateFailed(err)),
        },
    }
}

fn emit(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => tracing::warn!("ui event queue is full; dropping event"),
        Err(TrySendError::Disconnected(_)) => tracing::debug!("ui event queue closed"),
    }
}
