//! Bridge thread between the UI command queue and the catalog controllers.
//!
//! The worker owns the controller pair; the UI only mirrors their state from
//! the events sent back, so every catalog rule lives in `client_core`.

use client_core::{CatalogClient, CatalogController, ClientError, FormController};
use crossbeam_channel::{Receiver, Sender};
use std::thread;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_backend(server_url, cmd_rx, ui_tx));
}

fn run_backend(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(format!(
                "backend worker startup failure: failed to build runtime: {err}"
            ))));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    runtime.block_on(async move {
        let mut catalog = CatalogController::new(CatalogClient::new(server_url));
        let mut form = FormController::new();

        match catalog.refresh().await {
            Ok(()) => {
                let _ = ui_tx.try_send(UiEvent::Info("Catalog loaded".to_string()));
            }
            Err(err) => report(&ui_tx, err),
        }
        send_catalog(&ui_tx, &catalog);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::RefreshCatalog => {
                    if let Err(err) = catalog.refresh().await {
                        report(&ui_tx, err);
                    }
                    send_catalog(&ui_tx, &catalog);
                }
                BackendCommand::SelectBook { book_id } => {
                    catalog.select(book_id);
                    // Only a repopulated draft is pushed back, so in-progress
                    // edits survive a re-click on the current row.
                    if form.observe_selection(catalog.selection()) {
                        send_form(&ui_tx, &form);
                    }
                    send_catalog(&ui_tx, &catalog);
                }
                BackendCommand::NoteFieldEdited => {
                    form.note_edited();
                }
                BackendCommand::SaveNew {
                    title,
                    author,
                    description,
                } => {
                    form.title = title;
                    form.author = author;
                    form.description = description;
                    match form.save_new(&mut catalog).await {
                        Ok(true) => {
                            let _ = ui_tx.try_send(UiEvent::Info("Book saved".to_string()));
                        }
                        Ok(false) => {}
                        Err(err) => report(&ui_tx, err),
                    }
                    form.observe_selection(catalog.selection());
                    send_catalog(&ui_tx, &catalog);
                    send_form(&ui_tx, &form);
                }
                BackendCommand::SaveUpdate {
                    title,
                    author,
                    description,
                } => {
                    form.title = title;
                    form.author = author;
                    form.description = description;
                    match form.save_update(&mut catalog).await {
                        Ok(true) => {
                            let _ = ui_tx.try_send(UiEvent::Info("Book updated".to_string()));
                        }
                        Ok(false) => {}
                        Err(err) => report(&ui_tx, err),
                    }
                    form.observe_selection(catalog.selection());
                    send_catalog(&ui_tx, &catalog);
                    send_form(&ui_tx, &form);
                }
                BackendCommand::DeleteSelected => {
                    match form.delete_selected(&mut catalog).await {
                        Ok(true) => {
                            let _ = ui_tx.try_send(UiEvent::Info("Book deleted".to_string()));
                        }
                        Ok(false) => {}
                        Err(err) => report(&ui_tx, err),
                    }
                    form.observe_selection(catalog.selection());
                    send_catalog(&ui_tx, &catalog);
                    send_form(&ui_tx, &form);
                }
            }
        }
    });
}

fn send_catalog(ui_tx: &Sender<UiEvent>, catalog: &CatalogController<CatalogClient>) {
    let _ = ui_tx.try_send(UiEvent::CatalogRefreshed {
        books: catalog.books().to_vec(),
        selection: catalog.selection().map(|book| book.book_id),
    });
}

fn send_form(ui_tx: &Sender<UiEvent>, form: &FormController) {
    let _ = ui_tx.try_send(UiEvent::FormSynced {
        title: form.title.clone(),
        author: form.author.clone(),
        description: form.description.clone(),
        error_message: form.error_message().map(str::to_string),
    });
}

fn report(ui_tx: &Sender<UiEvent>, err: ClientError) {
    tracing::warn!(%err, "catalog operation failed");
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(err.to_string())));
}
