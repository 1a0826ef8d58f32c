//! Command orchestration from UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::RefreshCatalog => "refresh_catalog",
        BackendCommand::SelectBook { .. } => "select_book",
        BackendCommand::SaveNew { .. } => "save_new",
        BackendCommand::SaveUpdate { .. } => "save_update",
        BackendCommand::DeleteSelected => "delete_selected",
        BackendCommand::NoteFieldEdited => "note_field_edited",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup failure); restart the app"
                    .to_string();
        }
    }
}
