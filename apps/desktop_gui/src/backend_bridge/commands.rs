//! Backend commands queued from UI to backend worker.

use shared::domain::BookId;

pub enum BackendCommand {
    RefreshCatalog,
    SelectBook {
        book_id: Option<BookId>,
    },
    SaveNew {
        title: String,
        author: String,
        description: String,
    },
    SaveUpdate {
        title: String,
        author: String,
        description: String,
    },
    DeleteSelected,
    NoteFieldEdited,
}
