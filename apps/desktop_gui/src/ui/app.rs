//! egui application: the book form, the list view, and the status line.

use crossbeam_channel::{Receiver, Sender};
use egui::{Color32, RichText};
use shared::{domain::BookId, protocol::BookSummary};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const ERROR_TEXT_COLOR: Color32 = Color32::from_rgb(0xd0, 0x4a, 0x4a);

pub struct CatalogApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    // Mirrors of the worker-owned controller state.
    books: Vec<BookSummary>,
    selected: Option<BookId>,

    title_input: String,
    author_input: String,
    description_input: String,
    form_error: Option<String>,

    status: String,
}

impl CatalogApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            books: Vec::new(),
            selected: None,
            title_input: String::new(),
            author_input: String::new(),
            description_input: String::new(),
            form_error: None,
            status: "Connecting to catalog...".to_string(),
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn note_field_edited(&mut self) {
        self.form_error = None;
        self.dispatch(BackendCommand::NoteFieldEdited);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::CatalogRefreshed { books, selection } => {
                    self.books = books;
                    self.selected = selection;
                }
                UiEvent::FormSynced {
                    title,
                    author,
                    description,
                    error_message,
                } => {
                    self.title_input = title;
                    self.author_input = author;
                    self.description_input = description;
                    self.form_error = error_message;
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                }
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Book");
        ui.add_space(6.0);

        egui::Grid::new("book_form")
            .num_columns(2)
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                ui.label("Title:");
                if ui.text_edit_singleline(&mut self.title_input).changed() {
                    self.note_field_edited();
                }
                ui.end_row();

                ui.label("Author:");
                if ui.text_edit_singleline(&mut self.author_input).changed() {
                    self.note_field_edited();
                }
                ui.end_row();

                ui.label("Description:");
                if ui
                    .add(egui::TextEdit::multiline(&mut self.description_input).desired_rows(4))
                    .changed()
                {
                    self.note_field_edited();
                }
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Save New").clicked() {
                let cmd = BackendCommand::SaveNew {
                    title: self.title_input.clone(),
                    author: self.author_input.clone(),
                    description: self.description_input.clone(),
                };
                self.dispatch(cmd);
            }

            let has_selection = self.selected.is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Save"))
                .clicked()
            {
                let cmd = BackendCommand::SaveUpdate {
                    title: self.title_input.clone(),
                    author: self.author_input.clone(),
                    description: self.description_input.clone(),
                };
                self.dispatch(cmd);
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete"))
                .clicked()
            {
                self.dispatch(BackendCommand::DeleteSelected);
            }
        });

        if let Some(error) = self.form_error.clone() {
            ui.add_space(6.0);
            ui.colored_label(ERROR_TEXT_COLOR, error);
        }
    }

    fn show_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Books");
            if ui.small_button("Reload").clicked() {
                self.dispatch(BackendCommand::RefreshCatalog);
            }
        });
        ui.add_space(6.0);

        if self.books.is_empty() {
            ui.weak("No books in the catalog yet.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for book in &self.books {
                    let is_selected = self.selected == Some(book.book_id);
                    let row = format!("{}\n{}", book.title, book.author);
                    if ui
                        .selectable_label(is_selected, RichText::new(row))
                        .clicked()
                    {
                        clicked = Some(book.book_id);
                    }
                }
            });

        if let Some(book_id) = clicked {
            self.selected = Some(book_id);
            self.dispatch(BackendCommand::SelectBook {
                book_id: Some(book_id),
            });
        }
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Library");
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(2.0);
            ui.weak(self.status.as_str());
            ui.add_space(2.0);
        });

        egui::SidePanel::right("book_list")
            .default_width(320.0)
            .show(ctx, |ui| {
                self.show_list(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_form(ui);
        });

        // Backend events arrive on a channel, not through egui's input
        // pipeline, so poll at a coarse interval.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
