use std::sync::mpsc::Receiver;

use crate::clipboard::ClipboardSink;
use crate::history_store::SharedHistory;
use crate::logging;
use crate::popup_state::{delete_word_before, next_selection_index, PopupState};
use crate::search::{apply, is_blank_query, sanitize_query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ClipboardText(String),
    QueryChanged(String),
    MoveSelection(i32),
    DeleteWordBackward,
    Submit,
    Hotkey,
    Escape,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// Every history mutation and every re-filter goes through `handle`, one event
// at a time.
pub struct PopupSession<K> {
    history: SharedHistory,
    sink: K,
    popup: PopupState,
    query: String,
    results: Vec<String>,
    selected: Option<usize>,
    last_restored: Option<String>,
}

impl<K: ClipboardSink> PopupSession<K> {
    pub fn new(history: SharedHistory, sink: K) -> Self {
        let mut session = Self {
            history,
            sink,
            popup: PopupState::default(),
            query: String::new(),
            results: Vec::new(),
            selected: None,
            last_restored: None,
        };
        session.refresh();
        session
    }

    pub fn handle(&mut self, event: SessionEvent) -> Flow {
        match event {
            SessionEvent::ClipboardText(text) => {
                self.history.add(text);
                self.refresh();
            }
            SessionEvent::QueryChanged(raw) => {
                self.query = sanitize_query(&raw);
                self.refresh();
            }
            SessionEvent::MoveSelection(direction) => {
                self.selected = next_selection_index(self.selected, self.results.len(), direction);
            }
            SessionEvent::DeleteWordBackward => {
                let cursor = self.query.chars().count();
                let (query, _) = delete_word_before(&self.query, cursor);
                self.query = query;
                self.refresh();
            }
            SessionEvent::Submit => {
                self.restore_selected();
                self.popup.hide();
            }
            SessionEvent::Hotkey => {
                if self.popup.toggle() {
                    self.refresh();
                }
            }
            SessionEvent::Escape => {
                self.popup.on_escape();
            }
            SessionEvent::Shutdown => return Flow::Exit,
        }
        Flow::Continue
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.results.get(index))
            .map(String::as_str)
    }

    pub fn is_visible(&self) -> bool {
        self.popup.is_visible()
    }

    pub fn last_restored(&self) -> Option<&str> {
        self.last_restored.as_deref()
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    fn refresh(&mut self) {
        let snapshot = self.history.snapshot();
        self.results = apply(&self.query, &snapshot);
        self.selected = if is_blank_query(&self.query) || self.results.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    fn restore_selected(&mut self) {
        let Some(text) = self.selected_entry().map(str::to_string) else {
            return;
        };

        match self.sink.write_text(&text) {
            Ok(()) => {
                logging::info(&format!("restored entry ({} chars)", text.chars().count()));
                self.history.add(text.clone());
                self.last_restored = Some(text);
                self.refresh();
            }
            Err(error) => {
                logging::warn(&format!("failed to restore entry: {error}"));
            }
        }
    }
}

pub fn run_event_loop<K, F>(
    events: Receiver<SessionEvent>,
    session: &mut PopupSession<K>,
    mut on_update: F,
) where
    K: ClipboardSink,
    F: FnMut(&PopupSession<K>),
{
    while let Ok(event) = events.recv() {
        if session.handle(event) == Flow::Exit {
            break;
        }
        on_update(session);
    }
}
