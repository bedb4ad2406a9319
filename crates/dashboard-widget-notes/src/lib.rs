//! Dashboard Notes – a sticky-note widget.
//! - Plain text, word-wrapped to the frame
//! - Text survives restarts through the widget data store
//!
//! Built as a `cdylib` it can be dropped into a plugin directory; the rlib
//! lets the dashboard ship it as a built-in.

use std::cell::RefCell;
use std::rc::Rc;

use dashboard_widget_sdk::declare_dashboard_widget;
use dashboard_widget_sdk::prelude::*;
use serde_json::Value;

pub const NAME: &str = "notes";

const DEFAULT_SIZE: Size = Size::new(240, 160);
const MIN_SIZE: Size = Size::new(120, 80);
const MAX_SIZE: Size = Size::new(640, 480);

// Cell metrics used when rendering headless.
const CHAR_WIDTH: i32 = 8;
const LINE_HEIGHT: i32 = 16;

#[derive(Debug, Default)]
pub struct NotesWidget {
    text: Rc<RefCell<String>>,
}

impl NotesWidget {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Rc::new(RefCell::new(text.into())),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }
}

impl WidgetCapability for NotesWidget {
    fn metadata(&self) -> WidgetMetadata {
        WidgetMetadata::new(NAME, DEFAULT_SIZE)
            .with_description("Sticky note")
            .with_size_limits(MIN_SIZE, MAX_SIZE)
    }

    fn create_content(&self, _host: &HostSurface) -> Box<dyn WidgetContent> {
        Box::new(NoteContent {
            text: Rc::clone(&self.text),
        })
    }

    fn serialize(&self) -> WidgetState {
        let mut state = WidgetState::new();
        let text = self.text.borrow();
        if !text.is_empty() {
            state.insert("text".into(), Value::String(text.clone()));
        }
        state
    }

    fn deserialize(&self, state: &WidgetState) {
        if let Some(text) = state.get("text").and_then(Value::as_str) {
            self.set_text(text);
        }
    }
}

/// Shares the note text with its capability, so edits show up in every
/// placed note.
struct NoteContent {
    text: Rc<RefCell<String>>,
}

impl WidgetContent for NoteContent {
    fn render(&self, size: Size) -> String {
        let columns = (size.width / CHAR_WIDTH).max(1) as usize;
        let rows = (size.height / LINE_HEIGHT).max(1) as usize;
        wrap(&self.text.borrow(), columns)
            .into_iter()
            .take(rows)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > columns {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let split = word
                    .char_indices()
                    .nth(columns)
                    .map_or(word.len(), |(index, _)| index);
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }
            let needed = line.chars().count() + usize::from(!line.is_empty()) + word.chars().count();
            if needed > columns && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

declare_dashboard_widget!(NotesWidget::default());
