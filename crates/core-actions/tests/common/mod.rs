#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, KeyTranslator, handle_key};
use core_events::{KeyCode, KeyEvent};
use core_model::{Session, SessionOptions};
use core_render::{Frame, RenderContext, render};
use core_text::{Cursor, Document};

/// A session plus the translator that owns pending keys.
pub struct Harness {
    pub session: Session,
    pub translator: KeyTranslator,
}

impl Harness {
    pub fn new(text: &str) -> Self {
        Self::with_documents(vec![Document::from_text(text)])
    }

    pub fn empty() -> Self {
        Self::with_documents(Vec::new())
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            session: Session::new(documents, SessionOptions::default()),
            translator: KeyTranslator::new(),
        }
    }

    pub fn key(&mut self, key: KeyEvent) -> DispatchResult {
        handle_key(&mut self.session, &mut self.translator, &key)
    }

    /// Feed `keys`; `<Esc>`, `<CR>`, `<BS>`, `<Del>`, `<Tab>`, `<S-Tab>`,
    /// `<Left>`, `<Right>`, `<Up>`, `<Down>` and `<C-x>` name special keys.
    /// Returns the last dispatch result.
    pub fn keys(&mut self, keys: &str) -> DispatchResult {
        let mut last = DispatchResult::clean();
        for key in parse_keys(keys) {
            last = self.key(key);
        }
        last
    }

    /// Run `;text<CR>` from Navigation.
    pub fn command(&mut self, text: &str) -> DispatchResult {
        self.keys(";");
        for ch in text.chars() {
            self.key(KeyEvent::from(ch));
        }
        self.key(KeyEvent::from(KeyCode::Enter))
    }

    pub fn cursor(&self) -> Cursor {
        self.session.active().cursor
    }

    pub fn lines(&self) -> Vec<String> {
        self.session.active().document.lines()
    }

    pub fn message(&self) -> Option<&str> {
        self.session.message.as_ref().map(|m| m.text.as_str())
    }

    pub fn frame(&self) -> Frame {
        render(&self.session, &RenderContext::default())
    }

    /// Text of the rendered status bar row.
    pub fn status_line(&self) -> String {
        self.frame().row_text(self.session.layout().status_row)
    }
}

pub fn parse_keys(keys: &str) -> Vec<KeyEvent> {
    let mut out = Vec::new();
    let mut rest = keys;
    while let Some(ch) = rest.chars().next() {
        if ch == '<'
            && let Some(end) = rest.find('>')
            && end > 1
        {
            out.push(named_key(&rest[1..end]));
            rest = &rest[end + 1..];
            continue;
        }
        out.push(KeyEvent::from(ch));
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn named_key(name: &str) -> KeyEvent {
    if let Some(c) = name.strip_prefix("C-").and_then(|s| s.chars().next()) {
        return KeyEvent::ctrl(c);
    }
    let code = match name {
        "Esc" => KeyCode::Esc,
        "CR" => KeyCode::Enter,
        "BS" => KeyCode::Backspace,
        "Del" => KeyCode::Delete,
        "Tab" => KeyCode::Tab,
        "S-Tab" => KeyCode::BackTab,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        other => panic!("unknown key name <{other}>"),
    };
    KeyEvent::from(code)
}

/// `count` lines named `line 1` .. `line count`.
pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
