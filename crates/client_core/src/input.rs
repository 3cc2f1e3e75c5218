//! Draft buffer and the commit-key contract.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn shifted(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::SHIFT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Edited,
    /// Carries the trimmed draft at the moment Enter was pressed.
    Submit(String),
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Plain Enter asks for submission and leaves the text untouched; Enter
    /// with any modifier inserts a line break instead.
    pub fn apply(&mut self, press: KeyPress) -> KeyAction {
        match press.key {
            Key::Enter if press.modifiers.any() => {
                self.text.push('\n');
                KeyAction::Edited
            }
            Key::Enter => KeyAction::Submit(self.trimmed().to_string()),
            Key::Char(c) => {
                self.text.push(c);
                KeyAction::Edited
            }
            Key::Backspace => match self.text.pop() {
                Some(_) => KeyAction::Edited,
                None => KeyAction::Ignored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(buffer: &mut InputBuffer, text: &str) {
        for c in text.chars() {
            buffer.apply(KeyPress::plain(Key::Char(c)));
        }
    }

    #[test]
    fn plain_enter_requests_submit_without_editing() {
        let mut buffer = InputBuffer::default();
        type_str(&mut buffer, "hello");
        type_str(&mut buffer, " ");
        assert_eq!(
            buffer.apply(KeyPress::plain(Key::Enter)),
            KeyAction::Submit("hello".into())
        );
        assert_eq!(buffer.text(), "hello ");
    }

    #[test]
    fn modified_enter_inserts_line_break() {
        let mut buffer = InputBuffer::default();
        type_str(&mut buffer, "line one");
        assert_eq!(buffer.apply(KeyPress::shifted(Key::Enter)), KeyAction::Edited);
        type_str(&mut buffer, "line two");
        assert_eq!(buffer.text(), "line one\nline two");

        let ctrl_enter = KeyPress {
            key: Key::Enter,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        };
        assert_eq!(buffer.apply(ctrl_enter), KeyAction::Edited);
        assert!(buffer.text().ends_with('\n'));
    }

    #[test]
    fn backspace_on_empty_buffer_is_ignored() {
        let mut buffer = InputBuffer::default();
        assert_eq!(buffer.apply(KeyPress::plain(Key::Backspace)), KeyAction::Ignored);
        type_str(&mut buffer, "ab");
        assert_eq!(buffer.apply(KeyPress::plain(Key::Backspace)), KeyAction::Edited);
        assert_eq!(buffer.text(), "a");
    }
}
