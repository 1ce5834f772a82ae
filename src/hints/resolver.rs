use super::labels::normalize;

/// One keystroke forwarded by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Cancel,
    ToggleMode,
}

impl KeyInput {
    /// Map a DOM `KeyboardEvent.key` value. Named keys other than Escape
    /// and Tab are not hint input.
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(KeyInput::Cancel),
            "Tab" => Some(KeyInput::ToggleMode),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => Some(KeyInput::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Typed prefix still matches at least one label.
    Pending,
    /// Typed text equals the label at this index.
    Activate(usize),
    /// Nothing starts with the typed text; the buffer was cleared.
    DeadEnd,
    Cancel,
    ToggleMode,
}

/// Prefix matcher over the labels of the current scan.
#[derive(Debug, Default)]
pub struct InputResolver {
    buffer: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Control inputs are handled first and never touch the buffer.
    pub fn handle<'a, I>(&mut self, input: KeyInput, labels: I) -> Resolution
    where
        I: IntoIterator<Item = &'a str>,
    {
        match input {
            KeyInput::Cancel => Resolution::Cancel,
            KeyInput::ToggleMode => Resolution::ToggleMode,
            KeyInput::Char(c) => self.feed(c, labels),
        }
    }

    fn feed<'a, I>(&mut self, c: char, labels: I) -> Resolution
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut typed = self.buffer.clone();
        typed.push(normalize(c));

        let mut has_prefix_match = false;
        for (index, label) in labels.into_iter().enumerate() {
            if label == typed {
                self.buffer.clear();
                return Resolution::Activate(index);
            }
            if !label.is_empty() && label.starts_with(typed.as_str()) {
                has_prefix_match = true;
            }
        }

        if has_prefix_match {
            self.buffer = typed;
            Resolution::Pending
        } else {
            self.buffer.clear();
            Resolution::DeadEnd
        }
    }
}
