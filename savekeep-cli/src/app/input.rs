/// Single-line text field
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    placeholder: String,
    /// Cursor position in chars
    cursor: usize,
}

impl TextInput {
    /// Clear the value and set a new placeholder
    pub fn reset(&mut self, placeholder: &str) {
        self.value.clear();
        self.cursor = 0;
        self.placeholder = placeholder.to_string();
    }

    /// Replace the value, cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}
