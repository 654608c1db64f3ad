/// Hard cap on special instructions, counted in characters.
pub const MAX_INSTRUCTION_CHARS: usize = 1000;
const WARNING_THRESHOLD: usize = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTone {
    Normal,
    Warning,
    Limit,
}

/// Free-text recruiter instructions with a live character counter.
#[derive(Debug, Clone, Default)]
pub struct InstructionsField {
    value: String,
}

impl InstructionsField {
    /// Replaces the text, keeping at most the first 1000 characters.
    pub fn set(&mut self, text: &str) {
        self.value = truncate_instructions(text).to_string();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn counter_label(&self) -> String {
        format!("{} / {MAX_INSTRUCTION_CHARS}", self.len())
    }

    pub fn counter_tone(&self) -> CounterTone {
        match self.len() {
            n if n >= MAX_INSTRUCTION_CHARS => CounterTone::Limit,
            n if n > WARNING_THRESHOLD => CounterTone::Warning,
            _ => CounterTone::Normal,
        }
    }
}

pub fn truncate_instructions(text: &str) -> &str {
    match text.char_indices().nth(MAX_INSTRUCTION_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
