use chrono::NaiveDate;

use crate::models::{RecordDraft, Reimbursed};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum FormField {
    #[default]
    Date,
    Item,
    Amount,
    Reimbursed,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[Self::Date, Self::Item, Self::Amount, Self::Reimbursed]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date (YYYY-MM-DD)",
            Self::Item => "Item",
            Self::Amount => "Amount",
            Self::Reimbursed => "Reimbursed",
        }
    }

    fn index(self) -> usize {
        Self::all().iter().position(|f| *f == self).unwrap_or(0)
    }

    pub(crate) fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Entry form for a new record: three free-text inputs and a Yes/No choice.
#[derive(Debug, Clone, Default)]
pub(crate) struct Form {
    pub(crate) date: String,
    pub(crate) item: String,
    pub(crate) amount: String,
    pub(crate) reimbursed: Reimbursed,
    pub(crate) focus: FormField,
}

impl Form {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Text of a free-text field; `None` for the reimbursed choice.
    pub(crate) fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Date => Some(&self.date),
            FormField::Item => Some(&self.item),
            FormField::Amount => Some(&self.amount),
            FormField::Reimbursed => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Date => Some(&mut self.date),
            FormField::Item => Some(&mut self.item),
            FormField::Amount => Some(&mut self.amount),
            FormField::Reimbursed => None,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type a character into the focused field. On the reimbursed choice,
    /// `y`/`n` select and space toggles; other characters are ignored.
    pub(crate) fn push_char(&mut self, c: char) {
        match self.focused_text_mut() {
            Some(text) => text.push(c),
            None => match c {
                'y' | 'Y' => self.reimbursed = Reimbursed::Yes,
                'n' | 'N' => self.reimbursed = Reimbursed::No,
                ' ' => self.toggle_reimbursed(),
                _ => {}
            },
        }
    }

    pub(crate) fn pop_char(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    pub(crate) fn toggle_reimbursed(&mut self) {
        self.reimbursed = self.reimbursed.toggle();
    }

    pub(crate) fn fill_date(&mut self, date: NaiveDate) {
        self.date = date.format("%Y-%m-%d").to_string();
    }

    pub(crate) fn draft(&self) -> RecordDraft {
        RecordDraft::new(
            self.date.as_str(),
            self.item.as_str(),
            self.amount.as_str(),
            self.reimbursed.as_str(),
        )
    }

    /// Empty every input and reset the choice to `No`; focus returns to the date.
    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.date.is_empty() && self.item.is_empty() && self.amount.is_empty()
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
