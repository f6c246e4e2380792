use rust_decimal::Decimal;

use super::form::Form;
use super::util::{clamp_scroll, format_amount, max_scroll, page_down, page_up};
use crate::models::Record;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Status {
    pub(crate) kind: StatusKind,
    pub(crate) text: String,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) show_help: bool,
    pub(crate) status: Option<Status>,
    pub(crate) data_path: String,

    // Form
    pub(crate) form: Form,

    // Table
    pub(crate) records: Vec<Record>,
    pub(crate) table_scroll: usize,
    pub(crate) skipped_lines: usize,

    // Totals
    pub(crate) total: Decimal,
    pub(crate) outstanding: Decimal,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(store: &RecordStore) -> Self {
        Self {
            running: true,
            show_help: false,
            status: None,
            data_path: store.path().display().to_string(),

            form: Form::new(),

            records: Vec::new(),
            table_scroll: 0,
            skipped_lines: 0,

            total: Decimal::ZERO,
            outstanding: Decimal::ZERO,

            visible_rows: 20,
        }
    }

    /// Reload from disk and rebuild the table and totals.
    ///
    /// On failure the displayed records stay as they were.
    pub(crate) fn refresh(&mut self, store: &mut RecordStore) -> Result<(), StoreError> {
        store.load()?;
        self.records = store.records().to_vec();
        self.skipped_lines = store.skipped().len();
        self.total = store.total();
        self.outstanding = store.outstanding();
        clamp_scroll(&mut self.table_scroll, self.records.len(), self.visible_rows);
        Ok(())
    }

    /// Initial load at startup. Problems are reported in the status bar, never fatal.
    pub(crate) fn startup(&mut self, store: &mut RecordStore) {
        match self.refresh(store) {
            Ok(()) if self.skipped_lines > 0 => self.set_error(format!(
                "Skipped {} malformed line(s) in {}",
                self.skipped_lines, self.data_path
            )),
            Ok(()) => self.set_info(format!(
                "Loaded {} record(s) from {}",
                self.records.len(),
                self.data_path
            )),
            Err(e) => self.set_error(format!("Could not load records: {e}")),
        }
    }

    /// Hand the form contents to the store.
    ///
    /// On success the form is cleared, the records are reloaded and the table
    /// jumps to the newest entry. On failure the form and table are untouched.
    pub(crate) fn submit(&mut self, store: &mut RecordStore) {
        let record = match store.append(&self.form.draft()) {
            Ok(record) => record,
            Err(e) => {
                self.set_error(format!("Could not add record: {e}"));
                return;
            }
        };

        self.form.clear();
        if let Err(e) = self.refresh(store) {
            self.set_error(format!("Record saved, but reloading failed: {e}"));
            return;
        }
        self.scroll_to_bottom();
        self.set_success(format!(
            "Added {} {} ({})",
            record.date,
            record.item,
            format_amount(record.amount)
        ));
    }

    pub(crate) fn page_down(&mut self) {
        page_down(&mut self.table_scroll, self.records.len(), self.visible_rows);
    }

    pub(crate) fn page_up(&mut self) {
        page_up(&mut self.table_scroll, self.visible_rows);
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.table_scroll = 0;
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.table_scroll = max_scroll(self.records.len(), self.visible_rows);
    }

    pub(crate) fn set_info(&mut self, msg: impl Into<String>) {
        self.set_status(StatusKind::Info, msg);
    }

    pub(crate) fn set_success(&mut self, msg: impl Into<String>) {
        self.set_status(StatusKind::Success, msg);
    }

    pub(crate) fn set_error(&mut self, msg: impl Into<String>) {
        self.set_status(StatusKind::Error, msg);
    }

    fn set_status(&mut self, kind: StatusKind, msg: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: msg.into(),
        });
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
