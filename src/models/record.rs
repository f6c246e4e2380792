use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use super::Reimbursed;

/// Upper bound for a single amount. Keeps any realistic sum of records far from
/// `Decimal::MAX`.
const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Characters that would break the one-record-per-line, comma-separated layout.
const FORBIDDEN_CHARS: &[char] = &[',', '\n', '\r'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Item,
    Amount,
    Reimbursed,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Item => "item",
            Self::Amount => "amount",
            Self::Reimbursed => "reimbursed",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a draft or a stored line is not a valid record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("{0} is required")]
    MissingField(Field),
    #[error("amount must be a valid number, got '{0}'")]
    InvalidAmount(String),
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("amount must not exceed 1,000,000,000,000, got {0}")]
    AmountTooLarge(Decimal),
    #[error("reimbursed must be Yes or No, got '{0}'")]
    InvalidReimbursed(String),
    #[error("{field} must not contain {ch:?}")]
    ForbiddenCharacter { field: Field, ch: char },
    #[error("expected 4 comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// One prepaid-expense entry. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date: String,
    pub item: String,
    /// Always positive, held at two decimal places.
    pub amount: Decimal,
    pub reimbursed: Reimbursed,
}

impl Record {
    /// Render the record as its newline-terminated file line.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{:.2},{}\n",
            self.date, self.item, self.amount, self.reimbursed
        )
    }

    /// Parse one stored line (without its terminator).
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split(',').collect();
        let [date, item, amount, reimbursed] = fields.as_slice() else {
            return Err(RecordError::FieldCount(fields.len()));
        };
        RecordDraft::new(*date, *item, *amount, *reimbursed).validate()
    }

    pub fn is_reimbursed(&self) -> bool {
        self.reimbursed.is_yes()
    }
}

/// Raw, unvalidated field values as typed into the form or passed on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub date: String,
    pub item: String,
    pub amount: String,
    pub reimbursed: String,
}

impl RecordDraft {
    pub fn new(
        date: impl Into<String>,
        item: impl Into<String>,
        amount: impl Into<String>,
        reimbursed: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            item: item.into(),
            amount: amount.into(),
            reimbursed: reimbursed.into(),
        }
    }

    /// Check every field and build the record that would be written.
    ///
    /// Fields are trimmed first. Presence is checked before content so an empty
    /// form reports the first missing field rather than a parse failure.
    pub fn validate(&self) -> Result<Record, RecordError> {
        let date = self.date.trim();
        let item = self.item.trim();
        let amount = self.amount.trim();
        let reimbursed = self.reimbursed.trim();

        let fields = [
            (Field::Date, date),
            (Field::Item, item),
            (Field::Amount, amount),
            (Field::Reimbursed, reimbursed),
        ];

        for (field, value) in fields {
            if value.is_empty() {
                return Err(RecordError::MissingField(field));
            }
        }

        for (field, value) in fields {
            if let Some(ch) = value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
                return Err(RecordError::ForbiddenCharacter { field, ch });
            }
        }

        let amount = parse_amount(amount)?;
        let reimbursed = Reimbursed::parse(reimbursed)?;

        Ok(Record {
            date: date.to_string(),
            item: item.to_string(),
            amount,
            reimbursed,
        })
    }
}

/// Parse a positive amount and round it to cents.
///
/// Amounts that round to zero are rejected, since they would be stored as `0.00`.
/// Amounts above [`MAX_AMOUNT`] are rejected so totals cannot overflow.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, RecordError> {
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| RecordError::InvalidAmount(raw.to_string()))?;
    let rounded = value.round_dp(2);
    if rounded <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount(value));
    }
    if rounded > Decimal::new(MAX_AMOUNT, 0) {
        return Err(RecordError::AmountTooLarge(value));
    }
    Ok(rounded)
}

/// Sum of all amounts.
pub fn total<'a>(records: impl IntoIterator<Item = &'a Record>) -> Decimal {
    records
        .into_iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount))
}

/// Sum of amounts not yet paid back.
pub fn outstanding<'a>(records: impl IntoIterator<Item = &'a Record>) -> Decimal {
    records
        .into_iter()
        .filter(|r| !r.is_reimbursed())
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount))
}
