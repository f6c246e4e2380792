use super::RecordError;

/// Whether a prepaid amount has been paid back to the payer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reimbursed {
    Yes,
    #[default]
    No,
}

impl Reimbursed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Parse the on-disk token. Only the exact strings `Yes` and `No` are accepted.
    pub fn parse(s: &str) -> Result<Self, RecordError> {
        match s {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            other => Err(RecordError::InvalidReimbursed(other.to_string())),
        }
    }

    pub fn all() -> &'static [Reimbursed] {
        &[Self::Yes, Self::No]
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl std::fmt::Display for Reimbursed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
