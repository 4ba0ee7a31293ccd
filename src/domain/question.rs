use serde::Deserialize;

/// Subject labels offered on the reply keyboard, two per row.
pub const MENU: [[&str; 2]; 3] = [
    ["Polity", "Economy"],
    ["History", "Geography"],
    ["Science & Tech", "Environment"],
];

/// Dataset columns a question file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Subject", "Year", "Question Text"];

/// A tagged exam question.
///
/// Records are immutable once loaded. `subject` is the category key used for
/// exact-match lookups; it is not checked against [`MENU`].
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct QuestionRecord {
    #[serde(rename = "Year")]
    pub year: u16,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Question Text")]
    pub text: String,
}

impl QuestionRecord {
    pub fn new(year: u16, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            year,
            subject: subject.into(),
            text: text.into(),
        }
    }
}
