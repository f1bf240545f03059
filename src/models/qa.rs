use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of items a generated quiz always carries.
pub const QUIZ_ITEM_COUNT: usize = 10;

/// Three excerpts of the source article, each one enclosing the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QaContext {
    pub context_large: String,
    pub context_medium: String,
    pub context_small: String,
}

impl QaContext {
    /// `small ⊆ medium ⊆ large`, compared as raw substrings.
    pub fn is_nested(&self) -> bool {
        self.context_medium.contains(&self.context_small)
            && self.context_large.contains(&self.context_medium)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    #[validate(nested)]
    pub context: QaContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QaList {
    #[validate(nested)]
    pub items: Vec<QaRecord>,
}
