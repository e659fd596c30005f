use serde::{Deserialize, Serialize};

/// A display-ready card for one schedule slot.
///
/// `lines` holds zero, one or two descriptive lines; omitted lines are absent
/// rather than empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRecord {
    pub title: String,
    pub lines: Vec<String>,
}
