use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error payload a laptops backend may return alongside a
/// non-success status. ASP.NET style problem details put the summary in
/// `title`; most other backends use `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ServerErrorBody {
    /// Parses a response body, yielding `None` when it is not a JSON object
    /// carrying a string `message` or `title`.
    pub fn parse(body: &str) -> Option<Self> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        if parsed.message().is_none() && parsed.title().is_none() {
            return None;
        }
        Some(parsed)
    }

    pub fn message(&self) -> Option<&str> {
        non_empty(self.message.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Local form validation failures; these never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Brand and Model are required fields")]
    MissingRequired,
}
