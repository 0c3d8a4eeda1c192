use async_trait::async_trait;

use crate::error::AppResult;

/// One line of input to read from the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRequest {
    pub label: String,
    pub default_value: Option<String>,
    pub suggestions: Vec<String>,
}

impl LineRequest {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, default_value: Option<&str>) -> Self {
        self.default_value = default_value
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_suggestions(mut self, suggestions: &[String]) -> Self {
        self.suggestions = suggestions.to_vec();
        self
    }

    pub fn prompt_text(&self) -> String {
        match &self.default_value {
            Some(value) => format!("{} [{value}]: ", self.label),
            None => format!("{}: ", self.label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Info,
    Success,
    Warning,
    Detail,
    Plain,
}

#[async_trait]
pub trait ConsoleService: Send + Sync {
    /// Blocks until the operator submits a line; returns it untrimmed.
    async fn read_line(&self, request: LineRequest) -> AppResult<String>;

    fn say(&self, tone: Tone, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_text_shows_default() {
        let request = LineRequest::new("Pull request label").with_default(Some("fix/ABC-1"));
        assert_eq!(request.prompt_text(), "Pull request label [fix/ABC-1]: ");
    }

    #[test]
    fn empty_default_is_hidden() {
        let request = LineRequest::new("Work remaining").with_default(Some(""));
        assert_eq!(request.default_value, None);
        assert_eq!(request.prompt_text(), "Work remaining: ");
    }
}
