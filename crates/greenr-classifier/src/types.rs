use greenr_core::SentimentLabel;
use serde::Serialize;

/// Result of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    /// Id of the model that produced the label.
    pub model_id: String,
    pub label: SentimentLabel,
}

impl Prediction {
    /// User-facing rendering, e.g. `Sentiment: -1 (Anti)`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("Sentiment: {} ({})", self.label.value(), self.label.name())
    }
}
