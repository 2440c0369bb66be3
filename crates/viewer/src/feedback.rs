/// Progress line shown to the user while content loads.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    text: String,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the progress text and log it.
    pub fn report(&mut self, text: impl Into<String>) {
        self.text = text.into();
        tracing::info!("Progress: {}", self.text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
