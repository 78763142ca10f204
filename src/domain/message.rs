/// Text-bearing parts of one incoming chat message, already decoded by the
/// transport layer.
#[derive(Debug, Clone, Default)]
pub struct MessagePayload {
    pub raw_text: String,
    pub caption: Option<String>,
    pub sender_id: i64,
    pub sender_handle: String,
    pub forwarded_sender_name: Option<String>,
    pub forwarded_sender_handle: Option<String>,
}

impl MessagePayload {
    pub fn new(sender_id: i64, sender_handle: impl Into<String>) -> Self {
        Self {
            sender_id,
            sender_handle: sender_handle.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = text.into();
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_forwarded_sender(
        mut self,
        name: Option<String>,
        handle: Option<String>,
    ) -> Self {
        self.forwarded_sender_name = name;
        self.forwarded_sender_handle = handle;
        self
    }

    /// Joins every non-empty text source with a single space, keeping the
    /// original casing and punctuation.
    pub fn combined_text(&self) -> String {
        let parts = [
            Some(self.raw_text.as_str()),
            self.caption.as_deref(),
            self.forwarded_sender_name.as_deref(),
            self.forwarded_sender_handle.as_deref(),
        ];
        parts
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
