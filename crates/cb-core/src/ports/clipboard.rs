use async_trait::async_trait;

/// Read access to the host clipboard.
#[async_trait]
pub trait ClipboardReaderPort: Send + Sync {
    /// Read the current clipboard content as text.
    ///
    /// An empty clipboard, or one holding no text, reads as `""`.
    /// The call may suspend until the host answers. Implementations must not
    /// block the async runtime.
    async fn read_text(&self) -> Result<String, ClipboardReadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardReadError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard read failed: {0}")]
    Read(String),
}
