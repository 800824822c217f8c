use async_trait::async_trait;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};
use tokio::task::spawn_blocking;
use tracing::trace;

use cb_core::ports::{ClipboardReadError, ClipboardReaderPort};

/// Reads text from the system clipboard through `clipboard-rs`.
///
/// A fresh clipboard context is opened for every read on the blocking pool.
/// The context is not `Send` on every platform, so it never crosses an
/// await point.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboardReader;

impl SystemClipboardReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardReaderPort for SystemClipboardReader {
    async fn read_text(&self) -> Result<String, ClipboardReadError> {
        spawn_blocking(read_text_blocking)
            .await
            .map_err(|e| ClipboardReadError::Read(format!("clipboard task failed: {e}")))?
    }
}

fn read_text_blocking() -> Result<String, ClipboardReadError> {
    let ctx = ClipboardContext::new().map_err(|e| ClipboardReadError::Unavailable(e.to_string()))?;

    if !ctx.has(ContentFormat::Text) {
        trace!("Clipboard holds no text");
        return Ok(String::new());
    }

    ctx.get_text()
        .map_err(|e| ClipboardReadError::Read(e.to_string()))
}
