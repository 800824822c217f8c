//! JSON-lines port transport.
//!
//! Carries port messages over a pair of byte streams, one JSON object per
//! line in each direction:
//!
//! ```text
//! -> {"tag":"AskForClipBoard"}
//! <- {"tag":"GotClipboard","data":"hello"}
//! ```

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use cb_core::{InboundMessage, OutboundMessage};

use crate::adapters::BusEndpoints;

/// Largest inbound frame accepted, newline excluded.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 1024 * 1024;

pub struct JsonLinesTransport<R, W> {
    reader: R,
    writer: W,
    max_frame_bytes: usize,
}

impl<R, W> JsonLinesTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }

    /// Frames longer than `max` bytes are discarded up to their newline.
    pub fn with_max_frame_bytes(mut self, max: usize) -> Self {
        self.max_frame_bytes = max.max(1);
        self
    }

    /// Pump both directions until they are done.
    ///
    /// The inbound side ends at end of input, which closes the bridge's
    /// inbound stream. The outbound side ends once every bus sender is
    /// dropped. Blank input lines are skipped. Lines that are not UTF-8, not
    /// a JSON message, or longer than the frame limit are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from either stream.
    pub async fn run(self, endpoints: BusEndpoints) -> io::Result<()> {
        let BusEndpoints {
            inbound_tx,
            outbound_rx,
        } = endpoints;

        tokio::try_join!(
            pump_inbound(self.reader, inbound_tx, self.max_frame_bytes),
            pump_outbound(self.writer, outbound_rx),
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum FrameRead {
    Complete,
    Oversized(usize),
    Eof,
}

/// Read one newline-terminated frame into `frame`, never holding more than
/// `max` bytes of it.
async fn read_frame<R>(reader: &mut R, frame: &mut Vec<u8>, max: usize) -> io::Result<FrameRead>
where
    R: AsyncBufRead + Unpin,
{
    frame.clear();
    let mut discarded: Option<usize> = None;
    let mut seen_any = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match discarded {
                Some(len) => FrameRead::Oversized(len),
                None if seen_any => FrameRead::Complete,
                None => FrameRead::Eof,
            });
        }
        seen_any = true;

        let newline = available.iter().position(|&b| b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];
        let used = chunk.len() + usize::from(newline.is_some());

        match discarded.as_mut() {
            Some(len) => *len += chunk.len(),
            None if frame.len() + chunk.len() > max => {
                discarded = Some(frame.len() + chunk.len());
                frame.clear();
            }
            None => frame.extend_from_slice(chunk),
        }
        reader.consume(used);

        if newline.is_some() {
            return Ok(match discarded {
                Some(len) => FrameRead::Oversized(len),
                None => FrameRead::Complete,
            });
        }
    }
}

async fn pump_inbound<R>(
    reader: R,
    inbound_tx: mpsc::Sender<InboundMessage>,
    max_frame_bytes: usize,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut frame = Vec::new();

    loop {
        match read_frame(&mut reader, &mut frame, max_frame_bytes).await? {
            FrameRead::Eof => break,
            FrameRead::Oversized(len) => {
                warn!(len, max = max_frame_bytes, "Skipping oversized inbound frame");
                continue;
            }
            FrameRead::Complete => {}
        }

        let text = match std::str::from_utf8(&frame) {
            Ok(text) => text.trim(),
            Err(err) => {
                warn!(error = %err, "Skipping non-UTF-8 inbound frame");
                continue;
            }
        };
        if text.is_empty() {
            continue;
        }

        let message = match serde_json::from_str::<InboundMessage>(text) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "Skipping malformed inbound frame");
                continue;
            }
        };

        trace!(tag = message.tag(), "Inbound frame decoded");
        if inbound_tx.send(message).await.is_err() {
            debug!("Inbound subscriber gone, stop reading");
            return Ok(());
        }
    }

    debug!("Inbound stream reached end of input");
    Ok(())
}

async fn pump_outbound<W>(
    mut writer: W,
    mut outbound_rx: mpsc::Receiver<OutboundMessage>,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = outbound_rx.recv().await {
        let mut frame = serde_json::to_vec(&message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        frame.push(b'\n');

        writer.write_all(&frame).await?;
        writer.flush().await?;
        trace!(tag = message.tag(), "Outbound frame written");
    }

    writer.shutdown().await?;
    debug!("Outbound stream closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryMessageBus;
    use cb_core::ports::MessageBusPort;
    use tokio::io::{duplex, AsyncReadExt};
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn inbound_frames_are_decoded_in_order() {
        let (bus, endpoints) = InMemoryMessageBus::new(8);
        let mut inbound = bus.subscribe().expect("subscribe");

        let input: &[u8] = b"{\"tag\":\"AskForClipBoard\"}\n\n   \nnot json\n{\"tag\":\"Other\",\"data\":1}\n";
        let (_output_peer, output) = duplex(256);
        let transport = JsonLinesTransport::new(input, output);
        let task = tokio::spawn(transport.run(endpoints));

        assert_eq!(inbound.recv().await, Some(InboundMessage::AskForClipBoard));
        assert_eq!(inbound.recv().await, Some(InboundMessage::Unknown));
        assert_eq!(inbound.recv().await, None);

        drop(bus);
        timeout(Duration::from_millis(200), task)
            .await
            .expect("transport finishes")
            .expect("transport task")
            .expect("transport io");
    }

    #[tokio::test]
    async fn non_utf8_line_is_skipped_and_reading_continues() {
        let (bus, endpoints) = InMemoryMessageBus::new(8);
        let mut inbound = bus.subscribe().expect("subscribe");

        let input: &[u8] = b"\xff\xfe garbage\n{\"tag\":\"AskForClipBoard\"}\n";
        let (_output_peer, output) = duplex(256);
        let task = tokio::spawn(JsonLinesTransport::new(input, output).run(endpoints));

        assert_eq!(inbound.recv().await, Some(InboundMessage::AskForClipBoard));
        assert_eq!(inbound.recv().await, None);

        drop(bus);
        timeout(Duration::from_millis(200), task)
            .await
            .expect("transport finishes")
            .expect("transport task")
            .expect("non-UTF-8 input is not an I/O error");
    }

    #[tokio::test]
    async fn oversized_frame_is_discarded_up_to_its_newline() {
        let (bus, endpoints) = InMemoryMessageBus::new(8);
        let mut inbound = bus.subscribe().expect("subscribe");

        // Longer than the reader's buffer, so the frame spans several fills.
        let mut input = vec![b'x'; 20_000];
        input.extend_from_slice(b"\n{\"tag\":\"AskForClipBoard\"}\n");
        let (_output_peer, output) = duplex(256);
        let transport = JsonLinesTransport::new(std::io::Cursor::new(input), output)
            .with_max_frame_bytes(64);
        let task = tokio::spawn(transport.run(endpoints));

        assert_eq!(inbound.recv().await, Some(InboundMessage::AskForClipBoard));
        assert_eq!(inbound.recv().await, None);

        drop(bus);
        timeout(Duration::from_millis(200), task)
            .await
            .expect("transport finishes")
            .expect("transport task")
            .expect("transport io");
    }

    #[tokio::test]
    async fn read_frame_reports_each_outcome() {
        let mut reader = BufReader::new(&b"short\nmuch too long\nlast"[..]);
        let mut frame = Vec::new();

        assert_eq!(
            read_frame(&mut reader, &mut frame, 8).await.expect("io"),
            FrameRead::Complete
        );
        assert_eq!(frame, b"short");

        assert_eq!(
            read_frame(&mut reader, &mut frame, 8).await.expect("io"),
            FrameRead::Oversized(13)
        );
        assert!(frame.is_empty());

        assert_eq!(
            read_frame(&mut reader, &mut frame, 8).await.expect("io"),
            FrameRead::Complete
        );
        assert_eq!(frame, b"last");

        assert_eq!(
            read_frame(&mut reader, &mut frame, 8).await.expect("io"),
            FrameRead::Eof
        );
    }

    #[tokio::test]
    async fn outbound_messages_are_written_one_per_line() {
        let (bus, endpoints) = InMemoryMessageBus::new(8);

        let (mut output_peer, output) = duplex(1024);
        let transport = JsonLinesTransport::new(tokio::io::empty(), output);
        let task = tokio::spawn(transport.run(endpoints));

        bus.send(OutboundMessage::GotClipboard("first".into()))
            .await
            .expect("send first");
        bus.send(OutboundMessage::GotClipboard("multi\nline".into()))
            .await
            .expect("send second");
        drop(bus);

        timeout(Duration::from_millis(200), task)
            .await
            .expect("transport finishes")
            .expect("transport task")
            .expect("transport io");

        let mut written = String::new();
        output_peer
            .read_to_string(&mut written)
            .await
            .expect("read output");

        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"tag":"GotClipboard","data":"first"}"#,
                r#"{"tag":"GotClipboard","data":"multi\nline"}"#,
            ]
        );
    }
}
