//! Server-sent event framing.
//!
//! [`SseDecoder`] turns arbitrarily split byte chunks into complete
//! `event:`/`data:` frames. [`SseEventStream`] adapts a byte stream (for
//! example `reqwest::Response::bytes_stream`) into a stream of [`SseEvent`].

use bytes::Bytes;
use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::YellowcakeError;

/// Event name used when a frame carries no `event:` line.
pub const DEFAULT_EVENT: &str = "message";

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
            id: None,
        }
    }

    /// Wire form: `event: <type>\ndata: <line>\n...\n\n`.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str("id: ");
            out.push_str(id);
            out.push('\n');
        }
        out.push_str("event: ");
        out.push_str(&self.event);
        out.push('\n');
        for line in self.data.split('\n') {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

/// Incremental frame decoder.
///
/// Carriage returns are dropped on input, so CRLF and LF framing both work.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns every frame completed by them.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>, YellowcakeError> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(pos) = find_frame_end(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            if let Some(event) = parse_frame(&frame[..pos])? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Flush a trailing frame that was not terminated by a blank line.
    pub fn finish(&mut self) -> Result<Option<SseEvent>, YellowcakeError> {
        let rest = std::mem::take(&mut self.buffer);
        if rest.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(None);
        }
        parse_frame(&rest)
    }
}

fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn parse_frame(frame: &[u8]) -> Result<Option<SseEvent>, YellowcakeError> {
    let text = std::str::from_utf8(frame)
        .map_err(|e| YellowcakeError::Parse(format!("Invalid UTF-8 in stream: {}", e)))?;

    let mut event: Option<String> = None;
    let mut data: Vec<&str> = Vec::new();
    let mut id: Option<String> = None;

    for line in text.split('\n') {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            "id" => id = Some(value.to_string()),
            // retry and unknown fields
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(SseEvent {
        event: event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
        data: data.join("\n"),
        id,
    }))
}

/// Stream adapter from raw bytes to [`SseEvent`] values.
pub struct SseEventStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, YellowcakeError>> + Send>>,
    decoder: SseDecoder,
    pending: std::collections::VecDeque<SseEvent>,
    finished: bool,
}

impl SseEventStream {
    pub fn new(
        byte_stream: impl Stream<Item = Result<Bytes, YellowcakeError>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            decoder: SseDecoder::new(),
            pending: Default::default(),
            finished: false,
        }
    }
}

impl Stream for SseEventStream {
    type Item = Result<SseEvent, YellowcakeError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            if this.finished {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => match this.decoder.push(&bytes) {
                    Ok(events) => this.pending.extend(events),
                    Err(e) => return Poll::Ready(Some(Err(e))),
                },
                Poll::Ready(Some(Err(e))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    match this.decoder.finish() {
                        Ok(Some(event)) => return Poll::Ready(Some(Ok(event))),
                        Ok(None) => return Poll::Ready(None),
                        Err(e) => return Poll::Ready(Some(Err(e))),
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn chunks(parts: &[&str]) -> Vec<Result<Bytes, YellowcakeError>> {
        parts
            .iter()
            .map(|p| Ok(Bytes::from(p.to_string())))
            .collect()
    }

    #[test]
    fn test_decodes_typed_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder
            .push(b"event: chunk\ndata: {\"name\":\"Nagi\"}\n\n")
            .unwrap();

        assert_eq!(events, vec![SseEvent::new("chunk", r#"{"name":"Nagi"}"#)]);
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut decoder = SseDecoder::new();

        assert!(decoder.push(b"event: chu").unwrap().is_empty());
        assert!(decoder.push(b"nk\ndata: {\"a\":").unwrap().is_empty());
        let events = decoder.push(b"1}\n\nevent: progress\n").unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, r#"{"a":1}"#);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let bytes = "data: café\n\n".as_bytes();
        let split = bytes.len() - 3;
        let mut decoder = SseDecoder::new();

        assert!(decoder.push(&bytes[..split]).unwrap().is_empty());
        let events = decoder.push(&bytes[split..]).unwrap();

        assert_eq!(events[0].data, "café");
        assert_eq!(events[0].event, DEFAULT_EVENT);
    }

    #[test]
    fn test_crlf_comments_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let events = decoder
            .push(b": keepalive\r\n\r\nid: 7\r\nevent: chunk\r\ndata: a\r\ndata: b\r\n\r\n")
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "a\nb");
        assert_eq!(events[0].id.as_deref(), Some("7"));
    }

    #[test]
    fn test_finish_flushes_unterminated_frame() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: done\ndata: {}").unwrap().is_empty());

        let last = decoder.finish().unwrap().unwrap();
        assert_eq!(last.event, "done");
        assert!(decoder.finish().unwrap().is_none());
    }

    #[test]
    fn test_encode_decodes_back() {
        let event = SseEvent::new("error", "line1\nline2");
        let mut decoder = SseDecoder::new();

        let decoded = decoder.push(event.encode().as_bytes()).unwrap();
        assert_eq!(decoded, vec![event]);
    }

    #[tokio::test]
    async fn test_event_stream_yields_all_events() {
        let source = futures::stream::iter(chunks(&[
            "event: progress\ndata: 10\n\nevent: chunk\n",
            "data: {\"name\":\"A\"}\n\nevent: chunk\ndata: {\"name\":\"B\"}\n\n",
        ]));
        let events: Vec<_> = SseEventStream::new(source)
            .map(|e| e.unwrap().event)
            .collect()
            .await;

        assert_eq!(events, vec!["progress", "chunk", "chunk"]);
    }

    #[tokio::test]
    async fn test_event_stream_surfaces_transport_error_then_ends() {
        let source = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"event: chunk\ndata: {}\n\n")),
            Err(YellowcakeError::Http("reset".into())),
        ]);
        let mut stream = SseEventStream::new(source);

        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await,
            Some(Err(YellowcakeError::Http(_)))
        ));
        assert!(stream.next().await.is_none());
    }
}
