//! `text/event-stream` decoding.

use std::collections::VecDeque;

use serde::de::Error as _;

use crate::error::RequestError;

/// Longest line accepted before the stream is treated as broken.
pub(crate) const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// One event received on a `text/event-stream` connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEvent {
    /// The last `id:` seen on the stream, in this event or an earlier one.
    pub id: Option<String>,
    /// The `event:` field, `message` when absent.
    pub event: String,
    /// The `data:` lines, joined with `\n`.
    pub data: String,
}

/// Incremental parser. Chunks may split lines, or UTF-8 sequences, anywhere.
#[derive(Debug, Default)]
pub(crate) struct EventParser {
    buffer: Vec<u8>,
    last_event_id: Option<String>,
    event: Option<String>,
    data: Vec<String>,
}

impl EventParser {
    /// Feeds one chunk and returns the events it completed.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<ServerEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();

        while let Some(end) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line[..end]);
            let line = line.strip_suffix('\r').unwrap_or(&line);

            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }

        events
    }

    /// Bytes of the current, unterminated line.
    pub(crate) fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    fn process_line(&mut self, line: &str) -> Option<ServerEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        // Comment, used as keep-alive.
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = line.split_once(':').map_or((line, ""), |(field, value)| {
            (field, value.strip_prefix(' ').unwrap_or(value))
        });

        match field {
            // Ids containing NUL are ignored.
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }

        None
    }

    fn dispatch(&mut self) -> Option<ServerEvent> {
        let event = self.event.take();

        if self.data.is_empty() {
            return None;
        }

        let data = std::mem::take(&mut self.data).join("\n");

        Some(ServerEvent {
            id: self.last_event_id.clone(),
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

/// Events read from a streaming response, one chunk at a time.
#[derive(Debug)]
pub(crate) struct EventStream {
    response: reqwest::Response,
    parser: EventParser,
    pending: VecDeque<ServerEvent>,
}

impl EventStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            parser: EventParser::default(),
            pending: VecDeque::new(),
        }
    }

    /// Next complete event, or `None` once the server closed the stream.
    pub(crate) async fn next(&mut self) -> Result<Option<ServerEvent>, RequestError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            match self.response.chunk().await? {
                Some(chunk) => self.pending.extend(self.parser.feed(&chunk)),
                None => return Ok(None),
            }

            if self.parser.pending_len() > MAX_LINE_LENGTH {
                return Err(RequestError::Decode(serde_json::Error::custom(
                    "realtime event line exceeds the maximum length",
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_events() {
        let mut parser = EventParser::default();
        let events = parser.feed(
            b"id:abc\nevent:PB_CONNECT\ndata:{\"clientId\":\"abc\"}\n\nevent: users/*\ndata: {\"action\":\"create\"}\n\n",
        );

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id.as_deref(), Some("abc"));
        assert_eq!(events[0].event, "PB_CONNECT");
        assert_eq!(events[0].data, "{\"clientId\":\"abc\"}");
        assert_eq!(events[1].event, "users/*");
        assert_eq!(events[1].data, "{\"action\":\"create\"}");
        assert_eq!(events[1].id.as_deref(), Some("abc"));
    }

    #[test]
    fn handles_lines_split_across_chunks() {
        let mut parser = EventParser::default();
        assert!(parser.feed(b"event: us").is_empty());
        assert!(parser.feed(b"ers/*\ndata: {\"a\"").is_empty());
        let events = parser.feed(b":1}\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "users/*");
        assert_eq!(events[0].data, "{\"a\":1}");
    }

    #[test]
    fn handles_utf8_split_across_chunks() {
        let payload = "data: héllo\n\n".as_bytes();
        let split = payload.iter().position(|byte| *byte == 0xC3).unwrap() + 1;

        let mut parser = EventParser::default();
        assert!(parser.feed(&payload[..split]).is_empty());
        let events = parser.feed(&payload[split..]);

        assert_eq!(events[0].data, "héllo");
    }

    #[test]
    fn joins_multiline_data_and_accepts_crlf() {
        let mut parser = EventParser::default();
        let events = parser.feed(b"data: first\r\ndata: second\r\n\r\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[test]
    fn last_event_id_persists_across_events() {
        let mut parser = EventParser::default();
        let events = parser.feed(b"id: 7\ndata: a\n\ndata: b\n\nid\ndata: c\n\n");

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id.as_deref(), Some("7"));
        assert_eq!(events[1].id.as_deref(), Some("7"));
        assert_eq!(events[2].id.as_deref(), Some(""));
    }

    #[test]
    fn empty_data_line_dispatches_empty_payload() {
        let mut parser = EventParser::default();
        let events = parser.feed(b"event: users/*\ndata:\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "");
    }

    #[test]
    fn unterminated_line_is_buffered() {
        let mut parser = EventParser::default();
        assert!(parser.feed(b"data: no newline yet").is_empty());
        assert_eq!(parser.pending_len(), 20);

        parser.feed(b"\n");
        assert_eq!(parser.pending_len(), 0);
    }

    #[test]
    fn ignores_comments_and_empty_events() {
        let mut parser = EventParser::default();
        let events = parser.feed(b": keep-alive\n\nevent: ping\n\nretry: 1000\ndata:x\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "x");
    }
}
