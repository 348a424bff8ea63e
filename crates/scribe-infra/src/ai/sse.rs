//! Line-level relay of a server-sent event body.

use std::fmt::Display;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use scribe_core::ports::TextStream;

const DATA_PREFIX: &str = "data: ";

struct LineRelay<S> {
    upstream: Pin<Box<S>>,
    buffer: Vec<u8>,
    finished: bool,
}

impl<S> LineRelay<S> {
    fn next_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=newline).collect();
        Some(decode(&line[..newline]))
    }

    fn take_rest(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(decode(&rest))
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\r')
        .to_string()
}

/// `data:` lines become complete event blocks; everything else is dropped.
fn as_event(line: &str) -> Option<String> {
    line.starts_with(DATA_PREFIX).then(|| format!("{line}\n\n"))
}

/// Relay every `data: ` line of `upstream` as its own event, as soon as the
/// line is complete.
///
/// The returned stream owns `upstream`: dropping it (for example when the
/// downstream client disconnects) drops the upstream body and closes that
/// connection. An upstream read error ends the stream.
pub fn relay_data_lines<S, B, E>(upstream: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let relay = LineRelay {
        upstream: Box::pin(upstream),
        buffer: Vec::new(),
        finished: false,
    };

    stream::unfold(relay, |mut relay| async move {
        loop {
            if let Some(line) = relay.next_line() {
                match as_event(&line) {
                    Some(event) => return Some((event, relay)),
                    None => continue,
                }
            }

            if relay.finished {
                let event = relay.take_rest().and_then(|line| as_event(&line))?;
                return Some((event, relay));
            }

            match relay.upstream.next().await {
                Some(Ok(chunk)) => relay.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Upstream event stream failed, ending relay");
                    relay.finished = true;
                }
                None => relay.finished = true,
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], String>> {
        stream::iter(parts.iter().map(|p| Ok(p.as_bytes())).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_relays_data_lines_only() {
        let upstream = chunks(&["data: {\"a\":1}\n\n", ": keep-alive\n", "event: x\ndata: {\"b\":2}\n\n"]);

        let events: Vec<String> = relay_data_lines(upstream).collect().await;

        assert_eq!(events, vec!["data: {\"a\":1}\n\n", "data: {\"b\":2}\n\n"]);
    }

    #[tokio::test]
    async fn test_joins_lines_split_across_chunks() {
        let upstream = chunks(&["da", "ta: {\"text\":\"hel", "lo\"}\r", "\n\r\n"]);

        let events: Vec<String> = relay_data_lines(upstream).collect().await;

        assert_eq!(events, vec!["data: {\"text\":\"hello\"}\n\n"]);
    }

    #[tokio::test]
    async fn test_flushes_unterminated_last_line() {
        let upstream = chunks(&["data: 1\n", "data: 2"]);

        let events: Vec<String> = relay_data_lines(upstream).collect().await;

        assert_eq!(events, vec!["data: 1\n\n", "data: 2\n\n"]);
    }

    #[tokio::test]
    async fn test_upstream_error_ends_stream() {
        let upstream = stream::iter(vec![
            Ok::<&'static [u8], String>(b"data: 1\n"),
            Err("connection reset".to_string()),
            Ok(b"data: 2\n"),
        ]);

        let events: Vec<String> = relay_data_lines(upstream).collect().await;

        assert_eq!(events, vec!["data: 1\n\n"]);
    }
}
