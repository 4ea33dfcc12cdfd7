//! Streaming XML record decoding.
//!
//! A dump is one enormous document whose interesting elements all share a
//! local name (`artist`, `label`, `master`, `release`). The parser walks
//! the token stream, captures each matching element together with its
//! descendants, and serde-decodes the captured subtree into the caller's
//! record type. Unmatched siblings are skipped while the token stream
//! still advances beneath them.
//!
//! Decoding runs on a blocking task feeding a bounded channel, so memory
//! stays bounded and a slow consumer backpressures the read loop.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::de::DeserializeOwned;
use std::io::BufRead;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Decoded records in flight between the parse loop and the consumer.
const CHANNEL_DEPTH: usize = 64;

/// Failures terminal to one parse stream. The stream yields at most one
/// of these, as its final item.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed xml: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("read failure in xml stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode <{element}>: {source}")]
    Decode {
        element: String,
        #[source]
        source: quick_xml::DeError,
    },
    #[error("element <{0}> is not valid utf-8")]
    Utf8(String),
    #[error("input ended inside <{0}>")]
    Truncated(String),
}

/// Lazily decode `reader` into records of type `T`, one per element whose
/// local name equals `local_name`.
///
/// The sequence is finite, forward-only and non-restartable. On
/// cancellation the read loop stops at its next check and the stream ends
/// cleanly; malformed content yields one terminal `Err` item. The reader
/// is dropped exactly once, when the loop finishes for any reason.
pub fn parse_stream<T, R>(
    reader: R,
    local_name: &str,
    cancel: CancellationToken,
) -> ReceiverStream<Result<T, XmlError>>
where
    T: DeserializeOwned + Send + 'static,
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    let name = local_name.to_string();
    tokio::task::spawn_blocking(move || produce(reader, &name, cancel, tx));
    ReceiverStream::new(rx)
}

fn produce<T, R>(
    reader: R,
    local_name: &str,
    cancel: CancellationToken,
    tx: mpsc::Sender<Result<T, XmlError>>,
) where
    T: DeserializeOwned + Send + 'static,
    R: BufRead,
{
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        if cancel.is_cancelled() {
            // truncation, not an error
            return;
        }
        buf.clear();
        let event = match xml.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(err) => {
                let _ = tx.blocking_send(Err(err.into()));
                return;
            }
        };
        let item = match event {
            Event::Eof => return,
            Event::Start(start) if start.local_name().as_ref() == local_name.as_bytes() => {
                let element = start.into_owned();
                capture(&mut xml, element, local_name)
            }
            Event::Empty(start) if start.local_name().as_ref() == local_name.as_bytes() => {
                decode_empty(start.into_owned(), local_name)
            }
            _ => continue,
        };
        let terminal = item.is_err();
        if tx.blocking_send(item).is_err() || terminal {
            return;
        }
    }
}

/// Copy the matched element and its entire subtree into an owned buffer,
/// then decode it. Leaves the outer token stream positioned after the
/// element's end tag.
fn capture<T, R>(
    xml: &mut Reader<R>,
    start: BytesStart<'static>,
    local_name: &str,
) -> Result<T, XmlError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(start))?;
    let mut depth = 1usize;
    let mut buf = Vec::new();
    while depth > 0 {
        buf.clear();
        match xml.read_event_into(&mut buf)? {
            Event::Eof => return Err(XmlError::Truncated(local_name.to_string())),
            event @ Event::Start(_) => {
                depth += 1;
                writer.write_event(event)?;
            }
            event @ Event::End(_) => {
                depth -= 1;
                writer.write_event(event)?;
            }
            event @ (Event::Empty(_) | Event::Text(_) | Event::CData(_)) => {
                writer.write_event(event)?;
            }
            // comments, PIs and declarations carry no record data
            _ => {}
        }
    }
    decode_fragment(writer.into_inner(), local_name)
}

fn decode_empty<T>(element: BytesStart<'static>, local_name: &str) -> Result<T, XmlError>
where
    T: DeserializeOwned,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Empty(element))?;
    decode_fragment(writer.into_inner(), local_name)
}

fn decode_fragment<T>(bytes: Vec<u8>, element: &str) -> Result<T, XmlError>
where
    T: DeserializeOwned,
{
    let text = String::from_utf8(bytes).map_err(|_| XmlError::Utf8(element.to_string()))?;
    quick_xml::de::from_str(&text).map_err(|source| XmlError::Decode {
        element: element.to_string(),
        source,
    })
}
