//! Encoder sink contract and container type selection.

use crate::{CoreResult, synth::OutputStream};

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// Candidate container/codec strings, in order of preference.
pub const MIME_CANDIDATES: [&str; 6] = [
    "video/webm;codecs=vp8,opus",
    "video/webm;codecs=vp8",
    "video/webm;codecs=vp9,opus",
    "video/webm;codecs=vp9",
    "video/webm;codecs=h264",
    "video/webm",
];

/// Type used when the encoder supports none of the candidates.
pub const FALLBACK_MIME_TYPE: &str = "video/webm";

/// Output of a running encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A slice of encoded container data, in production order.
    Chunk(Vec<u8>),
    /// All buffered data has been emitted. No further events follow.
    Finalized,
    /// Encoding failed. No further events follow.
    Failed(String),
}

/// Settings for one encoding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Container/codec string.
    pub mime_type: String,
    /// Emit a chunk every interval; `None` leaves slicing to the encoder.
    pub timeslice: Option<Duration>,
    /// Video bitrate hint.
    pub video_bits_per_second: Option<u32>,
}

/// Chunked media encoder.
#[async_trait]
pub trait EncoderSink: Send {
    /// Whether `mime_type` can be produced.
    fn is_type_supported(&self, mime_type: &str) -> bool;

    /// Start encoding `stream`.
    ///
    /// Returns the receiver on which chunks, then exactly one terminal
    /// event, are delivered.
    ///
    /// # Errors
    ///
    /// `Encoder` if the encoder cannot be started.
    async fn start_encoding(
        &mut self,
        stream: OutputStream,
        options: EncoderOptions,
    ) -> CoreResult<mpsc::UnboundedReceiver<EncoderEvent>>;

    /// Ask the encoder to flush what it has buffered and then finalize.
    fn request_stop(&mut self);

    /// Abort encoding without waiting for a flush.
    fn force_stop(&mut self);
}

/// First candidate the encoder supports, or [`FALLBACK_MIME_TYPE`].
pub fn select_mime_type(encoder: &dyn EncoderSink) -> String {
    let selected = MIME_CANDIDATES
        .into_iter()
        .find(|candidate| encoder.is_type_supported(candidate))
        .unwrap_or(FALLBACK_MIME_TYPE);

    debug!(mime_type = selected, "Container type selected");

    selected.to_string()
}

/// File extension for a container/codec string.
pub fn container_extension(mime_type: &str) -> &str {
    let essence = mime_type.split(';').next().unwrap_or(mime_type).trim();
    let subtype = essence.split('/').nth(1).unwrap_or("");

    match subtype {
        "webm" => "webm",
        "mp4" => "mp4",
        "x-matroska" => "mkv",
        "ogg" => "ogv",
        "" => "bin",
        other => other,
    }
}
