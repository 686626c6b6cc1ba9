//! Chunked WebM encoder backed by an ffmpeg child process.
//!
//! Raw RGBA frames from the output stream's video track are piped into
//! ffmpeg's stdin at the stream frame rate. Each audio track becomes a
//! silent `anullsrc` input, since synthetic audio carries no samples. WebM
//! bytes read from stdout are handed to the controller as chunks on the
//! timeslice interval, or as one chunk when the encoder finishes.

use crate::{AppError, AppResult, config::EncoderConfig, encoder::WebmFormat};

use humanai_recorder_core::{
    CoreResult, EncoderEvent, EncoderOptions, EncoderSink, FrameSampler, MediaTrack,
    OutputStream, RecorderError, VideoFrame,
};

use std::{
    panic::Location,
    path::PathBuf,
    process::Stdio,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, ChildStdin, ChildStdout, Command},
    sync::{mpsc, watch},
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, error, info, instrument, warn};
use which::which;

const READ_BUFFER_SIZE: usize = 64 * 1024;
const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 48_000;

/// Find the ffmpeg binary: the configured path, else `PATH`.
#[track_caller]
pub(crate) fn locate_ffmpeg(config: &EncoderConfig) -> AppResult<PathBuf> {
    match &config.ffmpeg_path {
        Some(path) if path.is_file() => Ok(path.clone()),
        Some(path) => Err(AppError::EncoderUnavailable {
            reason: format!("configured ffmpeg {:?} does not exist", path),
            location: ErrorLocation::from(Location::caller()),
        }),
        None => which("ffmpeg").map_err(|e| AppError::EncoderUnavailable {
            reason: format!("ffmpeg not found on PATH: {}", e),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// Command line for one encoding run.
///
/// Input 0 is raw RGBA video on stdin; inputs 1.. are one silent source per
/// entry of `audio_sample_rates`. Output is WebM on stdout.
pub(crate) fn build_ffmpeg_args(
    format: WebmFormat,
    width: u32,
    height: u32,
    frame_rate: u32,
    audio_sample_rates: &[u32],
    video_bits_per_second: Option<u32>,
) -> Vec<String> {
    let mut args: Vec<String> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(format!("{}x{}", width, height));
    args.extend(["-r".to_string(), frame_rate.to_string()]);
    args.extend(["-i".to_string(), "pipe:0".to_string()]);

    let audio_inputs: &[u32] = if format.audio { audio_sample_rates } else { &[] };
    for rate in audio_inputs {
        args.extend([
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            format!("anullsrc=channel_layout=stereo:sample_rate={}", rate),
        ]);
    }

    args.extend(["-map".to_string(), "0:v".to_string()]);
    for input in 1..=audio_inputs.len() {
        args.extend(["-map".to_string(), format!("{}:a", input)]);
    }

    args.extend([
        "-c:v".to_string(),
        format.video.encoder_name().to_string(),
        "-deadline".to_string(),
        "realtime".to_string(),
        "-cpu-used".to_string(),
        "8".to_string(),
    ]);
    if let Some(bits) = video_bits_per_second {
        args.extend(["-b:v".to_string(), bits.to_string()]);
    }

    if !audio_inputs.is_empty() {
        // The silent sources never end; stop with the video.
        args.extend([
            "-c:a".to_string(),
            "libopus".to_string(),
            "-shortest".to_string(),
        ]);
    }

    args.extend(["-f".to_string(), "webm".to_string(), "pipe:1".to_string()]);
    args
}

/// Control handles for the running ffmpeg process.
pub(crate) struct EncoderRun {
    pub(crate) stop_tx: watch::Sender<bool>,
    pub(crate) kill_tx: watch::Sender<bool>,
}

impl EncoderRun {
    fn kill(&self) {
        let _ = self.stop_tx.send(true);
        let _ = self.kill_tx.send(true);
    }

    /// The output task holds the kill receiver until ffmpeg has exited.
    pub(crate) fn is_finished(&self) -> bool {
        self.kill_tx.is_closed()
    }

    /// Tear down a run left from an earlier recording. Returns `true` if
    /// ffmpeg was still running and had to be killed.
    pub(crate) fn retire(self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.kill();
        true
    }
}

/// [`EncoderSink`] that spawns one ffmpeg process per recording.
pub(crate) struct FfmpegEncoder {
    ffmpeg: PathBuf,
    run: Option<EncoderRun>,
}

impl FfmpegEncoder {
    /// Locate ffmpeg and create an idle encoder.
    #[track_caller]
    pub(crate) fn new(config: &EncoderConfig) -> AppResult<Self> {
        let ffmpeg = locate_ffmpeg(config)?;
        info!(ffmpeg = ?ffmpeg, "Using ffmpeg");
        Ok(Self { ffmpeg, run: None })
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.kill();
        }
    }
}

#[async_trait]
impl EncoderSink for FfmpegEncoder {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        WebmFormat::parse(mime_type).is_some()
    }

    #[instrument(skip(self, stream), fields(mime_type = %options.mime_type))]
    async fn start_encoding(
        &mut self,
        stream: OutputStream,
        options: EncoderOptions,
    ) -> CoreResult<mpsc::UnboundedReceiver<EncoderEvent>> {
        if let Some(previous) = self.run.take()
            && previous.retire()
        {
            warn!("Previous ffmpeg run still active, killed it");
        }

        let format =
            WebmFormat::parse(&options.mime_type).ok_or_else(|| RecorderError::Encoder {
                reason: format!("unsupported mime type '{}'", options.mime_type),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let video = stream.video_track().clone();
        let settings = video.settings();
        let (Some(width), Some(height)) = (settings.width, settings.height) else {
            return Err(RecorderError::Encoder {
                reason: format!("video track '{}' has no resolution", video.label()),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let audio_sample_rates: Vec<u32> = stream
            .audio_tracks()
            .iter()
            .map(|track| {
                track
                    .settings()
                    .sample_rate
                    .unwrap_or(DEFAULT_AUDIO_SAMPLE_RATE)
            })
            .collect();

        let args = build_ffmpeg_args(
            format,
            width,
            height,
            stream.frame_rate(),
            &audio_sample_rates,
            options.video_bits_per_second,
        );
        debug!(args = ?args, "Spawning ffmpeg");

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecorderError::Encoder {
                reason: format!("failed to start ffmpeg: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.start_kill();
            return Err(RecorderError::Encoder {
                reason: "failed to capture ffmpeg stdio".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let (kill_tx, kill_rx) = watch::channel(false);

        tokio::spawn(feed_frames(
            stdin,
            video,
            (width, height),
            stream.frame_rate(),
            stop_rx,
        ));
        tokio::spawn(collect_output(
            child,
            stdout,
            options.timeslice,
            events_tx,
            kill_rx,
        ));

        self.run = Some(EncoderRun { stop_tx, kill_tx });

        info!(
            width,
            height,
            audio_tracks = audio_sample_rates.len(),
            codec = format.video.encoder_name(),
            "ffmpeg encoding started"
        );

        Ok(events_rx)
    }

    fn request_stop(&mut self) {
        if let Some(run) = &self.run {
            debug!("Closing ffmpeg input");
            let _ = run.stop_tx.send(true);
        }
    }

    fn force_stop(&mut self) {
        if let Some(run) = self.run.take() {
            warn!("Killing ffmpeg");
            run.kill();
        }
    }
}

/// Write the video track into ffmpeg at `frame_rate` until stopped.
///
/// Frames with the wrong size are skipped; until the first good frame a
/// black frame is written so ffmpeg's clock starts with the recording.
async fn feed_frames(
    mut stdin: ChildStdin,
    video: MediaTrack,
    (width, height): (u32, u32),
    frame_rate: u32,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut sampler = FrameSampler::new(frame_rate);
    let mut ticker = tokio::time::interval(sampler.frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let blank = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let mut last: Option<VideoFrame> = None;
    let mut mismatched: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let due = sampler.due_frames(Instant::now());

                if let Some(frame) = video.latest_frame() {
                    if frame.dimensions() == (width, height) {
                        last = Some(frame);
                    } else {
                        mismatched += 1;
                    }
                }

                let bytes: &[u8] = match &last {
                    Some(frame) => frame.as_raw(),
                    None => blank.as_raw(),
                };
                for _ in 0..due {
                    if let Err(e) = stdin.write_all(bytes).await {
                        warn!(error = %e, "ffmpeg stopped accepting frames");
                        return;
                    }
                }
            }
            // Also fires if the encoder was dropped.
            _ = stop_rx.changed() => break,
        }
    }

    if mismatched > 0 {
        warn!(mismatched, "Skipped frames with unexpected dimensions");
    }
    if let Err(e) = stdin.shutdown().await {
        debug!(error = %e, "ffmpeg stdin already closed");
    }
    debug!(frames = sampler.emitted(), "Frame feed finished");
}

async fn next_slice(slicer: &mut Option<Interval>) {
    match slicer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn flush_chunk(
    pending: &mut Vec<u8>,
    events: &mpsc::UnboundedSender<EncoderEvent>,
    chunks: &mut usize,
) {
    if pending.is_empty() {
        return;
    }
    *chunks += 1;
    let _ = events.send(EncoderEvent::Chunk(std::mem::take(pending)));
}

/// Read ffmpeg's WebM output and turn it into encoder events.
async fn collect_output(
    mut child: Child,
    mut stdout: ChildStdout,
    timeslice: Option<Duration>,
    events: mpsc::UnboundedSender<EncoderEvent>,
    mut kill_rx: watch::Receiver<bool>,
) {
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut pending = Vec::new();
    let mut chunks = 0usize;
    let mut slicer = timeslice.map(|slice| {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + slice, slice);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        tokio::select! {
            read = stdout.read(&mut buffer) => match read {
                Ok(0) => break,
                Ok(n) => pending.extend_from_slice(&buffer[..n]),
                Err(e) => {
                    error!(error = %e, "Failed to read ffmpeg output");
                    let _ = child.start_kill();
                    let reason = format!("reading ffmpeg output: {}", e);
                    let _ = events.send(EncoderEvent::Failed(reason));
                    return;
                }
            },
            _ = next_slice(&mut slicer) => flush_chunk(&mut pending, &events, &mut chunks),
            _ = kill_rx.changed() => {
                let _ = child.start_kill();
                let _ = events.send(EncoderEvent::Failed("ffmpeg was killed".to_string()));
                return;
            }
        }
    }

    flush_chunk(&mut pending, &events, &mut chunks);

    match child.wait_with_output().await {
        Ok(output) if output.status.success() => {
            info!(chunks, "ffmpeg finished");
            let _ = events.send(EncoderEvent::Finalized);
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(status = %output.status, stderr = %stderr.trim(), "ffmpeg failed");
            let _ = events.send(EncoderEvent::Failed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Err(e) => {
            let _ = events.send(EncoderEvent::Failed(format!(
                "waiting for ffmpeg: {}",
                e
            )));
        }
    }
}
