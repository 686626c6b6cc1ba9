pub(crate) mod ffmpeg_encoder;
mod webm_format;

pub(crate) use {ffmpeg_encoder::FfmpegEncoder, webm_format::WebmFormat};
