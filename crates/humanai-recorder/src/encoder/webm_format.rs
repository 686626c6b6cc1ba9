/// Video codec ffmpeg is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VideoCodec {
    /// VP8 via libvpx.
    Vp8,
    /// VP9 via libvpx-vp9.
    Vp9,
}

impl VideoCodec {
    /// ffmpeg encoder name.
    pub(crate) fn encoder_name(&self) -> &'static str {
        match self {
            VideoCodec::Vp8 => "libvpx",
            VideoCodec::Vp9 => "libvpx-vp9",
        }
    }
}

/// The WebM output described by a container/codec string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WebmFormat {
    /// Video codec.
    pub video: VideoCodec,
    /// Whether audio is encoded (as opus).
    pub audio: bool,
}

impl WebmFormat {
    /// Parse `video/webm[;codecs=...]`. Returns `None` for anything ffmpeg
    /// is not set up to produce here.
    ///
    /// A bare `video/webm` means vp8 with opus audio.
    pub(crate) fn parse(mime_type: &str) -> Option<Self> {
        let mut parts = mime_type.split(';');
        let essence = parts.next()?.trim();
        if !essence.eq_ignore_ascii_case("video/webm") {
            return None;
        }

        let mut codecs = None;
        for param in parts {
            let (key, value) = param.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("codecs") {
                codecs = Some(value.trim().trim_matches('"'));
            }
        }

        let Some(codecs) = codecs else {
            return Some(Self {
                video: VideoCodec::Vp8,
                audio: true,
            });
        };

        let mut video = None;
        let mut audio = false;
        for codec in codecs.split(',').map(str::trim) {
            match codec.to_ascii_lowercase().as_str() {
                "vp8" if video.is_none() => video = Some(VideoCodec::Vp8),
                "vp9" if video.is_none() => video = Some(VideoCodec::Vp9),
                "opus" if !audio => audio = true,
                _ => return None,
            }
        }

        Some(Self {
            video: video?,
            audio,
        })
    }
}
