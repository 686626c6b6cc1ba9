mod sampler;
mod synthesizer;

pub use {
    sampler::FrameSampler,
    synthesizer::{CANVAS_FRAME_RATE, OutputStream, StreamSynthesizer},
};
