mod compositor;
mod recorder;
mod synth;
