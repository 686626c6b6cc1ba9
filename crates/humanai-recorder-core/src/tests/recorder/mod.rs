mod artifact;
mod controller;
mod encoder;
