pub(crate) mod pattern;
mod synthetic;

pub(crate) use synthetic::{SyntheticDevices, SyntheticDisplay};
