pub mod circuit;
pub mod waveform;

pub use circuit::AnalogCircuitVisitor;
pub use waveform::{WaveformVisitor, walk_waveform};
