pub mod is_constant;
pub mod scan;

pub use is_constant::{
    IsConstantAnalogCircuit, IsConstantAnalogCircuitResult, IsConstantWaveform,
    IsConstantWaveformResult,
};
pub use scan::{ScanVariables, ScanVariablesResult};
