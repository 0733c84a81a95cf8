pub mod circuit;
pub mod err;
pub mod field;
pub mod params;
pub mod pulse;
pub mod register;
pub mod routine;
pub mod scalar;
pub mod sequence;
pub mod waveform;

pub use circuit::AnalogCircuit;
pub use err::EvalError;
pub use field::{Field, SpatialModulation};
pub use params::{ParamMap, ParamValue, Parameters};
pub use pulse::{FieldName, Pulse};
pub use register::{AtomArrangement, ParallelRegister, Register, Site, SiteFilling};
pub use routine::Routine;
pub use scalar::{Assignments, Scalar};
pub use sequence::{Coupling, Sequence};
pub use waveform::{Interpolation, Waveform};
