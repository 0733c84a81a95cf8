pub mod analysis;
pub mod builder;
pub mod error;
pub mod ir;
pub mod location;
pub mod parse;
pub mod visitor;

pub use analysis::{IsConstantAnalogCircuit, IsConstantWaveform, ScanVariables};
pub use builder::{Builder, BuilderStream};
pub use error::{Level, PulsecErrorExt};
pub use ir::{AnalogCircuit, EvalError, Parameters, Routine, Sequence, Waveform};
pub use location::Location;
pub use parse::Parser;
pub use parse::err::{ParseError, ParseErrorKind};

pub fn generate_error_report<E: PulsecErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("PULSEC | {} | {} | {}", level, location, message)
}
