//! file: core/src/analysis/scan.rs
//! description: collect every variable name a circuit refers to.

use std::collections::BTreeSet;
use std::convert::Infallible;

use crate::ir::circuit::AnalogCircuit;
use crate::ir::field::SpatialModulation;
use crate::ir::register::Register;
use crate::ir::scalar::Scalar;
use crate::ir::sequence::Sequence;
use crate::ir::waveform::{
    Aligned, AlignedValue, Constant, Linear, OpaqueFn, Poly, Record, Sample, Scale, Slice,
    Smooth, Waveform,
};
use crate::visitor::{AnalogCircuitVisitor, WaveformVisitor, walk_waveform};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanVariablesResult {
    /// Names evaluated as scalars.
    pub scalar_vars: BTreeSet<String>,
    /// Names of run-time per-site weight vectors.
    pub vector_vars: BTreeSet<String>,
    /// Names bound by `record`.
    pub recorded_vars: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct ScanVariables {
    result: ScanVariablesResult,
}

impl ScanVariables {
    pub fn new() -> Self {
        ScanVariables::default()
    }

    pub fn scan_circuit(mut self, circuit: &AnalogCircuit) -> ScanVariablesResult {
        let Ok(()) = self.visit_analog_circuit(circuit);
        self.result
    }

    pub fn scan_sequence(mut self, sequence: &Sequence) -> ScanVariablesResult {
        let Ok(()) = self.visit_sequence(sequence);
        self.result
    }

    pub fn scan_waveform(mut self, waveform: &Waveform) -> ScanVariablesResult {
        let Ok(()) = self.visit(waveform);
        self.result
    }

    fn scalar(&mut self, scalar: &Scalar) {
        scalar.collect_variables(&mut self.result.scalar_vars);
    }
}

impl WaveformVisitor for ScanVariables {
    type Error = Infallible;

    fn visit_constant(&mut self, waveform: &Constant) -> Result<(), Infallible> {
        self.scalar(&waveform.value);
        self.scalar(&waveform.duration);
        Ok(())
    }

    fn visit_linear(&mut self, waveform: &Linear) -> Result<(), Infallible> {
        self.scalar(&waveform.start);
        self.scalar(&waveform.stop);
        self.scalar(&waveform.duration);
        Ok(())
    }

    fn visit_poly(&mut self, waveform: &Poly) -> Result<(), Infallible> {
        for coeff in &waveform.coeffs {
            self.scalar(coeff);
        }
        self.scalar(&waveform.duration);
        Ok(())
    }

    fn visit_opaque_fn(&mut self, waveform: &OpaqueFn) -> Result<(), Infallible> {
        self.scalar(&waveform.duration);
        Ok(())
    }

    fn visit_aligned(&mut self, waveform: &Aligned) -> Result<(), Infallible> {
        if let AlignedValue::Value(value) = &waveform.value {
            self.scalar(value);
        }
        self.visit(&waveform.waveform)
    }

    fn visit_record(&mut self, waveform: &Record) -> Result<(), Infallible> {
        self.result.recorded_vars.insert(waveform.var.clone());
        self.visit(&waveform.waveform)
    }

    fn visit_sample(&mut self, waveform: &Sample) -> Result<(), Infallible> {
        self.scalar(&waveform.dt);
        self.visit(&waveform.waveform)
    }

    fn visit_scale(&mut self, waveform: &Scale) -> Result<(), Infallible> {
        self.scalar(&waveform.factor);
        self.visit(&waveform.waveform)
    }

    fn visit_slice(&mut self, waveform: &Slice) -> Result<(), Infallible> {
        for bound in [&waveform.interval.start, &waveform.interval.stop]
            .into_iter()
            .flatten()
        {
            self.scalar(bound);
        }
        self.visit(&waveform.waveform)
    }

    fn visit_smooth(&mut self, waveform: &Smooth) -> Result<(), Infallible> {
        self.scalar(&waveform.radius);
        self.visit(&waveform.waveform)
    }
}

impl AnalogCircuitVisitor for ScanVariables {
    type Error = Infallible;

    fn visit_register(&mut self, register: &Register) -> Result<(), Infallible> {
        for site in &register.atoms().sites {
            self.scalar(&site.position.0);
            self.scalar(&site.position.1);
        }
        if let Register::Parallel(parallel) = register {
            self.scalar(&parallel.cluster_spacing);
        }
        Ok(())
    }

    fn visit_spatial_modulation(
        &mut self,
        modulation: &SpatialModulation,
    ) -> Result<(), Infallible> {
        match modulation {
            SpatialModulation::Uniform => {}
            SpatialModulation::RunTimeVector { name } => {
                self.result.vector_vars.insert(name.clone());
            }
            SpatialModulation::ScaledLocations { weights } => {
                for weight in weights.values() {
                    self.scalar(weight);
                }
            }
        }
        Ok(())
    }

    fn visit_waveform(&mut self, waveform: &Waveform) -> Result<(), Infallible> {
        walk_waveform(self, waveform)
    }
}
