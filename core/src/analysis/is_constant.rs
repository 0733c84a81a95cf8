//! file: core/src/analysis/is_constant.rs
//! description: constant-folding analysis for waveforms and circuits.
//!
//! A waveform is constant when it holds one value for its whole duration
//! under the given assignments. A circuit is constant when every drive is
//! constant and all drives share a duration; its effective circuit replaces
//! each waveform with the folded `Constant`.

use log::{debug, trace};
use rust_decimal::Decimal;

use crate::ir::circuit::AnalogCircuit;
use crate::ir::err::EvalError;
use crate::ir::field::SpatialModulation;
use crate::ir::pulse::FieldName;
use crate::ir::scalar::{Assignments, Scalar};
use crate::ir::sequence::{Coupling, Sequence};
use crate::ir::waveform::{Add, Append, Constant, Linear, OpaqueFn, Poly, Waveform};
use crate::visitor::{AnalogCircuitVisitor, WaveformVisitor};

#[derive(Debug, Clone, PartialEq)]
pub struct IsConstantWaveformResult {
    pub is_constant: bool,
    /// Value at the end of the waveform held for its full duration.
    pub constant_waveform: Constant,
}

impl IsConstantWaveformResult {
    pub fn value(&self) -> Option<Decimal> {
        self.constant_waveform.value.as_literal()
    }

    pub fn duration(&self) -> Option<Decimal> {
        self.constant_waveform.duration.as_literal()
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::Constant(self.constant_waveform.clone())
    }
}

pub struct IsConstantWaveform<'a> {
    assignments: &'a Assignments,
    is_constant: bool,
}

impl<'a> IsConstantWaveform<'a> {
    pub fn new(assignments: &'a Assignments) -> Self {
        IsConstantWaveform {
            assignments,
            is_constant: true,
        }
    }

    pub fn emit(mut self, waveform: &Waveform) -> Result<IsConstantWaveformResult, EvalError> {
        self.visit(waveform)?;
        let duration = waveform.duration(self.assignments)?;
        let value = waveform.value_at(duration, self.assignments)?;
        trace!(
            "folded {} to {} over {} (constant: {})",
            waveform.kind_name(),
            value,
            duration,
            self.is_constant
        );
        Ok(IsConstantWaveformResult {
            is_constant: self.is_constant,
            constant_waveform: Constant {
                value: Scalar::Literal(value),
                duration: Scalar::Literal(duration),
            },
        })
    }
}

impl WaveformVisitor for IsConstantWaveform<'_> {
    type Error = EvalError;

    fn visit_linear(&mut self, waveform: &Linear) -> Result<(), EvalError> {
        let start = waveform.start.eval(self.assignments)?;
        let stop = waveform.stop.eval(self.assignments)?;
        self.is_constant = self.is_constant && start == stop;
        Ok(())
    }

    fn visit_poly(&mut self, waveform: &Poly) -> Result<(), EvalError> {
        for coeff in waveform.coeffs.iter().skip(1) {
            if !coeff.eval(self.assignments)?.is_zero() {
                self.is_constant = false;
            }
        }
        Ok(())
    }

    fn visit_opaque_fn(&mut self, _waveform: &OpaqueFn) -> Result<(), EvalError> {
        self.is_constant = false;
        Ok(())
    }

    fn visit_append(&mut self, waveform: &Append) -> Result<(), EvalError> {
        let mut first_value: Option<Scalar> = None;
        for part in &waveform.waveforms {
            let result = IsConstantWaveform::new(self.assignments).emit(part)?;
            let value = result.constant_waveform.value;
            let expected = first_value.get_or_insert_with(|| value.clone());
            self.is_constant = self.is_constant && result.is_constant && value == *expected;
            if !self.is_constant {
                return Ok(());
            }
        }
        Ok(())
    }

    fn visit_add(&mut self, waveform: &Add) -> Result<(), EvalError> {
        let left = waveform.left.duration(self.assignments)?;
        let right = waveform.right.duration(self.assignments)?;
        if left != right {
            self.is_constant = false;
            return Ok(());
        }
        self.visit(&waveform.left)?;
        self.visit(&waveform.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsConstantAnalogCircuitResult {
    pub is_constant: bool,
    pub effective_analog_circuit: AnalogCircuit,
}

pub struct IsConstantAnalogCircuit<'a> {
    assignments: &'a Assignments,
    is_constant: bool,
    duration: Option<Decimal>,
    sequence: Sequence,
}

impl<'a> IsConstantAnalogCircuit<'a> {
    pub fn new(assignments: &'a Assignments) -> Self {
        IsConstantAnalogCircuit {
            assignments,
            is_constant: true,
            duration: None,
            sequence: Sequence::new(),
        }
    }

    pub fn emit(
        mut self,
        circuit: &AnalogCircuit,
    ) -> Result<IsConstantAnalogCircuitResult, EvalError> {
        self.visit_analog_circuit(circuit)?;
        debug!("circuit constant: {}", self.is_constant);
        Ok(IsConstantAnalogCircuitResult {
            is_constant: self.is_constant,
            effective_analog_circuit: AnalogCircuit::new(circuit.register.clone(), self.sequence),
        })
    }
}

impl AnalogCircuitVisitor for IsConstantAnalogCircuit<'_> {
    type Error = EvalError;

    fn visit_drive(
        &mut self,
        coupling: Coupling,
        name: FieldName,
        modulation: &SpatialModulation,
        waveform: &Waveform,
    ) -> Result<(), EvalError> {
        let result = IsConstantWaveform::new(self.assignments).emit(waveform)?;
        self.is_constant = self.is_constant && result.is_constant;

        let duration = result.constant_waveform.duration.eval(self.assignments)?;
        match self.duration {
            None => self.duration = Some(duration),
            Some(common) if common != duration => {
                debug!("{coupling}.{name} [{modulation}] lasts {duration}, expected {common}");
                self.is_constant = false;
            }
            Some(_) => {}
        }

        let sequence = std::mem::take(&mut self.sequence);
        self.sequence = sequence.add_drive(coupling, name, modulation.clone(), result.waveform());
        Ok(())
    }
}
