//! file: core/src/visitor/circuit.rs
//! description: traversal over `AnalogCircuit` containers.
//!
//! Walks register, then every pulse, field, and drive in insertion order.
//! Waveforms are handed to `visit_waveform`; implementors that also
//! implement `WaveformVisitor` delegate from there.

use crate::ir::circuit::AnalogCircuit;
use crate::ir::field::{Field, SpatialModulation};
use crate::ir::pulse::{FieldName, Pulse};
use crate::ir::register::Register;
use crate::ir::sequence::{Coupling, Sequence};
use crate::ir::waveform::Waveform;

pub trait AnalogCircuitVisitor {
    type Error;

    fn visit_analog_circuit(&mut self, circuit: &AnalogCircuit) -> Result<(), Self::Error> {
        self.visit_register(&circuit.register)?;
        self.visit_sequence(&circuit.sequence)
    }

    fn visit_register(&mut self, _register: &Register) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_sequence(&mut self, sequence: &Sequence) -> Result<(), Self::Error> {
        for (coupling, pulse) in &sequence.pulses {
            self.visit_pulse(*coupling, pulse)?;
        }
        Ok(())
    }

    fn visit_pulse(&mut self, coupling: Coupling, pulse: &Pulse) -> Result<(), Self::Error> {
        for (name, field) in &pulse.fields {
            self.visit_field(coupling, *name, field)?;
        }
        Ok(())
    }

    fn visit_field(
        &mut self,
        coupling: Coupling,
        name: FieldName,
        field: &Field,
    ) -> Result<(), Self::Error> {
        for (modulation, waveform) in field.drives() {
            self.visit_drive(coupling, name, modulation, waveform)?;
        }
        Ok(())
    }

    fn visit_drive(
        &mut self,
        _coupling: Coupling,
        _name: FieldName,
        modulation: &SpatialModulation,
        waveform: &Waveform,
    ) -> Result<(), Self::Error> {
        self.visit_spatial_modulation(modulation)?;
        self.visit_waveform(waveform)
    }

    fn visit_spatial_modulation(
        &mut self,
        _modulation: &SpatialModulation,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_waveform(&mut self, _waveform: &Waveform) -> Result<(), Self::Error> {
        Ok(())
    }
}
