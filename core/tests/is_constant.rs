use pulsec_core::analysis::{IsConstantAnalogCircuit, IsConstantWaveform};
use pulsec_core::builder::Builder;
use pulsec_core::ir::AnalogCircuit;
use pulsec_core::ir::field::SpatialModulation;
use pulsec_core::ir::pulse::FieldName;
use pulsec_core::ir::register::AtomArrangement;
use pulsec_core::ir::scalar::{Assignments, Scalar};
use pulsec_core::ir::sequence::Coupling;
use pulsec_core::ir::waveform::{Constant, Waveform};
use rust_decimal_macros::dec;

fn chain() -> Builder {
    Builder::new(AtomArrangement::chain(8, 6.1))
}

fn is_constant(circuit: &AnalogCircuit) -> bool {
    IsConstantAnalogCircuit::new(&Assignments::new())
        .emit(circuit)
        .expect("analysis failed")
        .is_constant
}

#[test]
fn flat_linear_folds_to_constant() {
    let result = IsConstantWaveform::new(&Assignments::new())
        .emit(&Waveform::linear(1, 1, 2))
        .unwrap();
    assert!(result.is_constant);
    assert_eq!(
        result.constant_waveform,
        Constant {
            value: Scalar::from(1),
            duration: Scalar::from(2)
        }
    );
}

#[test]
fn rising_linear_is_not_constant() {
    let result = IsConstantWaveform::new(&Assignments::new())
        .emit(&Waveform::linear(0, 1, 2))
        .unwrap();
    assert!(!result.is_constant);
    assert_eq!(result.value(), Some(dec!(1)));
}

#[test]
fn add_with_unequal_durations_is_not_constant() {
    let wf = Waveform::constant(1, 1).add(Waveform::constant(1, 2));
    let result = IsConstantWaveform::new(&Assignments::new()).emit(&wf).unwrap();
    assert!(!result.is_constant);
    // the shorter operand reads as zero past its end
    assert_eq!(result.duration(), Some(dec!(2)));
    assert_eq!(result.value(), Some(dec!(1)));
}

#[test]
fn append_needs_one_shared_value() {
    let same = Waveform::constant(1, 1).append(Waveform::linear(1, 1, 3));
    let differ = Waveform::constant(1, 1).append(Waveform::constant(2, 1));
    let a = Assignments::new();
    assert!(IsConstantWaveform::new(&a).emit(&same).unwrap().is_constant);
    assert!(!IsConstantWaveform::new(&a).emit(&differ).unwrap().is_constant);
}

#[test]
fn opaque_functions_are_never_constant() {
    let wf = Waveform::opaque("flat", 1, |_| 1.0);
    let result = IsConstantWaveform::new(&Assignments::new()).emit(&wf).unwrap();
    assert!(!result.is_constant);
}

#[test]
fn matching_constant_drives_make_a_constant_circuit() {
    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1.0, 10.0)
        .amplitude()
        .uniform()
        .linear(1.0, 1.0, 5.0)
        .linear(1.0, 1.0, 5.0)
        .phase()
        .uniform()
        .poly([1.0, 0.0, 0.0, 0.0, 0.0], 10)
        .parse_circuit()
        .unwrap();
    assert!(is_constant(&circuit));

    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1.0, 5.0)
        .uniform()
        .constant(1.0, 10.0)
        .slice(2.5, 7.5)
        .amplitude()
        .uniform()
        .linear(1.0, 1.0, 5.0)
        .linear(1.0, 1.0, 5.0)
        .slice(2.5, 7.5)
        .record("var")
        .phase()
        .uniform()
        .poly([1.0, 0.0, 0.0, 0.0, 0.0], 5)
        .parse_circuit()
        .unwrap();
    assert!(is_constant(&circuit));
}

#[test]
fn shaped_drives_break_constancy() {
    let base = chain()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1.0, 5.0)
        .uniform()
        .constant(1.0, 10.0)
        .slice(2.5, 7.5)
        .amplitude()
        .uniform()
        .linear(1.0, 1.0, 5.0)
        .linear(1.0, 1.0, 5.0)
        .slice(2.5, 7.5)
        .record("var")
        .phase()
        .uniform()
        .poly([1.0, 1.0, 0.0, 0.0, 0.0], 5);
    assert!(!is_constant(&base.parse_circuit().unwrap()));

    let sampled = base
        .amplitude()
        .uniform()
        .func("ramp", 5, |t| t)
        .sample(0.05, None)
        .parse_circuit()
        .unwrap();
    assert!(!is_constant(&sampled));
}

#[test]
fn unequal_durations_break_constancy() {
    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1.0, 9.0)
        .amplitude()
        .uniform()
        .linear(1.0, 1.0, 5.0)
        .linear(1.0, 1.0, 5.0)
        .phase()
        .uniform()
        .poly([1.0, 0.0, 0.0, 0.0, 0.0], 10)
        .parse_circuit()
        .unwrap();
    assert!(!is_constant(&circuit));

    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1.0, 10.0)
        .uniform()
        .constant(1.0, 9.0)
        .amplitude()
        .uniform()
        .linear(1.0, 1.0, 5.0)
        .linear(1.0, 1.0, 5.0)
        .phase()
        .uniform()
        .poly([1.0, 0.0, 0.0, 0.0, 0.0], 10)
        .parse_circuit()
        .unwrap();
    assert!(!is_constant(&circuit));
}

#[test]
fn differing_appended_values_break_constancy() {
    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1.0, 10.0)
        .constant(1.1, 10.0)
        .parse_circuit()
        .unwrap();
    assert!(!is_constant(&circuit));
}

#[test]
fn effective_circuit_holds_folded_waveforms() {
    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .linear(2, 2, 4)
        .location(1)
        .linear(0, 3, 4)
        .parse_circuit()
        .unwrap();

    let result = IsConstantAnalogCircuit::new(&Assignments::new())
        .emit(&circuit)
        .unwrap();
    assert!(!result.is_constant);

    let effective = &result.effective_analog_circuit;
    assert_eq!(effective.register, circuit.register);
    let field = effective
        .sequence
        .field(Coupling::Rydberg, FieldName::Detuning)
        .unwrap();
    assert_eq!(
        field.get(&SpatialModulation::Uniform),
        Some(&Waveform::constant(dec!(2), dec!(4)))
    );
    assert_eq!(
        field.get(&SpatialModulation::locations([(1, Scalar::from(1))])),
        Some(&Waveform::constant(dec!(3), dec!(4)))
    );
}

#[test]
fn free_variables_come_from_assignments() {
    let circuit = chain()
        .rydberg()
        .detuning()
        .uniform()
        .linear("a", "b", "t")
        .parse_circuit()
        .unwrap();

    let mut assignments = Assignments::new();
    assignments.insert("a".into(), dec!(4));
    assignments.insert("b".into(), dec!(4));
    assignments.insert("t".into(), dec!(2));
    let result = IsConstantAnalogCircuit::new(&assignments).emit(&circuit).unwrap();
    assert!(result.is_constant);

    assignments.remove("t");
    assert!(IsConstantAnalogCircuit::new(&assignments).emit(&circuit).is_err());
}
