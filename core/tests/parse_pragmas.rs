use pulsec_core::builder::Builder;
use pulsec_core::ir::params::{ParamMap, ParamValue, Parameters};
use pulsec_core::ir::register::{AtomArrangement, Register};
use pulsec_core::ir::scalar::Scalar;
use pulsec_core::{ParseErrorKind, generate_error_report};
use rust_decimal_macros::dec;

fn program() -> Builder {
    Builder::new(AtomArrangement::chain(3, 5))
        .rydberg()
        .detuning()
        .uniform()
        .constant("delta", "t")
        .var_scale("mask")
        .constant(1, "t")
}

#[test]
fn no_pragmas_gives_default_parameters() {
    let routine = program().parse().unwrap();
    assert_eq!(routine.params, Parameters::default());
    assert_eq!(routine.params.batch_params, vec![ParamMap::new()]);
}

#[test]
fn duplicate_args_are_all_reported() {
    let err = program().args(["a", "b", "a"]).parse().unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::DuplicateArgs(vec!["a".into()]));

    let err = program().args(["a", "a", "b", "a", "b"]).parse().unwrap_err();
    assert_eq!(
        err.kind(),
        &ParseErrorKind::DuplicateArgs(vec!["a".into(), "a".into(), "b".into()])
    );
}

#[test]
fn args_cannot_name_a_run_time_vector() {
    let err = program().args(["t", "mask"]).parse().unwrap_err();
    assert_eq!(
        err.kind(),
        &ParseErrorKind::VectorArgCollision(vec!["mask".into()])
    );
}

#[test]
fn assign_batch_and_args_fill_parameters() {
    let routine = program()
        .assign([("delta", dec!(1.5))])
        .batch_assign([("t", vec![dec!(1), dec!(2), dec!(3)])])
        .args(["x"])
        .parse()
        .unwrap();

    let params = &routine.params;
    assert_eq!(params.static_params["delta"], ParamValue::Scalar(dec!(1.5)));
    assert_eq!(params.batch_params.len(), 3);
    assert_eq!(params.batch_params[2]["t"], ParamValue::Scalar(dec!(3)));
    assert_eq!(params.args_list, vec!["x".to_string()]);
}

#[test]
fn batch_columns_must_have_equal_length() {
    let err = program()
        .batch_assign([("t", vec![dec!(1), dec!(2)]), ("delta", vec![dec!(1)])])
        .parse()
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &ParseErrorKind::BatchLengthMismatch {
            name: "delta".into(),
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn list_assign_rows_must_share_names() {
    let rows = vec![
        ParamMap::from([("t".to_string(), ParamValue::from(dec!(1)))]),
        ParamMap::from([("delta".to_string(), ParamValue::from(dec!(1)))]),
    ];
    let err = program().list_assign(rows).parse().unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::InconsistentBatchKeys { index: 1 });

    let rows = vec![
        ParamMap::from([("t".to_string(), ParamValue::from(dec!(1)))]),
        ParamMap::from([("t".to_string(), ParamValue::from(dec!(2)))]),
    ];
    let routine = program().list_assign(rows.clone()).parse().unwrap();
    assert_eq!(routine.params.batch_params, rows);
}

#[test]
fn later_batch_pragma_replaces_earlier_one() {
    let routine = program()
        .batch_assign([("t", vec![dec!(1), dec!(2)])])
        .list_assign(vec![ParamMap::from([("t".to_string(), ParamValue::from(dec!(9)))])])
        .parse()
        .unwrap();
    assert_eq!(routine.params.batch_params.len(), 1);
    assert_eq!(routine.params.batch_params[0]["t"], ParamValue::Scalar(dec!(9)));
}

#[test]
fn parallelize_wraps_the_register() {
    let builder = program().parallelize(24);

    let register = builder.parse_register().unwrap();
    let Register::Parallel(parallel) = &register else {
        panic!("expected a parallel register, got {:?}", register);
    };
    assert_eq!(parallel.cluster_spacing, Scalar::from(24));
    assert_eq!(parallel.register, AtomArrangement::chain(3, 5));

    assert_eq!(builder.parse().unwrap().circuit.register, register);
    // parse_circuit skips pragmas
    assert!(matches!(
        builder.parse_circuit().unwrap().register,
        Register::Atoms(_)
    ));
}

#[test]
fn parallelize_twice_keeps_last_spacing() {
    let register = program()
        .parallelize(10)
        .parallelize(20)
        .parse_register()
        .unwrap();
    assert_eq!(
        register,
        Register::Atoms(AtomArrangement::chain(3, 5)).parallelize(Scalar::from(20))
    );
}

#[test]
fn pragma_run_ends_at_first_other_node() {
    let routine = Builder::new(AtomArrangement::chain(1, 1))
        .assign([("t", dec!(1))])
        .rydberg()
        .detuning()
        .uniform()
        .constant(1, "t")
        .args(["ignored"])
        .parse()
        .unwrap();

    assert_eq!(routine.params.static_params.len(), 1);
    assert!(routine.params.args_list.is_empty());
}

#[test]
fn validation_error_renders_a_report() {
    let err = program().args(["a", "a"]).parse().unwrap_err();
    assert_eq!(
        generate_error_report(&err),
        "PULSEC | ERROR | node #7 (Args) | Cannot have duplicate names [\"a\"]."
    );
}

#[test]
fn batch_assignments_merge_all_layers() {
    let routine = program()
        .assign([("delta", dec!(1))])
        .batch_assign([("t", vec![dec!(1), dec!(2)])])
        .args(["delta"])
        .parse()
        .unwrap();

    let runs = routine.params.batch_assignments(&[dec!(7)]).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["delta"], ParamValue::Scalar(dec!(7)));
    assert_eq!(runs[1]["t"], ParamValue::Scalar(dec!(2)));
}
