use super::*;
use crate::host::memory::MemoryScene;

fn calc() -> Calculator<MemoryScene> {
    let mut scene = MemoryScene::new();
    scene.add_transform("pCube1").unwrap();
    scene.add_transform("pCube2").unwrap();
    Calculator::new(scene).unwrap()
}

#[test]
fn opts_parse_from_json_with_defaults() {
    let opts = CalculatorOpts::from_json(r#"{"node_prefix": "rig"}"#).unwrap();
    assert_eq!(opts.node_prefix, "rig");
    assert!(opts.force_connections);
    assert_eq!(opts.max_channels, 3);
}

#[test]
fn invalid_opts_are_rejected() {
    for src in [
        r#"{"max_channels": 0}"#,
        r#"{"max_channels": 4}"#,
        r#"{"node_prefix": ""}"#,
        r#"{"node_prefix": "9lives"}"#,
        r#"{"node_prefix": "a.b"}"#,
        r#"{"force_connections": "yes"}"#,
    ] {
        let err = CalculatorOpts::from_json(src).unwrap_err();
        assert!(matches!(err, NocaError::Validation(_)), "{src}");
    }
}

#[test]
fn apply_names_the_node_after_operation_and_operands() {
    let calc = calc();
    let out = calc
        .apply("add", &[Operand::from("pCube1.tx"), Operand::from(5)])
        .unwrap();
    assert_eq!(out.node(), Some("nc_ADD_tx_5_plusMinusAverage"));

    let out = calc
        .apply("mul", &[Operand::from("pCube1.t"), Operand::from(2.5)])
        .unwrap();
    assert_eq!(out.node(), Some("nc_MUL_t_2f_multiplyDivide"));
}

#[test]
fn apply_writes_the_mode_and_wires_each_slot() {
    let calc = calc();
    let out = calc
        .apply("sub", &[Operand::from("pCube1.tx"), Operand::from(5)])
        .unwrap();
    let node = out.node().unwrap().to_owned();
    let scene = calc.scene();
    assert_eq!(scene.value_of(&format!("{node}.operation")), Some(2.0));
    assert_eq!(
        scene.source_of(&format!("{node}.input3D[0].input3Dx")).as_deref(),
        Some("pCube1.translateX")
    );
    assert_eq!(
        scene.value_of(&format!("{node}.input3D[1].input3Dx")),
        Some(5.0)
    );
}

#[test]
fn zero_modes_are_written_too() {
    let calc = calc();
    let out = calc
        .apply("eq", &[Operand::from("pCube1.tx"), Operand::from(1)])
        .unwrap();
    let node = out.node().unwrap().to_owned();
    assert_eq!(out.reference(), &Reference::node(node.clone()));
    assert_eq!(calc.scene().value_of(&format!("{node}.operation")), Some(0.0));
}

#[test]
fn output_width_follows_the_widest_operand() {
    let calc = calc();
    let one = calc
        .apply("add", &[Operand::from("pCube1.tx"), Operand::from("pCube2.tx")])
        .unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(
        one.plug(),
        Some(vec![format!("{}.output3Dx", one.node().unwrap())])
    );

    let three = calc
        .apply("add", &[Operand::from("pCube1.t"), Operand::from(5)])
        .unwrap();
    assert_eq!(three.len(), 3);

    let length = calc
        .apply("length", &[Operand::from("pCube1.t"), Operand::from("pCube2.t")])
        .unwrap();
    assert_eq!(
        length.reference(),
        &Reference::Node {
            node: "nc_LENGTH_t_t_distanceBetween".to_owned(),
            attrs: Attrs::One("distance".to_owned()),
        }
    );
}

#[test]
fn arity_is_checked_before_any_node_is_created() {
    let calc = calc();
    let err = calc
        .apply(
            "blend",
            &[
                Operand::from(1),
                Operand::from(2),
                Operand::from(3),
                Operand::from(4),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, NocaError::ArityMismatch(_)));

    let err = calc.apply("add", &[]).unwrap_err();
    assert!(matches!(err, NocaError::ArityMismatch(_)));
    assert_eq!(calc.scene().nodes().len(), 2);
}

#[test]
fn unknown_operations_and_bad_operands_fail_early() {
    let calc = calc();
    let err = calc.apply("frobnicate", &[Operand::from(1)]).unwrap_err();
    assert!(matches!(err, NocaError::UnknownOperation(_)));

    let err = calc
        .apply("add", &[Operand::from("no such plug"), Operand::from(1)])
        .unwrap_err();
    assert!(matches!(err, NocaError::UnrecognizedOperandType(_)));
    assert_eq!(calc.scene().nodes().len(), 2);
}

#[test]
fn single_channel_slots_reject_vectors() {
    let calc = calc();
    let err = calc
        .apply("gt", &[Operand::from("pCube1.t"), Operand::from(1)])
        .unwrap_err();
    assert!(matches!(err, NocaError::DimensionMismatch(_)));
    // the node was created before the failing slot
    assert_eq!(calc.scene().nodes_of_type("condition").len(), 1);
}

#[test]
fn created_nodes_are_recorded_for_containers() {
    let calc = calc();
    calc.recorder.borrow_mut().begin_container();
    calc.apply("reverse", &[Operand::from("pCube1.t")]).unwrap();
    assert_eq!(
        calc.recorder.borrow().created_nodes(),
        ["nc_REVERSE_t_reverse"]
    );
}

#[test]
fn name_collisions_get_a_numeric_suffix() {
    let calc = calc();
    let a = calc.apply("reverse", &[Operand::from("pCube1.t")]).unwrap();
    let b = calc.apply("reverse", &[Operand::from("pCube1.t")]).unwrap();
    assert_ne!(a.node(), b.node());
    assert!(b.node().unwrap().starts_with("nc_REVERSE_t_reverse"));
}
