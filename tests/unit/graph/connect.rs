use super::*;
use crate::graph::engine::CalculatorOpts;
use crate::host::memory::MemoryScene;
use crate::provenance::value::ProvenanceValue;

fn calc() -> Calculator<MemoryScene> {
    let mut scene = MemoryScene::new();
    scene.add_transform("pCube1").unwrap();
    scene.add_transform("pCube2").unwrap();
    Calculator::new(scene).unwrap()
}

#[test]
fn numbers_are_set_and_plugs_are_connected() {
    let calc = calc();
    calc.set_or_connect("pCube1.tx", 5.0).unwrap();
    calc.set_or_connect("pCube2.ty", "pCube1.tx").unwrap();

    let scene = calc.scene();
    assert_eq!(scene.value_of("pCube1.tx"), Some(5.0));
    assert_eq!(
        scene.source_of("pCube2.ty").as_deref(),
        Some("pCube1.translateX")
    );
}

#[test]
fn full_child_runs_collapse_to_the_parent() {
    let calc = calc();
    calc.set_or_connect("pCube2.t", "pCube1.t").unwrap();
    assert_eq!(
        calc.scene().connections(),
        vec![(
            "pCube1.translate".to_owned(),
            "pCube2.translate".to_owned()
        )]
    );
}

#[test]
fn partial_child_runs_wire_per_channel() {
    let calc = calc();
    let targets = vec!["pCube2.tx", "pCube2.tz"];
    let sources = vec!["pCube1.tx", "pCube1.tz"];
    calc.set_or_connect(targets, sources).unwrap();
    assert_eq!(calc.scene().connections().len(), 2);
    assert_eq!(
        calc.scene().source_of("pCube2.tz").as_deref(),
        Some("pCube1.translateZ")
    );
}

#[test]
fn single_sources_broadcast_without_collapsing() {
    let calc = calc();
    calc.set_or_connect("pCube2.s", "pCube1.tx").unwrap();
    let scene = calc.scene();
    for child in ["scaleX", "scaleY", "scaleZ"] {
        assert_eq!(
            scene.source_of(&format!("pCube2.{child}")).as_deref(),
            Some("pCube1.translateX")
        );
    }
}

#[test]
fn literal_sources_never_collapse() {
    let calc = calc();
    calc.set_or_connect("pCube1.r", vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(calc.scene().value_of("pCube1.rotateY"), Some(2.0));
    assert!(calc.scene().connections().is_empty());
}

#[test]
fn mismatched_lengths_are_incompatible() {
    let calc = calc();
    let err = calc
        .set_or_connect(vec!["pCube1.tx", "pCube1.ty"], vec![1.0, 2.0, 3.0])
        .unwrap_err();
    assert!(matches!(err, NocaError::IncompatibleDimensions(_)));

    // a single target never fans in from several sources
    let err = calc
        .set_or_connect(vec!["pCube1.tx"], "pCube2.t")
        .unwrap_err();
    assert!(matches!(err, NocaError::IncompatibleDimensions(_)));
}

#[test]
fn more_than_three_channels_is_a_dimension_mismatch() {
    let calc = calc();
    let err = calc
        .set_or_connect("pCube1.tx", vec![1.0, 2.0, 3.0, 4.0])
        .unwrap_err();
    assert!(matches!(err, NocaError::DimensionMismatch(_)));
}

#[test]
fn the_channel_ceiling_follows_the_options() {
    let mut scene = MemoryScene::new();
    scene.add_transform("pCube1").unwrap();
    let opts = CalculatorOpts {
        max_channels: 2,
        ..CalculatorOpts::default()
    };
    let calc = Calculator::with_opts(scene, opts).unwrap();
    let err = calc.set_or_connect("pCube1.t", 1.0).unwrap_err();
    assert!(matches!(err, NocaError::DimensionMismatch(_)));
}

#[test]
fn missing_targets_and_unusable_sources_are_reported() {
    let calc = calc();
    let err = calc.set_or_connect("pCube1.nope", 1.0).unwrap_err();
    assert!(matches!(err, NocaError::TargetNotFound(_)));

    let source = Reference::node("pCube1").access("nope");
    let err = calc.set_or_connect("pCube1.tx", source).unwrap_err();
    assert!(matches!(err, NocaError::UnsupportedSourceType(_)));
}

#[test]
fn existing_connections_are_replaced_when_forcing() {
    let calc = calc();
    calc.set_or_connect("pCube2.tx", "pCube1.tx").unwrap();
    calc.set_or_connect("pCube2.tx", "pCube1.ty").unwrap();
    assert_eq!(
        calc.scene().source_of("pCube2.tx").as_deref(),
        Some("pCube1.translateY")
    );

    let mut scene = MemoryScene::new();
    scene.add_transform("a").unwrap();
    scene.add_transform("b").unwrap();
    let opts = CalculatorOpts {
        force_connections: false,
        ..CalculatorOpts::default()
    };
    let strict = Calculator::with_opts(scene, opts).unwrap();
    strict.set_or_connect("b.tx", "a.tx").unwrap();
    let err = strict.set_or_connect("b.tx", "a.ty").unwrap_err();
    assert!(matches!(err, NocaError::Host(_)));
}

#[test]
fn traced_sets_print_the_source_expression() {
    let calc = calc();
    calc.recorder.borrow_mut().begin_trace(true);
    calc.set_or_connect("pCube1.tx", ProvenanceValue::new(3.0, "val1 + 2", false))
        .unwrap();
    calc.set_or_connect("pCube1.ty", 4.0).unwrap();
    assert_eq!(
        calc.recorder.borrow().commands(),
        ["set('pCube1.tx', val1 + 2)", "set('pCube1.ty', 4)"]
    );
}
