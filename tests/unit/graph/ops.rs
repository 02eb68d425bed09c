use super::*;
use crate::host::memory::MemoryScene;
use pretty_assertions::assert_eq;

fn calc() -> Calculator<MemoryScene> {
    let mut scene = MemoryScene::new();
    scene.add_transform("a").unwrap();
    scene.add_transform("b").unwrap();
    Calculator::new(scene).unwrap()
}

#[test]
fn named_helpers_create_their_node_types() {
    let calc = calc();
    calc.blend("a.t", "b.t", 0.25).unwrap();
    calc.length("a.t", "b.t").unwrap();
    calc.clamp("a.t", 0, 1).unwrap();
    calc.remap("a.tx", 0, 1, -10, 10).unwrap();
    calc.dot("a.t", "b.t", false).unwrap();
    calc.cross("a.t", "b.t", true).unwrap();
    calc.reverse("a.t").unwrap();
    calc.angle_between("a.t", "b.t").unwrap();
    calc.average(["a.t", "b.t"]).unwrap();
    calc.sum(vec![Operand::from("a.tx"), Operand::from(1), Operand::from(2)])
        .unwrap();

    let scene = calc.scene();
    for node_type in [
        "blendColors",
        "distanceBetween",
        "clamp",
        "setRange",
        "reverse",
        "angleBetween",
    ] {
        assert_eq!(scene.nodes_of_type(node_type).len(), 1, "{node_type}");
    }
    assert_eq!(scene.nodes_of_type("vectorProduct").len(), 2);
    assert_eq!(scene.nodes_of_type("plusMinusAverage").len(), 2);
}

#[test]
fn multi_index_helpers_accept_many_operands() {
    let calc = calc();
    let out = calc.add(["a.tx", "a.ty", "a.tz", "b.tx"]).unwrap();
    let node = out.node().unwrap().to_owned();
    let scene = calc.scene();
    assert_eq!(
        scene.source_of(&format!("{node}.input3D[3].input3Dx")).as_deref(),
        Some("b.translateX")
    );
    assert_eq!(scene.value_of(&format!("{node}.operation")), Some(1.0));
}

#[test]
fn condition_wires_both_branches_to_the_widest_branch() {
    let calc = calc();
    let test = calc.node("a.tx").greater(2).unwrap();
    let out = calc.condition(&test, vec![1, 2, 3], 0).unwrap();
    let node = test.node().unwrap().to_owned();

    assert_eq!(out.len(), 3);
    assert_eq!(
        out.plug().unwrap(),
        vec![
            format!("{node}.outColorR"),
            format!("{node}.outColorG"),
            format!("{node}.outColorB"),
        ]
    );
    let scene = calc.scene();
    assert_eq!(scene.value_of(&format!("{node}.colorIfTrueB")), Some(3.0));
    assert_eq!(scene.value_of(&format!("{node}.colorIfFalseG")), Some(0.0));
}

#[test]
fn condition_with_scalar_branches_yields_one_channel() {
    let calc = calc();
    let test = calc.node("a.tx").less_equal("b.tx").unwrap();
    let out = calc.condition(&test, "a.ty", 5).unwrap();
    assert_eq!(out.len(), 1);
    let node = test.node().unwrap().to_owned();
    assert_eq!(
        calc.scene()
            .source_of(&format!("{node}.colorIfTrueR"))
            .as_deref(),
        Some("a.translateY")
    );
}

#[test]
fn condition_rejects_anything_but_a_staged_test() {
    let calc = calc();
    let err = calc
        .condition(&calc.node("a.tx"), 1, 0)
        .unwrap_err();
    assert!(matches!(err, NocaError::NotABranchTest(_)));

    let sum = (calc.node("a.tx") + 1.0).unwrap();
    let err = calc.condition(&sum, 1, 0).unwrap_err();
    assert!(matches!(err, NocaError::NotABranchTest(_)));

    let err = calc.condition(&calc.literal(1.0), 1, 0).unwrap_err();
    assert!(matches!(err, NocaError::NotABranchTest(_)));
}

#[test]
fn choice_wires_each_input_then_the_selector() {
    let calc = calc();
    let out = calc.choice(["a.tx", "b.tx"], "a.ty").unwrap();
    let node = out.node().unwrap().to_owned();
    assert_eq!(out.plug().unwrap(), vec![format!("{node}.output")]);

    let scene = calc.scene();
    assert_eq!(scene.node_type_of(&node).as_deref(), Some("choice"));
    for (slot, source) in [
        ("input[0]", "a.translateX"),
        ("input[1]", "b.translateX"),
        ("selector", "a.translateY"),
    ] {
        assert_eq!(
            scene.source_of(&format!("{node}.{slot}")).as_deref(),
            Some(source),
            "{slot}"
        );
    }
}

#[test]
fn choice_needs_at_least_one_input() {
    let calc = calc();
    let err = calc.choice(Vec::<Operand>::new(), 0).unwrap_err();
    assert!(matches!(err, NocaError::ArityMismatch(_)));
    assert!(calc.scene().nodes_of_type("choice").is_empty());
}

#[test]
fn vector_products_carry_the_normalize_switch() {
    let calc = calc();
    let dot = calc.dot("a.t", "b.t", true).unwrap();
    let cross = calc.cross("a.t", "b.t", false).unwrap();
    assert_eq!(dot.len(), 1);
    assert_eq!(cross.len(), 3);

    let scene = calc.scene();
    let (dot, cross) = (dot.node().unwrap(), cross.node().unwrap());
    assert_eq!(scene.value_of(&format!("{dot}.normalizeOutput")), Some(1.0));
    assert_eq!(scene.value_of(&format!("{cross}.normalizeOutput")), Some(0.0));
    assert_eq!(scene.value_of(&format!("{cross}.operation")), Some(2.0));
}

#[test]
fn default_helpers_fill_in_the_usual_arguments() {
    let calc = calc();
    let magnitude = calc.magnitude("a.t").unwrap();
    let midpoint = calc.midpoint("a.t", "b.t").unwrap();
    let saturated = calc.saturate("a.tx").unwrap();
    let test = calc.node("a.tx").greater(0).unwrap();
    let flag = calc.condition_flag(&test).unwrap();
    assert_eq!(flag.len(), 1);

    let scene = calc.scene();
    let magnitude = magnitude.node().unwrap();
    assert_eq!(scene.value_of(&format!("{magnitude}.point2Y")), Some(0.0));
    assert_eq!(
        scene.value_of(&format!("{}.blender", midpoint.node().unwrap())),
        Some(0.5)
    );
    let saturated = saturated.node().unwrap();
    assert_eq!(scene.value_of(&format!("{saturated}.minR")), Some(0.0));
    assert_eq!(scene.value_of(&format!("{saturated}.maxR")), Some(1.0));
    let test = test.node().unwrap();
    assert_eq!(scene.value_of(&format!("{test}.colorIfTrueR")), Some(0.0));
    assert_eq!(scene.value_of(&format!("{test}.colorIfFalseR")), Some(1.0));
}
