use super::*;

fn scene_with_cube() -> MemoryScene {
    let mut scene = MemoryScene::new();
    scene.add_transform("pCube1").unwrap();
    scene
}

#[test]
fn short_and_long_names_resolve_to_the_same_plug() {
    let mut scene = scene_with_cube();
    assert!(scene.object_exists("pCube1"));
    assert!(scene.object_exists("pCube1.tx"));
    assert!(scene.object_exists("pCube1.translateX"));
    assert!(scene.object_exists("pCube1.t"));
    assert!(!scene.object_exists("pCube1.doesNotExist"));
    assert!(!scene.object_exists("pSphere1.tx"));

    scene.set_attribute_value("pCube1.tx", 4.0).unwrap();
    assert_eq!(scene.value_of("pCube1.translateX"), Some(4.0));
    assert_eq!(
        scene.attribute_long_name("pCube1", "tx").as_deref(),
        Some("translateX")
    );
}

#[test]
fn compound_attributes_report_children_and_parents() {
    let scene = scene_with_cube();
    assert_eq!(
        scene.attribute_children("pCube1", "t"),
        Some(vec![
            "translateX".to_owned(),
            "translateY".to_owned(),
            "translateZ".to_owned()
        ])
    );
    assert_eq!(scene.attribute_children("pCube1", "tx"), None);
    assert_eq!(
        scene.attribute_parent("pCube1", "ty").as_deref(),
        Some("translate")
    );
    assert_eq!(scene.attribute_parent("pCube1", "visibility"), None);
}

#[test]
fn indexed_compounds_exist_but_are_not_introspected() {
    let mut scene = MemoryScene::new();
    let pma = scene.create_node("plusMinusAverage", "pma").unwrap();
    assert!(scene.object_exists(&format!("{pma}.input3D[0].input3Dx")));
    assert!(scene.object_exists(&format!("{pma}.input3D[4]")));
    assert_eq!(scene.attribute_children(&pma, "input3D[0]"), None);
    assert_eq!(scene.attribute_parent(&pma, "input3D[0].input3Dx"), None);
    assert!(!scene.object_exists(&format!("{pma}.output3D[0]")));
}

#[test]
fn compound_reads_return_lists_with_defaults() {
    let mut scene = scene_with_cube();
    scene.set_attribute_value("pCube1.ty", 2.0).unwrap();
    assert_eq!(
        scene.get_attribute_value("pCube1.t").unwrap(),
        Primitive::List(vec![0.0, 2.0, 0.0])
    );
    assert_eq!(
        scene.get_attribute_value("pCube1.s").unwrap(),
        Primitive::List(vec![1.0, 1.0, 1.0])
    );
    assert!(scene.set_attribute_value("pCube1.t", 1.0).is_err());
}

#[test]
fn connections_check_channel_counts_and_force() {
    let mut scene = scene_with_cube();
    scene.add_transform("pCube2").unwrap();
    scene.connect("pCube1.t", "pCube2.t", true).unwrap();
    assert_eq!(
        scene.source_of("pCube2.translate").as_deref(),
        Some("pCube1.translate")
    );
    assert!(scene.connect("pCube1.tx", "pCube2.r", true).is_err());
    assert!(scene.connect("pCube1.r", "pCube2.t", false).is_err());
    scene.connect("pCube1.r", "pCube2.t", true).unwrap();
    assert_eq!(
        scene.source_of("pCube2.t").as_deref(),
        Some("pCube1.rotate")
    );
    assert_eq!(
        scene.list_connections("pCube1"),
        vec![("pCube1.rotate".to_owned(), "pCube2.translate".to_owned())]
    );
}

#[test]
fn colliding_names_get_a_numeric_suffix() {
    let mut scene = MemoryScene::new();
    let a = scene.create_node("reverse", "rev").unwrap();
    let b = scene.create_node("reverse", "rev").unwrap();
    let c = scene.create_node("reverse", "rev").unwrap();
    assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("rev", "rev1", "rev2"));
    assert!(scene.create_node("noSuchType", "x").is_err());
    assert_eq!(scene.nodes_of_type("reverse").len(), 3);
}

#[test]
fn user_attributes_and_containers() {
    let mut scene = scene_with_cube();
    scene.add_attribute("pCube1", "blendWeight", 0.25).unwrap();
    assert_eq!(scene.value_of("pCube1.blendWeight"), Some(0.25));
    assert!(scene.add_attribute("pCube1", "tx", 0.0).is_err());

    let cont = scene.create_container("box").unwrap();
    scene
        .group_nodes_into_container(&cont, &["pCube1".to_owned()])
        .unwrap();
    scene
        .expose_container_plug(&cont, "pCube1.tx", "pCube1_I_tx")
        .unwrap();
    scene.set_container_metadata_note(&cont, "hello").unwrap();
    let record = scene.container(&cont).unwrap();
    assert_eq!(record.nodes, vec!["pCube1".to_owned()]);
    assert_eq!(record.published.len(), 1);
    assert_eq!(record.notes.as_deref(), Some("hello"));
}

#[test]
fn user_attributes_cannot_shadow_compound_children() {
    let mut scene = scene_with_cube();
    for name in ["tx", "translateX", "sz", "t", "message", "bad.name", ""] {
        assert!(scene.add_attribute("pCube1", name, 0.0).is_err(), "{name}");
    }

    scene.set_attribute_value("pCube1.tx", 7.0).unwrap();
    assert_eq!(scene.value_of("pCube1.tx"), Some(7.0));
    assert_eq!(scene.value_of("pCube1.translateX"), Some(7.0));
    assert_eq!(
        scene.attribute_parent("pCube1", "tx").as_deref(),
        Some("translate")
    );

    let rev = scene.create_node("reverse", "rev").unwrap();
    assert!(scene.add_attribute(&rev, "outputX", 0.0).is_err());
    assert!(
        scene
            .add_user_attribute(&rev, "weight", &AttrSpec::float())
            .is_ok()
    );
    assert!(scene.object_exists("rev.weight"));
}
