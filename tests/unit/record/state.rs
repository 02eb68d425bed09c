use super::*;

#[test]
fn nothing_is_recorded_while_tracing_is_off() {
    let mut state = RecorderState::default();
    state.record_create("nc_ADD_tx_5_plusMinusAverage", "plusMinusAverage");
    state.record_set("pCube1.tx", "5");
    assert_eq!(state.record_get("pCube1.tx"), None);
    assert!(state.commands().is_empty());
    assert!(state.created_nodes().is_empty());
}

#[test]
fn traced_nodes_are_referred_to_by_variable() {
    let mut state = RecorderState::default();
    state.begin_trace(true);
    state.record_create("pma", "plusMinusAverage");
    state.record_set("pma.operation", "1");
    state.record_connect("pCube1.tx", "pma.input3D[0].input3Dx");
    assert_eq!(
        state.commands(),
        [
            "var1 = create_node('plusMinusAverage', name='pma')",
            "set(var1 + '.operation', 1)",
            "connect('pCube1.tx', var1 + '.input3D[0].input3Dx')",
        ]
    );
}

#[test]
fn reads_get_numbered_value_labels() {
    let mut state = RecorderState::default();
    state.begin_trace(true);
    assert_eq!(state.record_get("pCube1.tx").as_deref(), Some("val1"));
    assert_eq!(state.record_get("pCube1.ty").as_deref(), Some("val2"));
    assert_eq!(state.commands()[1], "val2 = get('pCube1.ty')");
}

#[test]
fn beginning_a_trace_restarts_numbering() {
    let mut state = RecorderState::default();
    state.begin_trace(true);
    state.record_create("a", "clamp");
    let first = state.end_trace();
    assert_eq!(first.len(), 1);
    assert!(!state.is_tracing());

    state.begin_trace(true);
    state.record_create("b", "clamp");
    assert_eq!(state.commands(), ["var1 = create_node('clamp', name='b')"]);
}

#[test]
fn beginning_a_container_forgets_earlier_nodes() {
    let mut state = RecorderState::default();
    state.record_create("a", "clamp");
    state.begin_container();
    state.record_create("b", "clamp");
    assert_eq!(state.created_nodes(), ["b"]);
}

#[test]
fn nodes_are_only_collected_inside_a_container() {
    let mut state = RecorderState::default();
    for i in 0..50 {
        state.record_create(&format!("n{i}"), "clamp");
    }
    assert!(state.created_nodes().is_empty());

    state.begin_container();
    state.record_create("inside", "clamp");
    assert_eq!(state.created_nodes(), ["inside"]);
    state.end_container();
    assert!(state.created_nodes().is_empty());

    state.record_create("after", "clamp");
    assert!(state.created_nodes().is_empty());
}

#[test]
fn nested_containers_keep_collecting_until_the_outer_one_closes() {
    let mut state = RecorderState::default();
    state.begin_container();
    state.begin_container();
    state.record_create("a", "clamp");
    state.end_container();
    state.record_create("b", "clamp");
    assert_eq!(state.created_nodes(), ["a", "b"]);
    state.end_container();
    assert!(state.created_nodes().is_empty());
}

#[test]
fn attribute_creation_names_the_node_by_variable_once_traced() {
    let mut state = RecorderState::default();
    state.begin_trace(true);
    let flags = ["attribute_type='float'".to_owned()];
    state.record_add_attr("pCube1", "weight", &flags);
    state.record_create("pma", "plusMinusAverage");
    state.record_add_attr("pma", "extra", &flags);
    assert_eq!(
        state.commands(),
        [
            "add_attr('pCube1', long_name='weight', attribute_type='float')",
            "var1 = create_node('plusMinusAverage', name='pma')",
            "add_attr(var1, long_name='extra', attribute_type='float')",
        ]
    );
}
