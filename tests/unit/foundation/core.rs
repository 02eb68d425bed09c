use super::*;

#[test]
fn split_plug_keeps_indexed_attribute_paths() {
    assert_eq!(split_plug("pCube1.tx"), Some(("pCube1", "tx")));
    assert_eq!(
        split_plug("pma1.input3D[0].input3Dx"),
        Some(("pma1", "input3D[0].input3Dx"))
    );
    assert_eq!(split_plug("pCube1"), None);
    assert_eq!(split_plug(".tx"), None);
    assert_eq!(split_plug("pCube1."), None);
}

#[test]
fn number_tokens_truncate_fractions() {
    assert_eq!(number_token(5.0), "5");
    assert_eq!(number_token(2.7), "2f");
    assert_eq!(number_token(-3.0), "-3");
    assert_eq!(number_token(f64::NAN), "nan");
}

#[test]
fn format_number_drops_integral_fraction() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(0.5), "0.5");
}

#[test]
fn sanitize_and_alnum() {
    assert_eq!(sanitize_node_name("nc_ADD_-3_x"), "nc_ADD__3_x");
    assert_eq!(alnum_only("|grp|pCube_1"), "grppCube1");
    assert_eq!(last_segment("input3D[0].input3Dx"), "input3Dx");
    assert_eq!(last_segment("tx"), "tx");
}
