use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NocaError::unknown_operation("mod")
            .to_string()
            .contains("unknown operation:")
    );
    assert!(NocaError::arity("x").to_string().contains("arity mismatch:"));
    assert!(
        NocaError::dimension("x")
            .to_string()
            .contains("dimension mismatch:")
    );
    assert!(
        NocaError::incompatible("x")
            .to_string()
            .contains("incompatible dimensions:")
    );
    assert!(
        NocaError::target_not_found("a.b")
            .to_string()
            .contains("target not found:")
    );
    assert!(
        NocaError::unsupported_source("x")
            .to_string()
            .contains("unsupported source type:")
    );
    assert!(
        NocaError::unrecognized("x")
            .to_string()
            .contains("unrecognized operand type:")
    );
    assert!(
        NocaError::not_a_branch_test("x")
            .to_string()
            .contains("not a branch-test node:")
    );
    assert!(
        NocaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn messages_carry_the_offending_value() {
    let err = NocaError::target_not_found("pCube1.doesNotExist");
    assert!(err.to_string().contains("pCube1.doesNotExist"));
}

#[test]
fn host_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NocaError::Host(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
