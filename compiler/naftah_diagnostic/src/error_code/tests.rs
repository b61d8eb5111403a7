use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E3002.as_str(), "E3002");
    assert_eq!(format!("{}", ErrorCode::E9001), "E9001");
}

#[test]
fn test_error_code_areas() {
    assert!(ErrorCode::E1003.is_scope_error());
    assert!(ErrorCode::E2003.is_type_error());
    assert!(ErrorCode::E3001.is_control_flow_error());
    assert!(ErrorCode::E4005.is_call_error());
    assert!(ErrorCode::E5002.is_native_error());
    assert!(ErrorCode::E6002.is_operator_error());

    assert!(!ErrorCode::E2001.is_scope_error());
    assert!(!ErrorCode::E9002.is_operator_error());
}
