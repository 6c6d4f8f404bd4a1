use crate::domain::entities::verification_code::*;

#[test]
fn test_issued_code_deadlines() {
    let issued = IssuedCode::new("13800001111".to_string(), "4821".to_string(), 300, 60);

    assert_eq!(issued.phone, "13800001111");
    assert_eq!(issued.code, "4821");
    assert_eq!((issued.expires_at - issued.issued_at).num_seconds(), 300);
    assert_eq!((issued.resend_available_at - issued.issued_at).num_seconds(), 60);
}

#[test]
fn test_phone_is_kept_verbatim() {
    let issued = IssuedCode::new(" +86 138 0000 1111".to_string(), "4821".to_string(), 300, 60);
    assert_eq!(issued.phone, " +86 138 0000 1111");
}

#[test]
fn test_code_range_is_four_digits() {
    assert_eq!(CODE_MIN.to_string().len(), 4);
    assert_eq!(CODE_MAX.to_string().len(), 4);
}
