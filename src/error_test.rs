use super::*;

#[test]
fn test_err_at_msg_form() {
    let res: Result<()> = err_at!(Fatal, msg: "bad thing {}", 42);
    match res {
        Err(Error::Fatal(msg)) => assert!(msg.contains("bad thing 42")),
        _ => panic!("expected Fatal error"),
    }
}

#[test]
fn test_err_at_wraps_foreign_result() {
    let parsed: result::Result<i32, std::num::ParseIntError> = "nope".parse();
    let res: Result<i32> = err_at!(InvalidConfig, parsed);
    assert!(matches!(res, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_display_variants() {
    assert_eq!(
        format!("{}", Error::RetryExhausted("x".to_string())),
        "RetryExhausted: x"
    );
}
