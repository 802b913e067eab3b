use wspec_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn second_init_returns_subscriber_error() {
    let _logger = Logger::builder()
        .name("winspector-first")
        .directive("wspec_knowledge=debug,info")
        .init()
        .expect("first init should succeed");

    let err = Logger::builder()
        .name("winspector-second")
        .level(LevelFilter::WARN)
        .init()
        .expect_err("second init should fail");

    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );
}
