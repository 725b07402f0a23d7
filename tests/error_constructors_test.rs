use indexada::error::IndexadaError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        IndexadaError::config("x"),
        IndexadaError::Config { .. }
    ));
    assert!(matches!(
        IndexadaError::feed_format("x"),
        IndexadaError::FeedFormat { .. }
    ));
    assert!(matches!(
        IndexadaError::transport("x"),
        IndexadaError::Transport { .. }
    ));
    assert!(matches!(
        IndexadaError::timeout("x"),
        IndexadaError::Timeout { .. }
    ));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(IndexadaError::api("x"), IndexadaError::Api { .. }));
    assert!(matches!(IndexadaError::io("x"), IndexadaError::Io { .. }));
    assert!(matches!(
        IndexadaError::validation("f", "m"),
        IndexadaError::Validation { .. }
    ));
}

#[test]
fn display_and_user_message() {
    let err = IndexadaError::transport("HTTP 503 Service Unavailable");
    assert_eq!(err.to_string(), "Transport error: HTTP 503 Service Unavailable");
    assert_eq!(err.user_message(), "HTTP 503 Service Unavailable");

    let err = IndexadaError::validation("timezone", "Unknown time zone");
    assert_eq!(err.to_string(), "Validation error: timezone - Unknown time zone");
    assert_eq!(err.user_message(), "timezone: Unknown time zone");
}

#[test]
fn conversions_from_library_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    assert!(matches!(IndexadaError::from(io), IndexadaError::Io { .. }));

    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        IndexadaError::from(json),
        IndexadaError::Serialization { .. }
    ));

    let yaml = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
    assert!(matches!(
        IndexadaError::from(yaml),
        IndexadaError::Serialization { .. }
    ));
}
