use {dispatch::*, std::time::Duration};

#[test]
fn test_defaults() {
    let config = DispatchConfig::default();
    assert_eq!(config.poll_url(), "http://localhost:8000/detect-hand");
    assert_eq!(config.stream_url(), "ws://localhost:8000/ws/detect-hand");
    assert_eq!(config.interval(), Duration::from_millis(150));
    assert_eq!(config.jpeg_quality(), 80);
    assert_eq!(config.poll_label(), "HTTP");
    assert_eq!(config.poll_color(), Color::GREEN);
    assert_eq!(config.stream_label(), "WS");
    assert_eq!(config.stream_color(), Color::DEEP_SKY_BLUE);
}

#[test]
fn test_builder() {
    let config = DispatchConfig::default()
        .with_poll_url("http://detector:9000/detect-hand")
        .with_stream_url("ws://detector:9000/ws/detect-hand")
        .with_interval(Duration::from_millis(100))
        .with_jpeg_quality(60)
        .with_poll_label("POST")
        .with_poll_color(Color::rgb(1, 2, 3))
        .with_stream_label("SOCKET")
        .with_stream_color(Color::BLACK);
    assert_eq!(config.poll_url(), "http://detector:9000/detect-hand");
    assert_eq!(config.stream_url(), "ws://detector:9000/ws/detect-hand");
    assert_eq!(config.interval(), Duration::from_millis(100));
    assert_eq!(config.jpeg_quality(), 60);
    assert_eq!(config.poll_label(), "POST");
    assert_eq!(config.poll_color(), Color::rgb(1, 2, 3));
    assert_eq!(config.stream_label(), "SOCKET");
    assert_eq!(config.stream_color(), Color::BLACK);
}

#[test]
fn test_quality_is_clamped() {
    assert_eq!(DispatchConfig::default().with_jpeg_quality(0).jpeg_quality(), 1);
    assert_eq!(DispatchConfig::default().with_jpeg_quality(250).jpeg_quality(), 100);
}

#[test]
fn test_color_hex() {
    assert_eq!(Color::from_hex("#00FF00"), Some(Color::GREEN));
    assert_eq!(Color::from_hex("00bfff"), Some(Color::DEEP_SKY_BLUE));
    assert_eq!(Color::from_hex("#00FF0"), None);
    assert_eq!(Color::from_hex("#GG0000"), None);
    assert_eq!(Color::DEEP_SKY_BLUE.to_string(), "#00BFFF");
    assert_eq!("#000000".parse::<Color>(), Ok(Color::BLACK));
    assert!("green".parse::<Color>().is_err());
}

#[test]
fn test_error_display() {
    assert_eq!(DispatchError::SourceNotReady.to_string(), "frame source not ready");
    assert_eq!(DispatchError::ChannelClosed.to_string(), "channel closed");
    assert_eq!(
        DispatchError::Send("timeout".to_string()).to_string(),
        "send failed: timeout"
    );
    let err: DispatchError = com::ComError::ConnectionClosed.into();
    assert!(matches!(err, DispatchError::Send(_)));
}
