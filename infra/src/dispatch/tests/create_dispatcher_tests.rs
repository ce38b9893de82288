use hc_core::services::NotificationDispatcher;
use hc_shared::config::PushConfig;

use crate::dispatch::create_dispatcher;

#[test]
fn test_mock_provider() {
    let dispatcher = create_dispatcher(&PushConfig::default());
    assert_eq!(dispatcher.provider_name(), "Mock");
}

#[test]
fn test_expo_provider() {
    let config = PushConfig {
        provider: "expo".to_string(),
        ..PushConfig::default()
    };
    assert_eq!(create_dispatcher(&config).provider_name(), "Expo");

    let config = PushConfig {
        provider: "EXPO".to_string(),
        ..PushConfig::default()
    };
    assert_eq!(create_dispatcher(&config).provider_name(), "Expo");
}

#[test]
fn test_invalid_expo_url_falls_back_to_mock() {
    let config = PushConfig {
        provider: "expo".to_string(),
        url: "not a url".to_string(),
        ..PushConfig::default()
    };
    assert_eq!(create_dispatcher(&config).provider_name(), "Mock");
}

#[test]
fn test_unknown_provider_falls_back_to_mock() {
    let config = PushConfig {
        provider: "carrier-pigeon".to_string(),
        ..PushConfig::default()
    };
    assert_eq!(create_dispatcher(&config).provider_name(), "Mock");
}
