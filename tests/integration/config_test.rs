use droidtop::core::config::Config;
use droidtop::core::privileged::TierPreference;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.tier_preference, TierPreference::Auto);
    assert_eq!(config.sample_interval_ms, 1000);
    assert_eq!(config.history_capacity, 60);
    assert!((config.utilization_exponent - 2.5).abs() < f32::EPSILON);
}

#[test]
fn test_config_json_roundtrip() {
    let config = Config {
        tier_preference: TierPreference::Superuser,
        sample_interval_ms: 500,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_tier_preference_serializes_uppercase() {
    let json = serde_json::to_string(&TierPreference::Elevated).unwrap();
    assert_eq!(json, "\"ELEVATED\"");
    let parsed: TierPreference = serde_json::from_str("\"AUTO\"").unwrap();
    assert_eq!(parsed, TierPreference::Auto);
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    // older config files may carry only the tier preference
    let parsed: Config = serde_json::from_str(r#"{"tier_preference":"SUPERUSER"}"#).unwrap();
    assert_eq!(parsed.tier_preference, TierPreference::Superuser);
    assert_eq!(parsed.sample_interval_ms, 1000);
}

#[test]
fn test_config_load_never_panics() {
    // Loading against whatever is (or is not) on disk must not fail hard
    let _config = Config::load();
}
