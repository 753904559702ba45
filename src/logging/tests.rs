use super::*;

#[test]
fn test_parse_known_levels() {
    assert_eq!(
        LevelSetting::parse(Some("NOTSET")),
        LevelSetting::Level(FilterLevel::Trace)
    );
    assert_eq!(
        LevelSetting::parse(Some("DEBUG")),
        LevelSetting::Level(FilterLevel::Debug)
    );
    assert_eq!(
        LevelSetting::parse(Some("INFO")),
        LevelSetting::Level(FilterLevel::Info)
    );
    assert_eq!(
        LevelSetting::parse(Some("WARN")),
        LevelSetting::Level(FilterLevel::Warning)
    );
    assert_eq!(
        LevelSetting::parse(Some("ERROR")),
        LevelSetting::Level(FilterLevel::Error)
    );
    assert_eq!(
        LevelSetting::parse(Some("CRITICAL")),
        LevelSetting::Level(FilterLevel::Critical)
    );
}

#[test]
fn test_parse_invalid_level() {
    assert_eq!(
        LevelSetting::parse(Some("VERBOSE")),
        LevelSetting::Invalid("VERBOSE".to_string())
    );
    // names are matched exactly
    assert_eq!(
        LevelSetting::parse(Some("debug")),
        LevelSetting::Invalid("debug".to_string())
    );
}

#[test]
fn test_parse_unset_level() {
    assert_eq!(LevelSetting::parse(None), LevelSetting::Unset);
    assert_eq!(LevelSetting::parse(Some("")), LevelSetting::Unset);
}
