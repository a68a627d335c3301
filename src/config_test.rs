use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u64 = env_parse("__ROOMPLAN_TEST_NONEXISTENT__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__ROOMPLAN_TEST_EP_VALID__", " 99 ") };
    let val: u64 = env_parse("__ROOMPLAN_TEST_EP_VALID__", 0);
    assert_eq!(val, 99);
    unsafe { std::env::remove_var("__ROOMPLAN_TEST_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__ROOMPLAN_TEST_EP_INVALID__", "soon") };
    let val: u64 = env_parse("__ROOMPLAN_TEST_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__ROOMPLAN_TEST_EP_INVALID__") };
}

// =============================================================================
// StoreConfig::new
// =============================================================================

#[test]
fn new_trims_trailing_slash() {
    let config = StoreConfig::new("https://db.example.com/", "key").unwrap();
    assert_eq!(config.url, "https://db.example.com");
    assert_eq!(config.table, DEFAULT_TABLE);
    assert_eq!(config.timeouts, Timeouts::default());
}

#[test]
fn new_rejects_empty_url() {
    assert!(matches!(StoreConfig::new("  ", "key"), Err(ConfigError::Invalid(_))));
}

#[test]
fn new_rejects_non_http_url() {
    assert!(matches!(StoreConfig::new("ftp://db.example.com", "key"), Err(ConfigError::Invalid(_))));
}

#[test]
fn table_url_joins_rest_path() {
    let config = StoreConfig::new("http://127.0.0.1:54321", "key").unwrap();
    assert_eq!(config.table_url(), "http://127.0.0.1:54321/rest/v1/projects");
}

// =============================================================================
// from_env: one test so env mutations don't race each other
// =============================================================================

#[test]
fn from_env_requires_url_and_key_then_reads_optionals() {
    unsafe {
        std::env::remove_var("ROOMPLAN_STORE_URL");
        std::env::remove_var("ROOMPLAN_STORE_KEY");
    }
    match StoreConfig::from_env() {
        Err(ConfigError::Missing { var }) => assert_eq!(var, "ROOMPLAN_STORE_URL"),
        other => panic!("expected missing url, got {other:?}"),
    }

    unsafe { std::env::set_var("ROOMPLAN_STORE_URL", "https://db.example.com") };
    match StoreConfig::from_env() {
        Err(ConfigError::Missing { var }) => assert_eq!(var, "ROOMPLAN_STORE_KEY"),
        other => panic!("expected missing key, got {other:?}"),
    }

    unsafe {
        std::env::set_var("ROOMPLAN_STORE_KEY", "anon");
        std::env::set_var("ROOMPLAN_STORE_TABLE", "floorplans");
        std::env::set_var("ROOMPLAN_REQUEST_TIMEOUT_SECS", "5");
    }
    let config = StoreConfig::from_env().unwrap();
    assert_eq!(config.api_key, "anon");
    assert_eq!(config.table, "floorplans");
    assert_eq!(config.timeouts.request_secs, 5);
    assert_eq!(config.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);

    unsafe {
        std::env::remove_var("ROOMPLAN_STORE_URL");
        std::env::remove_var("ROOMPLAN_STORE_KEY");
        std::env::remove_var("ROOMPLAN_STORE_TABLE");
        std::env::remove_var("ROOMPLAN_REQUEST_TIMEOUT_SECS");
    }
}

#[test]
fn autosave_delay_defaults_to_two_seconds() {
    unsafe { std::env::remove_var("ROOMPLAN_AUTOSAVE_MS") };
    assert_eq!(autosave_delay_from_env(), Duration::from_millis(2000));
}
