use std::collections::HashMap;

use vibecheck::config::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = Config::from_lookup(lookup(&[])).expect("config");

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.redirect_uri, "http://127.0.0.1:8888/callback");
    assert_eq!(config.enrich_limit, 30);
    assert_eq!(config.enrich_workers, 1);
    assert_eq!(config.page_size, 50);
    assert_eq!(config.client_secret, None);

    // token-only commands work without OAuth settings
    assert!(config.ensure_oauth().is_err());
}

#[test]
fn test_overrides() {
    let config = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", ""),
        ("SPOTIFY_API_URL", "http://localhost:9000/v1/"),
        ("VIBECHECK_ENRICH_LIMIT", "10"),
        ("VIBECHECK_ENRICH_DELAY_MS", " 250 "),
        ("VIBECHECK_ENRICH_WORKERS", "0"),
        ("VIBECHECK_PAGE_SIZE", "500"),
    ]))
    .expect("config");

    assert_eq!(config.client_id, "abc");
    // empty secret means none
    assert_eq!(config.client_secret, None);
    assert_eq!(config.api_url, "http://localhost:9000/v1");
    assert_eq!(config.enrich_limit, 10);
    assert_eq!(config.enrich_delay().as_millis(), 250);
    // clamped
    assert_eq!(config.enrich_workers, 1);
    assert_eq!(config.page_size, 50);
    assert!(config.ensure_oauth().is_ok());
}

#[test]
fn test_invalid_number() {
    let result = Config::from_lookup(lookup(&[("VIBECHECK_ENRICH_LIMIT", "thirty")]));

    let err = result.expect_err("invalid limit");
    assert!(err.to_string().contains("VIBECHECK_ENRICH_LIMIT"));
}
