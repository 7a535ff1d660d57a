use std::collections::BTreeMap;
use std::time::Duration;

use redbank::app::ViewId;
use redbank::{initialize, AppError, Config};

#[test]
fn map_and_toml_agree() {
    let mut map = BTreeMap::new();
    map.insert("app_title".to_string(), "Blue Bank".to_string());
    map.insert("search_debounce_ms".to_string(), "50".to_string());
    let from_map = Config::from_map(&map);

    let from_toml = Config::from_toml_str("app_title = \"Blue Bank\"\nsearch_debounce_ms = 50\n").unwrap();

    assert_eq!(from_map, from_toml);
    assert_eq!(from_toml.search_debounce().as_millis(), 50);
}

#[test]
fn app_title_flows_into_page_titles() {
    let config = Config {
        app_title: "Blue Bank".to_string(),
        ..Config::default()
    };
    let app = initialize(config, "/about").unwrap();
    assert_eq!(app.document().title(), "About | Blue Bank");
}

#[test]
fn invalid_config_is_rejected_at_startup() {
    let config = Config {
        app_title: String::new(),
        ..Config::default()
    };
    assert!(matches!(initialize(config, "/"), Err(AppError::Config(_))));
}

#[test]
fn route_file_replaces_the_default_table() {
    let dir = tempfile::tempdir().unwrap();
    let routes = dir.path().join("routes.toml");
    std::fs::write(
        &routes,
        "[[routes]]\npath = \"/\"\nview = \"about\"\n\n[[routes]]\npath = \"/dashboard\"\nview = \"home\"\n",
    )
    .unwrap();

    let config = Config {
        routes_file: Some(routes.to_string_lossy().into_owned()),
        ..Config::default()
    };
    let app = initialize(config, "/").unwrap();
    assert_eq!(app.router().current_view(), Some(ViewId::About));
    app.router().navigate("/dashboard").unwrap();
    assert_eq!(app.router().current_view(), Some(ViewId::Home));
    app.router().navigate("/about").unwrap();
    assert_eq!(app.router().current_view(), Some(ViewId::NotFound));
}

#[test]
fn bank_file_persists_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let bank_file = dir.path().join("data").join("bank.json");
    let config = Config {
        bank_file: Some(bank_file.to_string_lossy().into_owned()),
        ..Config::default()
    };

    let app = initialize(config.clone(), "/").unwrap();
    assert!(bank_file.exists());
    app.bank().sign_in(2).unwrap();
    drop(app);

    let reopened = initialize(config, "/").unwrap();
    assert_eq!(reopened.bank().session_user().map(|user| user.id), Some(2));
}

#[test]
fn failed_save_is_reported_and_rolled_back() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let config = Config {
        bank_file: Some(data_dir.join("bank.json").to_string_lossy().into_owned()),
        ..Config::default()
    };
    let app = initialize(config, "/").unwrap();
    app.settle();
    std::fs::remove_dir_all(&data_dir).unwrap();

    let doc = app.document();
    doc.query_selector(r#".actions input[name="amount"]"#)
        .unwrap()
        .unwrap()
        .set_value("100");
    let top_up = doc
        .query_selector_all(".actions button")
        .unwrap()
        .into_iter()
        .find(|button| button.text_content().trim() == "Top-up")
        .unwrap();
    top_up.click();
    app.scheduler().advance(Duration::from_millis(150));

    let banner = doc.query_selector("#notification").unwrap().unwrap();
    assert!(banner.has_class("notification--error"));
    assert!(banner.text_content().starts_with("IO error"));
    assert!((app.bank().user(1).unwrap().card.balance - 2500.0).abs() < f64::EPSILON);
    assert_eq!(
        doc.query_selector("#card .balance").unwrap().unwrap().text_content(),
        "$2,500.00"
    );
    assert!(!top_up.is_disabled());
}
