mod common;

use redbank::app::{RouteEntry, ViewId};
use redbank::browser::Window;
use redbank::dom::Document;
use redbank::query::Query;
use redbank::screens::ScreenFactory;
use redbank::services::Signal;
use redbank::{initialize, AppError, Config, RouteTable, Router};

use common::{boot, boot_with, context};

fn content_text(harness: &common::Harness) -> String {
    harness.router.content_slot().unwrap().text_content()
}

#[test]
fn unknown_path_renders_not_found() {
    let app = initialize(Config::default(), "/missing").unwrap();
    assert_eq!(app.router().current_view(), Some(ViewId::NotFound));
    assert_eq!(app.document().title(), "Not found | Red Bank");
}

#[test]
fn navigate_to_current_path_is_a_no_op() {
    let harness = boot("/about");
    let before = content_text(&harness);
    let history = harness.window().history_len();

    assert!(!harness.router.navigate("/about").unwrap());

    assert_eq!(harness.window().history_len(), history);
    assert_eq!(harness.router.resolutions(), 1);
    assert_eq!(content_text(&harness), before);
}

#[test]
fn navigation_keeps_the_layout_and_swaps_content() {
    let harness = boot("/");
    let layout = harness.router.layout_element().unwrap();
    let history = harness.window().history_len();

    assert!(harness.router.navigate("/about").unwrap());

    assert_eq!(harness.window().history_len(), history + 1);
    assert_eq!(harness.router.current_view(), Some(ViewId::About));
    assert_eq!(harness.router.layout_element().unwrap(), layout);
    assert_eq!(harness.router.content_slot().unwrap().children().len(), 1);
    let doc = harness.ctx().document();
    assert_eq!(doc.query_selector_all(".layout").unwrap().len(), 1);
    assert_eq!(doc.query_selector_all("header.header").unwrap().len(), 1);
    assert_eq!(doc.title(), "About | Red Bank");
}

#[test]
fn relative_paths_resolve_against_the_location() {
    let harness = boot("/about");
    assert!(harness.router.navigate("./").unwrap());
    assert_eq!(harness.router.current_path(), "/");
    assert_eq!(harness.router.current_view(), Some(ViewId::Home));
}

#[test]
fn anchor_click_is_intercepted() {
    let harness = boot("/");
    let history = harness.window().history_len();
    let link = harness
        .ctx()
        .document()
        .query_selector(r#"nav.menu a[href="/about"]"#)
        .unwrap()
        .unwrap();

    let event = link.click();

    assert!(event.default_prevented());
    assert_eq!(harness.router.current_path(), "/about");
    assert_eq!(harness.router.current_view(), Some(ViewId::About));
    assert_eq!(harness.window().history_len(), history + 1);
}

#[test]
fn clicks_outside_anchors_are_left_alone() {
    let harness = boot("/about");
    let body = harness.ctx().document().body();
    let event = body.click();
    assert!(!event.default_prevented());
    assert_eq!(harness.router.resolutions(), 1);
}

#[test]
fn back_re_resolves_without_pushing() {
    let harness = boot("/");
    harness.router.navigate("/about").unwrap();
    let history = harness.window().history_len();

    assert!(harness.window().back());

    assert_eq!(harness.router.current_path(), "/");
    assert_eq!(harness.router.current_view(), Some(ViewId::Home));
    assert_eq!(harness.window().history_len(), history);
    assert_eq!(harness.router.resolutions(), 3);
}

#[test]
fn leaving_a_screen_releases_its_subscriptions() {
    let harness = boot("/about");
    let bus = harness.ctx().bus.clone();
    let balance = bus.subscriber_count(Signal::BalanceUpdated);
    let completed = bus.subscriber_count(Signal::TransactionCompleted);

    harness.router.navigate("/").unwrap();
    assert!(bus.subscriber_count(Signal::BalanceUpdated) > balance);
    assert!(bus.subscriber_count(Signal::TransactionCompleted) > completed);

    harness.router.navigate("/about").unwrap();
    assert_eq!(bus.subscriber_count(Signal::BalanceUpdated), balance);
    assert_eq!(bus.subscriber_count(Signal::TransactionCompleted), completed);
}

#[test]
fn empty_route_table_renders_not_found_everywhere() {
    let harness = boot_with("/", RouteTable::empty(), true);
    assert_eq!(harness.router.current_view(), Some(ViewId::NotFound));
    harness.router.navigate("/about").unwrap();
    assert_eq!(harness.router.current_view(), Some(ViewId::NotFound));
}

#[test]
fn custom_route_table_is_honoured() {
    let routes = RouteTable::new(vec![
        RouteEntry::new("/", ViewId::About),
        RouteEntry::new("/home", ViewId::Home),
    ])
    .unwrap();
    let harness = boot_with("/", routes, true);
    assert_eq!(harness.router.current_view(), Some(ViewId::About));
    harness.router.navigate("/home").unwrap();
    assert_eq!(harness.router.current_view(), Some(ViewId::Home));
}

#[test]
fn missing_mount_point_fails_start() {
    let window = Window::with_document(Document::new(), "/");
    let (ctx, _bank, _log) = context(window, true);
    let err = Router::start(ctx, RouteTable::default(), Box::new(ScreenFactory)).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn dropping_the_router_removes_its_listeners() {
    let harness = boot("/");
    let window = harness.window().clone();
    let document = harness.ctx().document().clone();
    drop(harness);

    window.push_state("/about");
    window.back();
    let link = document.query_selector("a").unwrap().unwrap();
    assert!(!link.click().default_prevented());
}

#[test]
fn query_lookups_on_the_mounted_app() {
    let harness = boot("/");
    let doc = harness.ctx().document();
    let layout = Query::select(doc, ".layout").unwrap();

    assert!(matches!(layout.find(".does-not-exist"), Err(AppError::NotFound(_))));
    assert!(layout.find_all(".does-not-exist").is_empty());
    assert!(layout.find_all("nav.menu a").len() >= 2);
    assert!(matches!(
        Query::select(doc, "#nowhere"),
        Err(AppError::NotFound(_))
    ));

    let banner = layout.find("#notification").unwrap();
    assert!(matches!(banner.value(), Err(AppError::TypeMismatch { .. })));
}
