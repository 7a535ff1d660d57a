mod common;

use std::time::Duration;

use redbank::dom::Element;
use redbank::query::Query;
use redbank::services::Signal;
use redbank::screens::home::transactions::EMPTY_MESSAGE;
use redbank::{AppError, RouteTable};

use common::{boot, boot_with, Harness};

const BOB_CARD: &str = "5469550033334444";

fn select(harness: &Harness, selector: &str) -> Element {
    harness
        .ctx()
        .document()
        .query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("{selector} not mounted"))
}

fn button(harness: &Harness, scope: &str, label: &str) -> Element {
    harness
        .ctx()
        .document()
        .query_selector_all(&format!("{scope} button"))
        .unwrap()
        .into_iter()
        .find(|b| b.text_content().trim() == label)
        .unwrap_or_else(|| panic!("no {label} button in {scope}"))
}

fn banner(harness: &Harness) -> Element {
    select(harness, "#notification")
}

#[test]
fn dashboard_loads_after_the_render_delay() {
    let harness = boot("/");
    assert!(harness.calls().is_empty());
    assert!(!harness.ctx().document().query_selector_all(".loader").unwrap().is_empty());

    harness.settle();

    for call in ["cards.by_user", "users.get_all", "statistics.main", "transactions.get_all"] {
        assert_eq!(harness.count(call), 1, "{call}");
    }
    assert!(harness.ctx().document().query_selector_all(".loader").unwrap().is_empty());
    assert_eq!(select(&harness, "#card .balance").text_content(), "$2,500.00");
    assert_eq!(harness.ctx().document().title(), "Home | Red Bank");
}

#[test]
fn transfer_refreshes_statistics_then_transactions_once() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    select(&harness, r#"input[name="card-number"]"#).set_value(BOB_CARD);
    select(&harness, r#"input[name="transfer-amount"]"#).set_value("100");
    button(&harness, ".transfer-field", "Send").click();
    harness.settle();

    let calls = harness.calls();
    assert_eq!(calls[0], "cards.transfer");
    let refreshes: Vec<_> = calls
        .iter()
        .filter(|c| matches!(**c, "statistics.main" | "transactions.get_all"))
        .collect();
    assert_eq!(refreshes, [&"statistics.main", &"transactions.get_all"]);
    assert_eq!(harness.count("cards.by_user"), 1);

    assert_eq!(select(&harness, "#card .balance").text_content(), "$2,400.00");
    assert_eq!(banner(&harness).text_content(), "Transfer completed");
    assert_eq!(select(&harness, r#"input[name="transfer-amount"]"#).value(), "");
    assert_eq!(harness.bank.user(2).unwrap().card.balance, 940.25);
}

#[test]
fn send_is_blocked_while_a_transfer_is_in_flight() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    select(&harness, r#"input[name="card-number"]"#).set_value(BOB_CARD);
    select(&harness, r#"input[name="transfer-amount"]"#).set_value("100");
    let send = button(&harness, ".transfer-field", "Send");
    send.click();
    assert!(send.is_disabled());
    send.click();
    send.emit("click");
    harness.settle();

    assert_eq!(harness.count("cards.transfer"), 1);
    assert!(!send.is_disabled());
    assert_eq!(send.text_content(), "Send");
    assert_eq!(harness.bank.user(1).unwrap().card.balance, 2400.0);
}

#[test]
fn top_up_is_blocked_while_busy() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    select(&harness, r#".actions input[name="amount"]"#).set_value("100");
    let top_up = button(&harness, ".actions", "Top-up");
    top_up.click();
    top_up.click();
    harness.settle();

    assert_eq!(harness.count("cards.update_balance"), 1);
    assert_eq!(select(&harness, "#card .balance").text_content(), "$2,600.00");
}

#[test]
fn balance_signal_leaves_statistics_and_transactions_alone() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    assert_eq!(harness.ctx().bus.publish(Signal::BalanceUpdated), 1);
    harness.settle();

    assert_eq!(harness.calls(), ["cards.by_user"]);
}

#[test]
fn invalid_transfer_highlights_the_field_without_calling_the_bank() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    select(&harness, r#"input[name="card-number"]"#).set_value(BOB_CARD);
    button(&harness, ".transfer-field", "Send").click();

    assert!(harness.calls().is_empty());
    let label = select(&harness, "#transfer-amount label");
    assert!(label.has_class("invalid"));
    harness.advance(Duration::from_secs(2));
    assert!(!label.has_class("invalid"));
}

#[test]
fn rejected_transfer_surfaces_the_error() {
    let harness = boot("/");
    harness.settle();

    select(&harness, r#"input[name="card-number"]"#).set_value("0000000000000000");
    select(&harness, r#"input[name="transfer-amount"]"#).set_value("10");
    button(&harness, ".transfer-field", "Send").click();
    harness.advance(Duration::from_millis(150));

    let banner = banner(&harness);
    assert!(banner.has_class("notification--error"));
    assert!(banner.text_content().contains("not found"));
}

#[test]
fn top_up_updates_the_card() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    select(&harness, r#".actions input[name="amount"]"#).set_value("100");
    button(&harness, ".actions", "Top-up").click();
    harness.settle();

    assert_eq!(harness.calls(), ["cards.update_balance", "cards.by_user"]);
    assert_eq!(select(&harness, "#card .balance").text_content(), "$2,600.00");
    assert_eq!(banner(&harness).text_content(), "Balance updated");
}

#[test]
fn fetch_scheduled_before_teardown_never_runs() {
    let harness = boot("/");
    harness.router.navigate("/about").unwrap();
    harness.settle();
    assert!(harness.calls().is_empty());
}

#[test]
fn response_arriving_after_teardown_is_dropped() {
    let harness = boot("/");
    harness.advance(Duration::from_millis(500));
    assert_eq!(harness.count("transactions.get_all"), 1);

    harness.router.navigate("/about").unwrap();
    let about = harness.router.content_slot().unwrap().inner_html();
    harness.settle();

    assert_eq!(harness.router.content_slot().unwrap().inner_html(), about);
    assert!(harness.ctx().document().query_selector("#transactions-list").unwrap().is_none());
}

#[test]
fn home_without_session_asks_to_log_in() {
    let harness = boot_with("/", RouteTable::default(), false);
    harness.settle();
    assert!(select(&harness, ".auth-required").text_content().contains("logged in"));
    assert!(harness.calls().is_empty());
}

#[test]
fn transactions_are_listed_newest_first() {
    let harness = boot("/");
    harness.settle();
    let items = harness
        .ctx()
        .document()
        .query_selector_all("#transactions-list .transaction-item")
        .unwrap();
    assert_eq!(items.len(), 3);
    assert!(items[0].has_class("expense"));
    assert!(items[2].has_class("income"));
}

#[test]
fn empty_history_shows_the_placeholder() {
    let harness = boot("/");
    harness.settle();

    // Dmitri has no transactions in the seed data.
    harness.bank.sign_in(4).unwrap();
    harness.ctx().bus.publish(Signal::TransactionCompleted);
    harness.settle();

    let list = select(&harness, "#transactions-list");
    assert!(list.query_selector(".transaction-item").unwrap().is_none());
    assert_eq!(list.text_content(), EMPTY_MESSAGE);
}

#[test]
fn notifications_keep_a_single_kind_class() {
    let harness = boot("/about");
    let notifications = &harness.ctx().notifications;
    let banner = banner(&harness);

    notifications.show("error", "boom").unwrap();
    harness.advance(Duration::from_millis(3000));
    notifications.show("success", "done").unwrap();
    assert!(banner.has_class("notification--success"));
    assert!(!banner.has_class("notification--error"));
    assert_eq!(banner.text_content(), "done");

    let err = notifications.show("warning", "ignored").unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert_eq!(banner.text_content(), "done");

    // 5.5 s after the first call, 2.5 s after the second.
    assert_eq!(harness.advance(Duration::from_millis(2500)), 0);
    assert!(banner.has_class("notification--success"));
    assert!(notifications.is_visible());

    // 5 s after the second call.
    assert_eq!(harness.advance(Duration::from_millis(2500)), 1);
    assert!(!banner.has_class("notification--success"));
    assert!(!banner.has_class("notification--error"));
    assert!(!notifications.is_visible());

    assert_eq!(harness.advance(Duration::from_secs(10)), 0);
}

#[test]
fn header_search_fills_the_transfer_form() {
    let harness = boot("/");
    harness.settle();
    harness.clear_calls();

    let input = Query::new(select(&harness, r#"input[name="search"]"#));
    input.set_value("b").unwrap();
    input.element().emit("input");
    input.set_value("bob").unwrap();
    input.element().emit("input");
    harness.settle();

    assert_eq!(harness.count("users.get_all"), 1);
    let result = select(&harness, "#search-results .user-item");
    result.click();

    assert_eq!(
        select(&harness, r#"input[name="card-number"]"#).value().replace('-', ""),
        BOB_CARD
    );
    assert_eq!(input.value().unwrap(), "");
    assert!(harness
        .ctx()
        .document()
        .query_selector("#search-results .user-item")
        .unwrap()
        .is_none());
}
