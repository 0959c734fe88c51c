//! Reaction-driven pagination of long listings.

mod common;

use common::bot::CHANNEL_ID;
use common::{TestBot, eventually, user};
use parley::handlers::quote::Quotes;
use parley::widgets::{FALLBACK_LEFT, FALLBACK_RIGHT, PaginationOptions};
use std::time::Duration;

fn seed_quotes(bot: &TestBot, count: usize) {
    let list = (0..count).map(|i| format!("q{i}")).collect();
    bot.store()
        .save(&Quotes { list })
        .expect("Failed to seed quotes");
}

fn page(first: usize, last: usize, page: usize, pages: usize) -> String {
    let mut out = String::from("__Quotes__");
    for i in first..=last {
        out.push_str(&format!("\n**#{i}:** q{i}"));
    }
    out.push_str(&format!("\n`Page {page}/{pages}`"));
    out
}

#[tokio::test]
async fn test_reactions_flip_pages() {
    let bot = TestBot::new();
    seed_quotes(&bot, 12);
    let alice = user("alice");

    assert!(bot.send(&alice, "!quote list").await.is_completed());

    // First page goes out with both controls attached
    let sent = bot.memory.sent();
    assert_eq!(sent.len(), 1);
    let list_id = sent[0].id.clone();
    assert_eq!(bot.memory.sent_texts()[0], page(0, 4, 0, 2));
    assert_eq!(
        bot.memory.reactions(),
        [(list_id.clone(), "⬅️".to_string()), (list_id.clone(), "➡️".to_string())]
    );
    assert_eq!(bot.memory.listener_count(), 1);
    assert_eq!(bot.dispatcher.widgets().active(), 1);

    bot.memory.react(CHANNEL_ID, &list_id, &alice.id, "➡️");
    assert!(eventually(|| bot.memory.edits().len() == 1).await);
    assert_eq!(bot.memory.edits()[0], (list_id.clone(), page(5, 9, 1, 2)));
    assert_eq!(
        bot.memory.removed_reactions()[0],
        (list_id.clone(), "➡️".to_string(), alice.id.clone())
    );

    // Back to the start, then wrap around to the last page
    bot.memory.react(CHANNEL_ID, &list_id, &alice.id, "⬅️");
    assert!(eventually(|| bot.memory.edits().len() == 2).await);
    bot.memory.react(CHANNEL_ID, &list_id, &alice.id, "⬅️");
    assert!(eventually(|| bot.memory.edits().len() == 3).await);
    assert_eq!(bot.memory.edits()[2].1, page(10, 11, 2, 2));

    bot.dispatcher.widgets().shutdown(Duration::from_secs(1)).await;
    assert_eq!(bot.memory.cleared(), [list_id]);
    assert_eq!(bot.memory.listener_count(), 0);
    assert_eq!(bot.dispatcher.widgets().active(), 0);
}

#[tokio::test]
async fn test_unrelated_reactions_are_ignored() {
    let bot = TestBot::new();
    seed_quotes(&bot, 12);
    let alice = user("alice");
    bot.send(&alice, "!quote list").await;
    let list_id = bot.memory.sent()[0].id.clone();

    // Own reaction, other message, non-control emoji
    bot.memory.react(CHANNEL_ID, &list_id, common::bot::BOT_ID, "➡️");
    bot.memory.react(CHANNEL_ID, "elsewhere", &alice.id, "➡️");
    bot.memory.react(CHANNEL_ID, &list_id, &alice.id, "👍");
    // A real flip afterwards proves the earlier events were consumed
    bot.memory.react(CHANNEL_ID, &list_id, &alice.id, "➡️");

    assert!(eventually(|| bot.memory.edits().len() == 1).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(bot.memory.edits().len(), 1);
    assert_eq!(bot.memory.removed_reactions().len(), 1);

    bot.dispatcher.widgets().shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_rejected_control_emoji_falls_back() {
    let bot = TestBot::new();
    seed_quotes(&bot, 12);
    bot.memory.reject_emoji("⬅️");
    let alice = user("alice");

    bot.send(&alice, "!quote list").await;
    let list_id = bot.memory.sent()[0].id.clone();
    assert_eq!(
        bot.memory.reactions(),
        [
            (list_id.clone(), FALLBACK_LEFT.to_string()),
            (list_id.clone(), "➡️".to_string())
        ]
    );

    // Fallback emoji flip pages too
    bot.memory.react(CHANNEL_ID, &list_id, &alice.id, FALLBACK_LEFT);
    assert!(eventually(|| bot.memory.edits().len() == 1).await);
    assert_eq!(bot.memory.edits()[0].1, page(10, 11, 2, 2));

    bot.dispatcher.widgets().shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_unusable_controls_leave_static_page() {
    let bot = TestBot::new();
    seed_quotes(&bot, 12);
    bot.memory.reject_emoji("➡️");
    bot.memory.reject_emoji(FALLBACK_RIGHT);

    let outcome = bot.send(&user("alice"), "!quote list").await;
    assert!(outcome.is_completed(), "unexpected outcome: {outcome:?}");

    // Only the first page goes out, without an error reply after it
    assert_eq!(bot.memory.sent_texts(), [page(0, 4, 0, 2)]);
    let list_id = bot.memory.sent()[0].id.clone();

    // The left control that did get added is cleared again
    assert_eq!(bot.memory.reactions(), [(list_id.clone(), "⬅️".to_string())]);
    assert_eq!(bot.memory.cleared(), [list_id]);
    assert_eq!(bot.memory.listener_count(), 0);
    assert_eq!(bot.dispatcher.widgets().active(), 0);
}

#[tokio::test]
async fn test_listing_times_out() {
    let bot = TestBot::with_pagination(PaginationOptions {
        lines_per_page: 5,
        timeout: Duration::from_millis(100),
        ..PaginationOptions::default()
    });
    seed_quotes(&bot, 12);

    bot.send(&user("alice"), "!quote list").await;
    let list_id = bot.memory.sent()[0].id.clone();
    assert_eq!(bot.memory.listener_count(), 1);

    assert!(eventually(|| !bot.memory.cleared().is_empty()).await);
    assert_eq!(bot.memory.cleared(), [list_id]);
    assert!(eventually(|| bot.memory.listener_count() == 0).await);
    assert!(eventually(|| bot.dispatcher.widgets().active() == 0).await);
}

#[tokio::test]
async fn test_single_page_has_no_listener() {
    let bot = TestBot::new();
    bot.store()
        .save(&Quotes {
            list: vec!["a".into(), String::new(), "c".into()],
        })
        .unwrap();

    bot.send(&user("alice"), "!quote ls").await;

    // Blank slots are left out of the rendered page
    assert_eq!(bot.last_reply(), "__Quotes__\n**#0:** a\n**#2:** c\n`Page 0/0`");
    assert!(bot.memory.reactions().is_empty());
    assert_eq!(bot.memory.listener_count(), 0);
    assert_eq!(bot.dispatcher.widgets().active(), 0);
}

#[tokio::test]
async fn test_help_lists_commands_in_pages() {
    let bot = TestBot::new();
    bot.send(&user("alice"), "!help").await;

    let first = bot.last_reply();
    assert!(
        first.starts_with("__Commands__\n`!help` - Lists every command"),
        "reply: {first}"
    );
    assert_eq!(first.lines().count(), 1 + 5 + 1);
    assert_eq!(bot.memory.listener_count(), 1);

    bot.dispatcher.widgets().shutdown(Duration::from_secs(1)).await;
    assert_eq!(bot.memory.listener_count(), 0);
}
