//! Quote submission and moderation through the full dispatch pipeline.

mod common;

use common::{TestBot, moderator, user};
use parley::dispatch::{AccessDenied, DispatchOutcome};
use parley::handlers::quote::{PendingQuotes, Quotes};

#[tokio::test]
async fn test_add_creates_pending_list() {
    let bot = TestBot::new();
    let alice = user("alice");

    // No pending list exists yet; the first submission creates it
    let outcome = bot.send(&alice, "!quote add hello world").await;
    assert!(outcome.is_completed(), "unexpected outcome: {outcome:?}");

    let reply = bot.last_reply();
    assert!(reply.contains("```hello world```"), "reply: {reply}");
    assert!(reply.contains("**#0**"), "reply: {reply}");

    let pending: PendingQuotes = bot.store().load().expect("Pending list should exist");
    assert_eq!(pending.list, ["hello world"]);
}

#[tokio::test]
async fn test_add_turns_escaped_newlines_into_line_breaks() {
    let bot = TestBot::new();
    bot.send(&user("alice"), r"!quote add first\nsecond").await;

    let pending: PendingQuotes = bot.store().load().unwrap();
    assert_eq!(pending.list, ["first\nsecond"]);
}

#[tokio::test]
async fn test_add_without_text_is_an_error() {
    let bot = TestBot::new();
    let outcome = bot.send(&user("alice"), "!quote add").await;

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    assert_eq!(bot.last_reply(), "*Error: no quote entered, please enter a quote*");
}

#[tokio::test]
async fn test_approve_requires_mod_before_binding() {
    let bot = TestBot::new();
    let alice = user("alice");
    bot.send(&alice, "!quote add hello").await;

    // Role check happens before arguments are looked at
    for content in ["!quote approve 0", "!quote approve", "!quote ap not-a-number"] {
        let outcome = bot.send(&alice, content).await;
        assert!(
            matches!(outcome, DispatchOutcome::Denied(AccessDenied::Role(_))),
            "{content}: {outcome:?}"
        );
        assert_eq!(
            bot.last_reply(),
            "*Error: You must be a `mod` to use this command*"
        );
    }

    let pending: PendingQuotes = bot.store().load().unwrap();
    assert_eq!(pending.list, ["hello"]);
    assert!(bot.store().load::<Quotes>().unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_moderation_lifecycle() {
    let bot = TestBot::new();
    let alice = user("alice");
    let moddy = moderator("moddy");

    bot.send(&alice, "!quote add one").await;
    bot.send(&alice, "!quote add two").await;
    bot.send(&alice, "!quote add three").await;

    // Approve `one`; pending shifts down
    assert!(bot.send(&moddy, "!quote approve 0").await.is_completed());
    assert_eq!(bot.last_reply(), "Approved quote ```one``` now at index **#0**");

    // Reject `three`, now at index 1
    assert!(bot.send(&moddy, "!quote rj 1").await.is_completed());
    assert_eq!(bot.last_reply(), "Rejected quote\n```three```");

    // Approve `two` into slot 1
    assert!(bot.send(&moddy, "!quote ap 0").await.is_completed());
    let quotes: Quotes = bot.store().load().unwrap();
    assert_eq!(quotes.list, ["one", "two"]);
    let pending: PendingQuotes = bot.store().load().unwrap();
    assert!(pending.list.is_empty());

    // Removing blanks the slot without shifting
    assert!(bot.send(&moddy, "!quote remove 0").await.is_completed());
    assert_eq!(bot.last_reply(), "Removed quote\n```one```");
    let quotes: Quotes = bot.store().load().unwrap();
    assert_eq!(quotes.list, ["", "two"]);

    // A blank slot can't be removed or shown
    let outcome = bot.send(&moddy, "!quote rm 0").await;
    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    assert_eq!(bot.last_reply(), "*Error: index not valid*");
    bot.send(&alice, "!quote 0").await;
    assert_eq!(bot.last_reply(), "*Error: index not valid*");

    // The next approval fills the gap
    bot.send(&alice, "!quote add four").await;
    bot.send(&moddy, "!quote approve 0").await;
    assert_eq!(bot.last_reply(), "Approved quote ```four``` now at index **#0**");
    bot.send(&alice, "!quote 1").await;
    assert_eq!(bot.last_reply(), "two");
}

#[tokio::test]
async fn test_out_of_range_index() {
    let bot = TestBot::new();
    let moddy = moderator("moddy");
    bot.send(&moddy, "!quote add one").await;

    for content in ["!quote approve 1", "!quote approve -1", "!quote pending 7"] {
        let outcome = bot.send(&moddy, content).await;
        assert!(matches!(outcome, DispatchOutcome::Failed(_)), "{content}");
        assert_eq!(bot.last_reply(), "*Error: index not valid*");
    }
}

#[tokio::test]
async fn test_reading_before_any_quote_exists() {
    let bot = TestBot::new();
    let alice = user("alice");

    for content in ["!quote", "!quote list", "!quote search hello", "!quote pending"] {
        bot.send(&alice, content).await;
        assert_eq!(
            bot.last_reply(),
            "*Error: quote list not initialised*",
            "{content}"
        );
    }
}

#[tokio::test]
async fn test_pending_listing() {
    let bot = TestBot::new();
    let alice = user("alice");
    bot.send(&alice, "!quote add one").await;
    bot.send(&alice, "!quote add two").await;

    bot.send(&alice, "!quote pending").await;
    assert_eq!(bot.last_reply(), "__Pending quotes:__\n**#0:** one\n**#1:** two");

    bot.send(&alice, "!quote pd 1").await;
    assert_eq!(bot.last_reply(), "Pending quote at index **1**:\ntwo");

    let moddy = moderator("moddy");
    bot.send(&moddy, "!quote reject 0").await;
    bot.send(&moddy, "!quote reject 0").await;
    bot.send(&alice, "!quote pending").await;
    assert_eq!(bot.last_reply(), "Pending list is empty.");
}

#[tokio::test]
async fn test_random_quote_skips_blank_slots() {
    let bot = TestBot::new();
    bot.store()
        .save(&Quotes {
            list: vec![String::new(), "only one".into(), String::new()],
        })
        .unwrap();

    for _ in 0..10 {
        bot.send(&user("alice"), "!quote").await;
        assert_eq!(bot.last_reply(), "only one");
    }
}

#[tokio::test]
async fn test_search() {
    let bot = TestBot::new();
    bot.store()
        .save(&Quotes {
            list: vec![
                "Hello World".into(),
                String::new(),
                "hello_world again".into(),
                "goodbye".into(),
            ],
        })
        .unwrap();
    let alice = user("alice");

    bot.send(&alice, "!quote search hello world").await;
    assert_eq!(
        bot.last_reply(),
        "Search Results:\n**#0:** Hello World\n**#2:** hello_world again"
    );

    // Regex syntax in the query is stripped rather than compiled
    bot.send(&alice, "!quote se good(bye").await;
    assert_eq!(bot.last_reply(), "Search Results:\n**#3:** goodbye");

    bot.send(&alice, "!quote se nothing").await;
    assert_eq!(bot.last_reply(), "No matches found.");

    bot.send(&alice, "!quote se ***").await;
    assert_eq!(bot.last_reply(), "*Error: no search terms entered*");
}

#[tokio::test]
async fn test_clean_rewrites_escaped_newlines() {
    let bot = TestBot::new();
    bot.store()
        .save(&Quotes {
            list: vec![r"a\nb".into(), "plain".into()],
        })
        .unwrap();

    bot.send(&user("alice"), "!quote clean").await;
    assert_eq!(bot.last_reply(), "All Clean! ✨");

    let quotes: Quotes = bot.store().load().unwrap();
    assert_eq!(quotes.list, ["a\nb", "plain"]);
}
