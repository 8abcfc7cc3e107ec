use std::cmp::Ordering;

use anyhow::Result;
use serde_json::json;

use super::derive_title;
use super::Session;
use super::SessionId;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;

#[test]
fn it_creates_sessions_with_default_title() {
    let session = Session::new(SessionId::from(3), 100);

    assert_eq!(session.title, "Chat 3");
    assert!(session.has_default_title());
    assert!(session.messages.is_empty());
    assert_eq!(session.created_at, 100);
    assert_eq!(session.last_updated, 100);
}

#[test]
fn it_orders_ids_numerically() {
    let mut ids = vec![
        SessionId::from(10),
        SessionId::from(2),
        SessionId::new("draft"),
        SessionId::from(1),
    ];
    ids.sort();

    let res = ids
        .iter()
        .map(|id| return id.to_string())
        .collect::<Vec<String>>();
    assert_eq!(res, vec!["draft", "1", "2", "10"]);
}

#[test]
fn it_derives_short_titles() {
    let id = SessionId::from(1);
    assert_eq!(
        derive_title(&id, "  Tell me about sales  "),
        "Tell me about sales"
    );
}

#[test]
fn it_truncates_long_titles() {
    let id = SessionId::from(1);
    let res = derive_title(
        &id,
        "What were the biggest drivers of revenue growth last quarter?",
    );

    insta::assert_snapshot!(res, @"What were the biggest drivers of re...");
}

#[test]
fn it_does_not_truncate_titles_at_the_limit() {
    let id = SessionId::from(1);
    let candidate = "a".repeat(35);
    assert_eq!(derive_title(&id, &candidate), candidate);
}

#[test]
fn it_truncates_titles_by_characters() {
    let id = SessionId::from(1);
    let res = derive_title(&id, &"é".repeat(40));
    assert_eq!(res, format!("{}...", "é".repeat(35)));
}

#[test]
fn it_falls_back_to_default_title() {
    let id = SessionId::from(7);
    assert_eq!(derive_title(&id, "   "), "Chat 7");
}

#[test]
fn it_counts_exchange_from_first_user_message() {
    let mut session = Session::new(SessionId::from(1), 100);
    assert_eq!(session.exchange_len(), 0);

    session.messages.push(Message::bot("Hello").with_timestamp(101));
    assert_eq!(session.exchange_len(), 0);

    session.messages.push(Message::user("Hi").with_timestamp(102));
    session.messages.push(Message::bot("What's up?").with_timestamp(103));
    assert_eq!(session.exchange_len(), 2);
}

#[test]
fn it_compares_recency() {
    let mut older = Session::new(SessionId::from(1), 100);
    older.last_updated = 5;
    let mut newer = Session::new(SessionId::from(2), 100);
    newer.last_updated = 9;
    assert_eq!(newer.recency_cmp(&older), Ordering::Greater);

    older.last_updated = 9;
    assert_eq!(newer.recency_cmp(&older), Ordering::Greater);

    older.created_at = 200;
    assert_eq!(newer.recency_cmp(&older), Ordering::Less);
}

#[test]
fn it_validates_sessions() {
    let mut session = Session::new(SessionId::from(1), 100);
    session.messages.push(Message::user("Hi").with_timestamp(101));
    assert!(session.validate(&SessionId::from(1)).is_ok());
    assert!(session.validate(&SessionId::from(2)).is_err());

    let mut chart = Message::bot("Chart");
    chart.kind = MessageKind::Chart;
    session.messages.push(chart);
    assert!(session.validate(&SessionId::from(1)).is_err());
}

#[test]
fn it_repairs_sessions() {
    let mut session = Session::new(SessionId::from(1), 100);
    session.last_updated = 0;
    session.messages = vec![
        Message::bot("third").with_timestamp(300),
        Message::user("first").with_timestamp(0),
        Message::user("second").with_timestamp(200),
    ];

    session.repair();

    let res = session
        .messages
        .iter()
        .map(|e| return (e.content_str().to_string(), e.timestamp))
        .collect::<Vec<(String, i64)>>();
    assert_eq!(
        res,
        vec![
            ("first".to_string(), 100),
            ("second".to_string(), 200),
            ("third".to_string(), 300),
        ]
    );
    assert_eq!(session.last_updated, 300);
}

#[test]
fn it_reads_the_history_layout() -> Result<()> {
    let session: Session = serde_json::from_value(json!({
        "id": "4",
        "title": "Chat 4",
        "messages": [
            { "sender": "bot", "content": "New chat started. How can I assist you?", "type": "text", "timestamp": 11 }
        ],
        "createdAt": 10,
        "lastUpdated": 11
    }))?;

    assert_eq!(session.id, SessionId::from(4));
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.created_at, 10);
    assert_eq!(session.last_updated, 11);

    let res = serde_json::to_value(&session)?;
    assert_eq!(res["createdAt"], json!(10));
    assert_eq!(res["lastUpdated"], json!(11));

    return Ok(());
}
