use std::fs;

use anyhow::Result;
use tempfile::TempDir;
use test_utils::history_path;
use test_utils::temp_dir;

use super::SessionStore;
use crate::domain::models::ChatError;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;
use crate::domain::models::Sender;
use crate::domain::models::Session;
use crate::domain::models::SessionId;
use crate::domain::models::SessionMap;
use crate::domain::services::HistoryFile;
use crate::domain::services::HistorySnapshot;

const GREETING: &str = "New chat started. How can I assist you?";

async fn open_store(dir: &TempDir) -> SessionStore {
    let history = HistoryFile::new(history_path(dir));
    return SessionStore::open(history, GREETING).await;
}

#[tokio::test]
async fn it_creates_sessions_with_a_greeting() -> Result<()> {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let id = store.create_session().await;

    assert_eq!(id, SessionId::from(1));
    let session = store.get(&id).unwrap();
    assert_eq!(session.title, "Chat 1");
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].sender, Sender::Bot);
    assert_eq!(session.messages[0].content_str(), GREETING);
    assert_eq!(session.messages[0].timestamp, session.created_at + 1);

    let second = store.create_session().await;
    assert_eq!(second, SessionId::from(2));

    return Ok(());
}

#[tokio::test]
async fn it_skips_the_greeting_when_disabled() {
    let dir = temp_dir();
    let history = HistoryFile::new(history_path(&dir));
    let mut store = SessionStore::open(history, "").await;
    let id = store.create_session().await;

    assert!(store.get(&id).unwrap().messages.is_empty());
}

#[tokio::test]
async fn it_selects_nothing_when_empty() {
    let dir = temp_dir();
    let store = open_store(&dir).await;
    assert!(store.is_empty());
    assert_eq!(store.select_most_recent(), None);
    assert!(store.list_by_recency().is_empty());
}

#[tokio::test]
async fn it_orders_sessions_by_recency() -> Result<()> {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let first = store.create_session().await;
    let second = store.create_session().await;

    store
        .append_message(&first, Message::user("bump").with_timestamp(SessionStore::now() + 10_000))
        .await?;

    assert_eq!(store.select_most_recent(), Some(first.clone()));
    let ids = store
        .list_by_recency()
        .iter()
        .map(|e| return e.id.clone())
        .collect::<Vec<SessionId>>();
    assert_eq!(ids, vec![first, second]);

    return Ok(());
}

#[tokio::test]
async fn it_keeps_timestamps_non_decreasing() -> Result<()> {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let id = store.create_session().await;

    let late = SessionStore::now() + 50_000;
    store
        .append_message(&id, Message::bot("late").with_timestamp(late))
        .await?;
    store
        .append_message(&id, Message::bot("early").with_timestamp(late - 20_000))
        .await?;

    let session = store.get(&id).unwrap();
    assert_eq!(session.messages[2].timestamp, late);
    assert!(session
        .messages
        .windows(2)
        .all(|e| return e[0].timestamp <= e[1].timestamp));
    assert_eq!(session.last_updated, late);

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_append_to_unknown_sessions() {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let res = store
        .append_message(&SessionId::from(42), Message::user("Hi"))
        .await;

    assert!(matches!(res, Err(ChatError::SessionNotFound(id)) if id == SessionId::from(42)));
}

#[tokio::test]
async fn it_derives_titles_once() -> Result<()> {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let id = store.create_session().await;

    store
        .append_message(&id, Message::user("Tell me about sales"))
        .await?;
    store.append_message(&id, Message::bot("Up 5%")).await?;
    assert!(store.derive_title_if_eligible(&id, "Tell me about sales").await);
    assert_eq!(store.get(&id).unwrap().title, "Tell me about sales");

    assert!(!store.derive_title_if_eligible(&id, "Something else").await);
    assert_eq!(store.get(&id).unwrap().title, "Tell me about sales");

    return Ok(());
}

#[tokio::test]
async fn it_skips_titles_after_the_first_exchange() -> Result<()> {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let id = store.create_session().await;

    for text in ["one", "two", "three"] {
        store.append_message(&id, Message::user(text)).await?;
    }

    assert!(!store.derive_title_if_eligible(&id, "three").await);
    assert_eq!(store.get(&id).unwrap().title, "Chat 1");

    return Ok(());
}

#[tokio::test]
async fn it_truncates_long_titles() -> Result<()> {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let id = store.create_session().await;
    let text = "a".repeat(40);

    store.append_message(&id, Message::user(&text)).await?;
    assert!(store.derive_title_if_eligible(&id, &text).await);
    assert_eq!(store.get(&id).unwrap().title, format!("{}...", "a".repeat(35)));

    return Ok(());
}

#[tokio::test]
async fn it_persists_and_reloads() -> Result<()> {
    let dir = temp_dir();
    let path = history_path(&dir);

    let mut store = SessionStore::open(HistoryFile::new(path.clone()), GREETING).await;
    let id = store.create_session().await;
    store.append_message(&id, Message::user("Hi")).await?;
    store.derive_title_if_eligible(&id, "Hi").await;

    let reloaded = SessionStore::open(HistoryFile::new(path.clone()), GREETING).await;
    assert_eq!(reloaded.get(&id), store.get(&id));

    let mut reloaded = reloaded;
    assert_eq!(reloaded.create_session().await, SessionId::from(2));

    return Ok(());
}

#[tokio::test]
async fn it_keeps_state_when_saving_fails() -> Result<()> {
    let dir = temp_dir();
    fs::write(dir.path().join("blocker"), "")?;

    let history = HistoryFile::new(dir.path().join("blocker").join("history.json"));
    let mut store = SessionStore::open(history, GREETING).await;
    let id = store.create_session().await;
    store.append_message(&id, Message::user("Hi")).await?;

    assert_eq!(store.get(&id).unwrap().messages.len(), 2);
    assert!(store.flush().await.is_err());

    return Ok(());
}

#[tokio::test]
async fn it_skips_and_repairs_loaded_sessions() {
    let mut mismatched = Session::new(SessionId::from(1), 10);
    mismatched.id = SessionId::from(9);

    let mut broken = Session::new(SessionId::from(2), 10);
    let mut chart = Message::bot("");
    chart.kind = MessageKind::Chart;
    broken.messages.push(chart);

    let mut unordered = Session::new(SessionId::from(3), 10);
    unordered.messages.push(Message::user("second").with_timestamp(30));
    unordered.messages.push(Message::user("first").with_timestamp(0));
    unordered.last_updated = 0;

    let mut loaded = SessionMap::new();
    loaded.insert(SessionId::from(1), mismatched);
    loaded.insert(SessionId::from(2), broken);
    loaded.insert(SessionId::from(3), unordered);

    let dir = temp_dir();
    let history = HistoryFile::new(history_path(&dir));
    let snapshot = HistorySnapshot {
        sessions: loaded,
        highest_id: Some(3),
    };
    let mut store = SessionStore::from_snapshot(history, snapshot, GREETING);

    assert_eq!(store.len(), 1);
    let session = store.get(&SessionId::from(3)).unwrap();
    assert_eq!(session.messages[0].content_str(), "first");
    assert_eq!(session.messages[0].timestamp, 10);
    assert_eq!(session.last_updated, 30);

    assert_eq!(store.create_session().await, SessionId::from(4));
}

#[tokio::test]
async fn it_never_reuses_ids_of_skipped_sessions() -> Result<()> {
    let dir = temp_dir();
    fs::write(
        history_path(&dir),
        r#"{
            "1": { "id": "1", "title": "Chat 1", "messages": [], "createdAt": 1, "lastUpdated": 1 },
            "2": {
                "id": "2",
                "title": "Chat 2",
                "messages": [{ "sender": "user", "content": null, "type": "text", "timestamp": 2 }],
                "createdAt": 2,
                "lastUpdated": 2
            },
            "5": "garbage"
        }"#,
    )?;

    let mut store = SessionStore::open(HistoryFile::new(history_path(&dir)), GREETING).await;
    assert_eq!(store.len(), 1);
    assert!(!store.contains(&SessionId::from(2)));

    assert_eq!(store.create_session().await, SessionId::from(6));

    return Ok(());
}

#[tokio::test]
async fn it_resolves_missing_sessions() {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;

    let created = store.resolve(Some(&SessionId::from(7))).await;
    assert_eq!(created, SessionId::from(1));

    let second = store.create_session().await;
    assert_eq!(store.resolve(Some(&created)).await, created);
    assert_eq!(store.resolve(Some(&SessionId::new("gone"))).await, second);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn it_deletes_sessions() {
    let dir = temp_dir();
    let mut store = open_store(&dir).await;
    let first = store.create_session().await;
    store.create_session().await;

    assert!(store.delete_session(&first).await);
    assert!(!store.delete_session(&first).await);
    assert_eq!(store.len(), 1);

    assert_eq!(store.create_session().await, SessionId::from(3));
    assert_eq!(store.delete_all().await, 2);
    assert!(store.is_empty());
}
