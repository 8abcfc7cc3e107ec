use serde_json::json;

use super::BubbleList;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;
use crate::domain::models::Reply;
use crate::domain::services::view;

#[test]
fn it_has_no_cached_lines() {
    let bubble_list = BubbleList::default();

    assert_eq!(bubble_list.cache.len(), 0);
    assert_eq!(bubble_list.len(), 0);
    assert!(bubble_list.is_empty());
}

#[test]
fn it_caches_lines() {
    let messages = vec![Message::bot("Hi there!"), Message::bot("One\nTwo")];

    let mut bubble_list = BubbleList::default();
    bubble_list.set_instructions(&view::project(&messages, false), 50);

    assert_eq!(bubble_list.cache.len(), 2);
    assert_eq!(bubble_list.len(), 7);
}

#[test]
fn it_drops_stale_entries() {
    let messages = vec![Message::bot("Hi there!")];

    let mut bubble_list = BubbleList::default();
    bubble_list.set_instructions(&view::project(&messages, true), 50);
    assert_eq!(bubble_list.cache.len(), 2);

    bubble_list.set_instructions(&view::project(&messages, false), 50);
    assert_eq!(bubble_list.cache.len(), 1);
    assert_eq!(bubble_list.len(), 3);
}

#[test]
fn it_counts_render_failures() {
    let broken = Message::from_reply(Reply {
        kind: MessageKind::Chart,
        content: None,
        config: Some(json!([])),
    });
    let messages = vec![broken, Message::bot("After")];

    let mut bubble_list = BubbleList::default();
    let failures = bubble_list.set_instructions(&view::project(&messages, false), 50);

    assert_eq!(failures, 1);
    assert_eq!(bubble_list.len(), 6);
}
