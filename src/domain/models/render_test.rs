use serde_json::json;
use test_utils::chart_config_fixture;

use super::wrap_text;
use super::RenderInstruction;
use super::CHART_ERROR;
use super::PENDING_MARKER;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;
use crate::domain::models::Reply;
use crate::domain::models::Sender;

#[test]
fn it_builds_instructions_from_messages() {
    let res = RenderInstruction::from_message(&Message::error("Nope"));

    assert_eq!(
        res,
        RenderInstruction::Message {
            content: Some("Nope".to_string()),
            sender: Sender::Bot,
            kind: MessageKind::Text,
            chart_config: None,
            error: true,
        }
    );
    assert!(res.is_error());
    assert_eq!(res.sender(), Sender::Bot);
}

#[test]
fn it_renders_pending_marker() {
    let (lines, err) = RenderInstruction::Pending.text_lines();
    assert_eq!(lines, vec![PENDING_MARKER.to_string()]);
    assert!(err.is_none());
}

#[test]
fn it_renders_text_lines() {
    let (lines, err) =
        RenderInstruction::from_message(&Message::bot("Hello\nWorld")).text_lines();
    assert_eq!(lines, vec!["Hello".to_string(), "World".to_string()]);
    assert!(err.is_none());
}

#[test]
fn it_renders_empty_text_placeholders() {
    let (bot_lines, _) = RenderInstruction::from_message(&Message::bot("")).text_lines();
    assert_eq!(bot_lines, vec!["[Empty message received]".to_string()]);

    let (user_lines, _) = RenderInstruction::from_message(&Message::user("")).text_lines();
    assert_eq!(user_lines, vec!["[Empty user message]".to_string()]);
}

#[test]
fn it_renders_charts_after_content() {
    let msg = Message::from_reply(Reply {
        kind: MessageKind::Chart,
        content: Some("Here you go".to_string()),
        config: Some(chart_config_fixture()),
    });
    let (lines, err) = RenderInstruction::from_message(&msg).text_lines();

    assert!(err.is_none());
    insta::assert_snapshot!(lines.join("\n"), @r###"
    Here you go
    [bar chart] Quarterly sales
    Revenue: Q1=120, Q2=135.5, Q3=160
    Costs: Q1=80, Q2=90, Q3=95
    "###);
}

#[test]
fn it_reports_broken_charts() {
    let msg = Message::from_reply(Reply {
        kind: MessageKind::Chart,
        content: None,
        config: Some(json!("not a chart")),
    });
    let (lines, err) = RenderInstruction::from_message(&msg).text_lines();

    assert_eq!(lines, vec![CHART_ERROR.to_string()]);
    assert!(err.is_some());
}

#[test]
fn it_wraps_text() {
    let res = wrap_text("The quick brown fox jumps over the lazy dog", 10);
    assert_eq!(
        res,
        vec!["The quick", "brown fox", "jumps over", "the lazy", "dog"]
    );
}

#[test]
fn it_wraps_long_words() {
    let res = wrap_text("abcdefghijkl xy", 5);
    assert_eq!(res, vec!["abcde", "fghij", "kl xy"]);
}

#[test]
fn it_keeps_blank_lines() {
    let res = wrap_text("one\n\ntwo", 10);
    assert_eq!(res, vec!["one", " ", "two"]);
}
