use anyhow::bail;
use anyhow::Result;
use serde_json::json;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::EndpointError;
use crate::domain::models::EndpointRequest;
use crate::domain::models::Event;
use crate::domain::models::SessionId;
use crate::infrastructure::endpoints::webhook::Webhook;

fn to_res(event: Option<Event>) -> Result<serde_json::Value> {
    match event {
        Some(Event::EndpointResponse(Ok(body))) => return Ok(body),
        Some(Event::EndpointResponse(Err(err))) => bail!(err),
        _ => bail!("Wrong type from recv"),
    }
}

#[tokio::test]
async fn it_reports_endpoint_responses() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"output":"Hello"}"#)
        .create();

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    action_tx.send(Action::EndpointRequest(EndpointRequest::new(
        "Hi",
        &SessionId::from(1),
    )))?;
    drop(action_tx);

    let endpoint = Box::new(Webhook::new(&server.url(), "", 1000));
    ActionsService::start(endpoint, event_tx, &mut action_rx).await;

    let res = to_res(event_rx.recv().await)?;
    assert_eq!(res, json!({ "output": "Hello" }));
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_reports_endpoint_failures() -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    action_tx.send(Action::EndpointRequest(EndpointRequest::new(
        "Hi",
        &SessionId::from(1),
    )))?;
    drop(action_tx);

    let endpoint = Box::new(Webhook::new("http://127.0.0.1:1", "", 1000));
    ActionsService::start(endpoint, event_tx, &mut action_rx).await;

    match event_rx.recv().await {
        Some(Event::EndpointResponse(Err(EndpointError::Transport(_)))) => {}
        _ => bail!("Expected a transport error"),
    }

    return Ok(());
}
