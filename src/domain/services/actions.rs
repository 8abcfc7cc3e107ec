#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::EndpointBox;
use crate::domain::models::Event;

pub struct ActionsService {}

impl ActionsService {
    /// Runs every endpoint request on its own task and reports the result
    /// back as an event. Returns once the action channel closes.
    pub async fn start(
        endpoint: EndpointBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) {
        let endpoint = Arc::new(endpoint);

        while let Some(action) = rx.recv().await {
            match action {
                Action::EndpointRequest(request) => {
                    let worker_endpoint = Arc::clone(&endpoint);
                    let worker_tx = tx.clone();

                    tokio::spawn(async move {
                        let res = worker_endpoint.send(&request).await;
                        if worker_tx.send(Event::EndpointResponse(res)).is_err() {
                            tracing::debug!("UI has exited, dropping endpoint response");
                        }
                    });
                }
            }
        }
    }
}
