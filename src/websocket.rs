// ============================================
// websocket.rs (push-mode transport adapter)
// ============================================
use futures::{StreamExt, SinkExt};
use tokio::sync::mpsc;
use warp::ws::{Message, WebSocket};
use warp::Filter;

use crate::protocol::{ClientEvent, ServerEvent};
use crate::service::{ChatService, ClientId};

/// `GET /ws` upgraded to a WebSocket session.
pub fn route(
    service: ChatService,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_service(service))
        .map(|ws: warp::ws::Ws, service: ChatService| {
            ws.on_upgrade(move |socket| client_connected(socket, service))
        })
}

fn with_service(
    service: ChatService,
) -> impl Filter<Extract = (ChatService,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || service.clone())
}

pub async fn client_connected(ws: WebSocket, service: ChatService) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Forwarder task: server events -> socket. A failed send means the
    // socket is gone; the read loop below notices via its own end.
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    log::error!("failed to encode server event: {err}");
                    continue;
                }
            };
            if ws_tx.send(Message::text(text)).await.is_err() {
                break;
            }
        }
    });

    // No presence registration until the client announces itself with a
    // `join` frame; anything else before that is ignored.
    let mut session: Option<ClientId> = None;

    while let Some(result) = ws_rx.next().await {
        let msg = match result {
            Ok(m) => m,
            Err(err) => {
                log::debug!("websocket read error: {err}");
                break;
            }
        };

        let Ok(text) = msg.to_str() else { continue };
        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(err) => {
                log::debug!("ignoring unparseable client frame: {err}");
                continue;
            }
        };

        match event {
            ClientEvent::Join { username } => {
                if session.is_none() {
                    session = Some(service.join(&username, tx.clone()));
                }
            }
            ClientEvent::Leave { .. } => break,
        }
    }

    // Cleanup runs once whether the close was a `leave` frame, an error, or
    // a dropped connection.
    if let Some(id) = session {
        service.leave(id);
    }
}
