// ============================================
// http.rs (poll-mode transport adapter)
// ============================================
use std::collections::HashMap;
use std::convert::Infallible;

use serde::Deserialize;
use serde_json::json;
use warp::http::StatusCode;
use warp::Filter;

use crate::service::ChatService;

#[derive(Debug, Deserialize)]
struct NewMessage {
    username: String,
    content: String,
}

/// All `/api` routes: list/post/clear messages plus the active-users
/// heartbeat endpoint.
pub fn api(
    service: ChatService,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let messages = warp::path!("api" / "messages");
    let list = messages
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(list_messages);
    let post = messages
        .and(warp::post())
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(post_message);
    let clear = messages
        .and(warp::delete())
        .and(with_service(service.clone()))
        .and_then(clear_messages);
    let active = warp::path!("api" / "active-users")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_service(service))
        .and_then(active_users);

    list.or(post).or(clear).or(active)
}

fn with_service(
    service: ChatService,
) -> impl Filter<Extract = (ChatService,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

async fn list_messages(service: ChatService) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&service.messages()))
}

async fn post_message(
    body: NewMessage,
    service: ChatService,
) -> Result<impl warp::Reply, Infallible> {
    match service.post_message(&body.username, &body.content) {
        Ok(message) => Ok(warp::reply::with_status(
            warp::reply::json(&message),
            StatusCode::OK,
        )),
        Err(err) => {
            log::debug!("rejected message from {:?}: {err}", body.username);
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({ "error": err.to_string() })),
                StatusCode::BAD_REQUEST,
            ))
        }
    }
}

async fn clear_messages(service: ChatService) -> Result<impl warp::Reply, Infallible> {
    service.clear_messages();
    Ok(warp::reply::json(&json!({ "message": "All messages cleared" })))
}

async fn active_users(
    query: HashMap<String, String>,
    service: ChatService,
) -> Result<impl warp::Reply, Infallible> {
    match query.get("username") {
        Some(username) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "users": service.poll_active_users(username) })),
            StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "error": "missing username query parameter" })),
            StatusCode::BAD_REQUEST,
        )),
    }
}
