// protocol.rs
//
// Wire format for the push transport. Everything on the socket is a JSON
// object tagged with a `type` field, payloads ride under `data`.
use serde::{Serialize, Deserialize};

use crate::message::Message;

/// Client -> server frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    Join { username: String },
    Leave { username: String },
}

/// Server -> client frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    Message { data: Message },
    Users { data: Vec<String> },
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_parse_from_tagged_json() {
        let join: ClientEvent =
            serde_json::from_str(r#"{"type":"join","username":"Fox42"}"#).unwrap();
        assert_eq!(join, ClientEvent::Join { username: "Fox42".into() });

        let leave: ClientEvent =
            serde_json::from_str(r#"{"type":"leave","username":"Fox42"}"#).unwrap();
        assert_eq!(leave, ClientEvent::Leave { username: "Fox42".into() });
    }

    #[test]
    fn server_events_serialize_with_type_tag() {
        let users = ServerEvent::Users { data: vec!["Bear7".into(), "Cat9".into()] };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&users).unwrap()).unwrap();
        assert_eq!(json["type"], "users");
        assert_eq!(json["data"][1], "Cat9");

        let clear = serde_json::to_string(&ServerEvent::Clear).unwrap();
        assert_eq!(clear, r#"{"type":"clear"}"#);
    }
}
