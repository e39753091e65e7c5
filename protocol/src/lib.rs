//! Wire types for the velha client/peer channel.
//!
//! Every payload is a JSON object tagged by its `action` field. The inbound
//! side is deliberately loose: all data fields are optional and unknown
//! discriminants decode into [`ServerMessage::Unknown`], which dispatchers
//! treat as a no-op.

use serde::{Deserialize, Serialize};

/// Outbound intents, sent by the browser client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    StartGame { player_symbol: String },
    MakeMove { row: u8, col: u8 },
    AiMove,
    ResetGame,
    GetBoard,
    Chat { message: String },
}

/// Inbound notifications from the peer.
///
/// Board-carrying fields (`result`, `ai_result`, `board_state`) hold the
/// peer's textual snapshot, an opaque string as far as this crate goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    StartGame {
        #[serde(default)]
        status: Option<String>,
    },
    MakeMove {
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        ai_result: Option<String>,
    },
    AiMove {
        #[serde(default)]
        result: Option<String>,
    },
    ResetGame {
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        status: Option<String>,
    },
    GetBoard {
        #[serde(default)]
        board_state: Option<String>,
    },
    Chat {
        #[serde(default)]
        reply: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_game_serializes_with_action_tag() {
        let msg = ClientMessage::StartGame {
            player_symbol: "O".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["action"], "start_game");
        assert_eq!(json["player_symbol"], "O");
    }

    #[test]
    fn make_move_carries_row_and_col() {
        let json = serde_json::to_string(&ClientMessage::MakeMove { row: 1, col: 2 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["action"], "make_move");
        assert_eq!(value["row"], 1);
        assert_eq!(value["col"], 2);
    }

    #[test]
    fn fieldless_intents_serialize_to_bare_tags() {
        for (msg, tag) in [
            (ClientMessage::AiMove, "ai_move"),
            (ClientMessage::ResetGame, "reset_game"),
            (ClientMessage::GetBoard, "get_board"),
        ] {
            let value: serde_json::Value = serde_json::to_value(&msg).unwrap();
            assert_eq!(value, serde_json::json!({ "action": tag }));
        }
    }

    #[test]
    fn make_move_reply_decodes_with_optional_ai_result() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"action":"make_move","result":"board"}"#).unwrap();

        assert_eq!(
            msg,
            ServerMessage::MakeMove {
                result: Some("board".to_string()),
                ai_result: None,
            }
        );
    }

    #[test]
    fn unknown_action_decodes_to_unknown() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"action":"telemetry","payload":42}"#).unwrap();

        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn chat_reply_roundtrips() {
        let msg = ServerMessage::Chat {
            reply: Some("nice move".to_string()),
        };
        let json = serde_json::to_string(&msg).unwrap();

        assert_eq!(serde_json::from_str::<ServerMessage>(&json).unwrap(), msg);
    }
}
