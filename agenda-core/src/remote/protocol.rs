//! Defines the JSON protocol used for communication between agenda
//! and provider binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::Event;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    SyncEvents,
    ListHolidays,
}

/// Request sent from agenda to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to agenda.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> serde_json::Result<String> {
        serde_json::to_string(&Response::Success { data })
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> serde_json::Result<String> {
        serde_json::to_string(&Response::<()>::Error {
            error: msg.to_string(),
        })
    }
}

/// Push the full local event list to an external calendar.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncEvents {
    pub events: Vec<Event>,
}

/// What an external calendar reports back after a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_events: Option<Vec<Event>>,
}

impl ProviderCommand for SyncEvents {
    type Response = SyncResponse;
    fn command() -> Command {
        Command::SyncEvents
    }
}

/// Public holidays for a year and country.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListHolidays {
    pub year: i32,
    pub country_code: String,
}

impl ProviderCommand for ListHolidays {
    // Kept loose: malformed holiday payloads degrade instead of failing the call
    type Response = serde_json::Value;
    fn command() -> Command {
        Command::ListHolidays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let request = Request {
            command: Command::ListHolidays,
            params: serde_json::to_value(ListHolidays {
                year: 2024,
                country_code: "IN".into(),
            })
            .unwrap(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["command"], "list_holidays");
        assert_eq!(json["params"]["year"], 2024);
        assert_eq!(json["params"]["country_code"], "IN");
    }

    #[test]
    fn response_wire_shape() {
        let ok: Response<SyncResponse> = serde_json::from_str(
            r#"{"status":"success","data":{"success":true,"message":"done"}}"#,
        )
        .unwrap();
        match ok {
            Response::Success { data } => {
                assert!(data.success);
                assert_eq!(data.message, "done");
                assert_eq!(data.synced_events, None);
            }
            Response::Error { .. } => panic!("Expected success"),
        }

        let err = Response::error("boom").unwrap();
        assert_eq!(err, r#"{"status":"error","error":"boom"}"#);
    }
}
