//! 推送通道消息类型定义
//!
//! These types are shared between park-server and clients. The wire
//! format is a JSON frame `{"event": ..., "data": ...}` carried over the
//! WebSocket channel.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

/// Push channel event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Admin-originated broadcast to guests
    Notification,
    /// Queue lengths changed, refetch POIs
    QueueUpdate,
    /// Client request: rebroadcast my payload to guests
    AdminNotify,
}

impl EventType {
    /// Wire name of the event, as emitted in the JSON frame
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Notification => "notification",
            EventType::QueueUpdate => "poi:queueUpdate",
            EventType::AdminNotify => "admin:notify",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "notification" => Some(EventType::Notification),
            "poi:queueUpdate" => Some(EventType::QueueUpdate),
            "admin:notify" => Some(EventType::AdminNotify),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection audience, fixed at handshake time
///
/// A connection whose bearer credential validates joins the admin group;
/// everything else is a guest. 凭证校验失败不报错，静默降级为 guest。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Admin,
    Guest,
}

/// Which audience group a bus message is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceFilter {
    /// Every connected client
    All,
    /// Unprivileged connections only (admin notifications are never
    /// echoed back to admins, including the sender)
    Guests,
}

impl AudienceFilter {
    pub fn includes(&self, audience: Audience) -> bool {
        match self {
            AudienceFilter::All => true,
            AudienceFilter::Guests => audience == Audience::Guest,
        }
    }
}

/// Message routed through the server-side broadcast bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub audience: AudienceFilter,
    pub data: Option<serde_json::Value>,
}

impl BusMessage {
    pub fn new(
        event_type: EventType,
        audience: AudienceFilter,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            audience,
            data,
        }
    }

    /// Admin notification, delivered to the guest group only
    pub fn notification(data: serde_json::Value) -> Self {
        Self::new(EventType::Notification, AudienceFilter::Guests, Some(data))
    }

    /// Queue invalidation signal, delivered to everyone. No payload:
    /// clients refetch instead of receiving the new data.
    pub fn queue_update() -> Self {
        Self::new(EventType::QueueUpdate, AudienceFilter::All, None)
    }

    /// Render as the outbound JSON wire frame
    pub fn to_frame(&self) -> WsFrame {
        WsFrame {
            event: self.event_type.as_str().to_string(),
            data: self.data.clone(),
        }
    }
}

/// JSON frame exchanged over the WebSocket channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsFrame {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl WsFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parse the payload as a concrete type
    pub fn parse_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone().unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(EventType::Notification.as_str(), "notification");
        assert_eq!(EventType::QueueUpdate.as_str(), "poi:queueUpdate");
        assert_eq!(EventType::AdminNotify.as_str(), "admin:notify");
        assert_eq!(
            EventType::from_event_name("poi:queueUpdate"),
            Some(EventType::QueueUpdate)
        );
        assert_eq!(EventType::from_event_name("bogus"), None);
    }

    #[test]
    fn test_audience_filtering() {
        // queue updates reach everyone
        let queue = BusMessage::queue_update();
        assert!(queue.audience.includes(Audience::Admin));
        assert!(queue.audience.includes(Audience::Guest));

        // admin notifications reach guests only
        let note = BusMessage::notification(serde_json::json!({"text": "parade at 14:00"}));
        assert!(!note.audience.includes(Audience::Admin));
        assert!(note.audience.includes(Audience::Guest));
    }

    #[test]
    fn test_frame_roundtrip() {
        let msg = BusMessage::notification(serde_json::json!({"text": "hi"}));
        let json = msg.to_frame().to_json().unwrap();
        let frame = WsFrame::from_json(&json).unwrap();
        assert_eq!(frame.event, "notification");
        assert_eq!(frame.data.unwrap()["text"], "hi");
    }

    #[test]
    fn test_queue_update_frame_has_no_payload() {
        let json = BusMessage::queue_update().to_frame().to_json().unwrap();
        assert_eq!(json, r#"{"event":"poi:queueUpdate"}"#);
    }
}
