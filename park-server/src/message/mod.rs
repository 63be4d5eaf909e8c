//! 推送通道模块
//!
//! # 消息流
//!
//! ```text
//! Admin client ──▶ admin:notify ──▶ MessageBus ──▶ guest connections
//! QueueRandomizer ──▶ poi:queueUpdate ──▶ MessageBus ──▶ all connections
//! ```
//!
//! Audience membership is fixed at connect time by the WebSocket
//! handshake and never re-evaluated per message.

pub mod bus;
pub mod ws;

pub use bus::{ConnectedClient, MessageBus};
pub use shared::message::{Audience, AudienceFilter, BusMessage, EventType, WsFrame};
