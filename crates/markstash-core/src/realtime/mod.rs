//! Realtime change notifications over the hosted backend's WebSocket surface.
//!
//! The backend speaks the Phoenix channel protocol: JSON frames with a topic,
//! an event, a payload, and a client-assigned ref. Joining the channel topic
//! for a table with a `postgres_changes` config makes the server push one
//! event per committed insert/update/delete on that table. Consumers hold a
//! [`TableSubscription`], read change events from it, and drop it to tear the
//! socket down.

use std::fmt;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::util::is_http_url;

const SOCKET_PATH: &str = "/realtime/v1/websocket";
const SOCKET_VSN: &str = "1.0.0";
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

const TOPIC_PHOENIX: &str = "phoenix";
const EVENT_JOIN: &str = "phx_join";
const EVENT_REPLY: &str = "phx_reply";
const EVENT_ERROR: &str = "phx_error";
const EVENT_HEARTBEAT: &str = "heartbeat";
const EVENT_SYSTEM: &str = "system";
const EVENT_POSTGRES_CHANGES: &str = "postgres_changes";

const JOIN_REF: &str = "1";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("Invalid realtime configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Failed to encode realtime frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Channel join rejected: {0}")]
    JoinRejected(String),
    #[error("Realtime socket closed before the channel was joined")]
    ClosedDuringJoin,
}

pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Kind of row mutation reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One committed mutation on a subscribed table.
///
/// Notifications arrive for every change on the table regardless of owner;
/// consumers refetch with their own owner filter rather than applying the
/// change locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableChange {
    pub kind: ChangeKind,
    pub table: String,
}

/// Client for the hosted backend's realtime socket.
#[derive(Clone)]
pub struct RealtimeClient {
    base_url: String,
    anon_key: String,
}

impl RealtimeClient {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> RealtimeResult<Self> {
        let base_url = normalize_base_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(RealtimeError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self { base_url, anon_key })
    }

    /// Open the socket, join the table's channel, and hand back a
    /// subscription that yields one event per committed change.
    ///
    /// The subscription owns the socket task; dropping it aborts the task and
    /// closes the connection.
    pub async fn subscribe_table_changes(
        &self,
        table: &str,
        access_token: &str,
    ) -> RealtimeResult<TableSubscription> {
        let table = table.trim();
        if table.is_empty() {
            return Err(RealtimeError::InvalidConfiguration(
                "Table name must not be empty",
            ));
        }

        let socket_url = socket_url(&self.base_url, &self.anon_key)?;
        let (mut socket, _response) = connect_async(&socket_url).await?;

        let topic = format!("realtime:{table}");
        join_channel(&mut socket, &topic, join_payload(table, access_token)).await?;
        tracing::debug!("Joined realtime channel {}", topic);

        let (sink, stream) = socket.split();
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_subscription(sink, stream, changes_tx, topic));

        Ok(TableSubscription {
            changes: changes_rx,
            task,
        })
    }
}

impl fmt::Debug for RealtimeClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RealtimeClient")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

/// Live subscription to one table's change stream.
pub struct TableSubscription {
    changes: mpsc::UnboundedReceiver<TableChange>,
    task: JoinHandle<()>,
}

impl TableSubscription {
    /// Wait for the next change event.
    ///
    /// Returns `None` once the underlying socket has ended; the stream does
    /// not reconnect.
    pub async fn next_change(&mut self) -> Option<TableChange> {
        self.changes.recv().await
    }
}

impl Drop for TableSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl fmt::Debug for TableSubscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TableSubscription")
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

/// Wire frame for the channel protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PhoenixFrame {
    topic: String,
    event: String,
    payload: Value,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

async fn join_channel(socket: &mut WsStream, topic: &str, payload: Value) -> RealtimeResult<()> {
    let join = PhoenixFrame {
        topic: topic.to_string(),
        event: EVENT_JOIN.to_string(),
        payload,
        reference: Some(JOIN_REF.to_string()),
    };
    socket.send(Message::Text(serde_json::to_string(&join)?)).await?;

    while let Some(message) = socket.next().await {
        match message? {
            Message::Text(raw) => {
                let Ok(frame) = serde_json::from_str::<PhoenixFrame>(&raw) else {
                    continue;
                };
                if frame.event == EVENT_REPLY && frame.reference.as_deref() == Some(JOIN_REF) {
                    return match reply_status(&frame.payload) {
                        Some("ok") => Ok(()),
                        _ => Err(RealtimeError::JoinRejected(render_reply(&frame.payload))),
                    };
                }
            }
            Message::Ping(data) => socket.send(Message::Pong(data)).await?,
            Message::Close(_) => break,
            _ => {}
        }
    }

    Err(RealtimeError::ClosedDuringJoin)
}

async fn run_subscription(
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
    changes: mpsc::UnboundedSender<TableChange>,
    topic: String,
) {
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Ref 1 was spent on the join frame.
    let mut reference: u64 = 1;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                reference += 1;
                let frame = heartbeat_frame(reference);
                let encoded = match serde_json::to_string(&frame) {
                    Ok(encoded) => encoded,
                    Err(error) => {
                        tracing::warn!("Failed to encode heartbeat frame: {}", error);
                        break;
                    }
                };
                if let Err(error) = sink.send(Message::Text(encoded)).await {
                    tracing::warn!("Realtime heartbeat failed: {}", error);
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(raw))) => {
                        if !handle_text_frame(&raw, &changes, &topic) {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(error) = sink.send(Message::Pong(data)).await {
                            tracing::warn!("Realtime pong failed: {}", error);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Realtime socket closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::warn!("Realtime socket error: {}", error);
                        break;
                    }
                    None => {
                        tracing::warn!("Realtime socket stream ended");
                        break;
                    }
                }
            }
        }
    }
}

/// Returns `false` when the subscription should stop.
fn handle_text_frame(
    raw: &str,
    changes: &mpsc::UnboundedSender<TableChange>,
    topic: &str,
) -> bool {
    let frame = match serde_json::from_str::<PhoenixFrame>(raw) {
        Ok(frame) => frame,
        Err(error) => {
            tracing::debug!("Ignoring unparseable realtime frame: {}", error);
            return true;
        }
    };

    match frame.event.as_str() {
        EVENT_POSTGRES_CHANGES => {
            if frame.topic != topic {
                return true;
            }
            match parse_table_change(&frame.payload) {
                Some(change) => {
                    tracing::debug!(
                        "Received {:?} change for table {}",
                        change.kind,
                        change.table
                    );
                    // A dropped receiver means the consumer went away.
                    changes.send(change).is_ok()
                }
                None => {
                    tracing::debug!("Ignoring change frame without a recognized payload");
                    true
                }
            }
        }
        EVENT_ERROR => {
            tracing::warn!("Realtime channel {} reported an error", frame.topic);
            false
        }
        EVENT_REPLY | EVENT_SYSTEM => true,
        _ => true,
    }
}

fn join_payload(table: &str, access_token: &str) -> Value {
    serde_json::json!({
        "config": {
            "broadcast": { "self": false },
            "presence": { "key": "" },
            "postgres_changes": [
                { "event": "*", "schema": "public", "table": table }
            ]
        },
        "access_token": access_token,
    })
}

fn heartbeat_frame(reference: u64) -> PhoenixFrame {
    PhoenixFrame {
        topic: TOPIC_PHOENIX.to_string(),
        event: EVENT_HEARTBEAT.to_string(),
        payload: serde_json::json!({}),
        reference: Some(reference.to_string()),
    }
}

fn reply_status(payload: &Value) -> Option<&str> {
    payload.get("status").and_then(Value::as_str)
}

fn render_reply(payload: &Value) -> String {
    payload
        .get("response")
        .map_or_else(|| payload.to_string(), Value::to_string)
}

fn parse_table_change(payload: &Value) -> Option<TableChange> {
    let data = payload.get("data")?;
    let kind = match data.get("type").and_then(Value::as_str)? {
        "INSERT" => ChangeKind::Insert,
        "UPDATE" => ChangeKind::Update,
        "DELETE" => ChangeKind::Delete,
        _ => return None,
    };
    let table = data.get("table").and_then(Value::as_str)?.to_string();
    Some(TableChange { kind, table })
}

fn normalize_base_url(url: &str) -> RealtimeResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(RealtimeError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(RealtimeError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

fn socket_url(base_url: &str, anon_key: &str) -> RealtimeResult<String> {
    let ws_base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(RealtimeError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    };

    Ok(format!(
        "{ws_base}{SOCKET_PATH}?apikey={}&vsn={SOCKET_VSN}",
        urlencoding::encode(anon_key)
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn socket_url_swaps_scheme_and_encodes_key() {
        let url = socket_url("https://demo.supabase.co", "anon+key").unwrap();
        assert_eq!(
            url,
            "wss://demo.supabase.co/realtime/v1/websocket?apikey=anon%2Bkey&vsn=1.0.0"
        );

        let plain = socket_url("http://localhost:54321", "anon").unwrap();
        assert_eq!(
            plain,
            "ws://localhost:54321/realtime/v1/websocket?apikey=anon&vsn=1.0.0"
        );
    }

    #[test]
    fn client_constructor_validates_configuration() {
        assert!(RealtimeClient::new("demo.supabase.co", "anon").is_err());
        assert!(RealtimeClient::new("https://demo.supabase.co", "  ").is_err());
        assert!(RealtimeClient::new("https://demo.supabase.co/", "anon").is_ok());
    }

    #[test]
    fn client_debug_redacts_anon_key() {
        let client = RealtimeClient::new("https://demo.supabase.co", "secret-anon").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-anon"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn join_payload_scopes_changes_to_table() {
        let payload = join_payload("bookmarks", "user-token");
        assert_eq!(
            payload["config"]["postgres_changes"][0]["table"],
            "bookmarks"
        );
        assert_eq!(payload["config"]["postgres_changes"][0]["event"], "*");
        assert_eq!(payload["config"]["postgres_changes"][0]["schema"], "public");
        assert_eq!(payload["access_token"], "user-token");
    }

    #[test]
    fn frames_round_trip_with_ref_field() {
        let frame = heartbeat_frame(7);
        let encoded = serde_json::to_string(&frame).unwrap();
        assert!(encoded.contains(r#""ref":"7""#));
        assert!(encoded.contains(r#""topic":"phoenix""#));

        let decoded: PhoenixFrame = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn reply_status_reads_join_acknowledgement() {
        let ok: Value = serde_json::json!({ "status": "ok", "response": {} });
        assert_eq!(reply_status(&ok), Some("ok"));

        let rejected: Value =
            serde_json::json!({ "status": "error", "response": { "reason": "unauthorized" } });
        assert_eq!(reply_status(&rejected), Some("error"));
        assert!(render_reply(&rejected).contains("unauthorized"));
    }

    #[test]
    fn parse_table_change_maps_mutation_kinds() {
        let insert: Value = serde_json::json!({
            "ids": [1],
            "data": { "type": "INSERT", "table": "bookmarks", "schema": "public" }
        });
        assert_eq!(
            parse_table_change(&insert),
            Some(TableChange {
                kind: ChangeKind::Insert,
                table: "bookmarks".to_string()
            })
        );

        let delete: Value = serde_json::json!({
            "data": { "type": "DELETE", "table": "bookmarks" }
        });
        assert_eq!(
            parse_table_change(&delete).map(|change| change.kind),
            Some(ChangeKind::Delete)
        );
    }

    #[test]
    fn parse_table_change_rejects_unknown_payloads() {
        assert!(parse_table_change(&serde_json::json!({})).is_none());
        assert!(parse_table_change(&serde_json::json!({
            "data": { "type": "TRUNCATE", "table": "bookmarks" }
        }))
        .is_none());
    }
}
