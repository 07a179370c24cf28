use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};

use futures::Stream;
use serde::Serialize;
use std::{convert::Infallible, fmt::Display, time::Duration};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt as _};
use tracing::{debug, error};

use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventType {
    UploadFinished,
    UploadRejected,
    CharacterSaved,
    LikesChanged,
}

impl Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::UploadFinished => write!(f, "upload_finished"),
            EventType::UploadRejected => write!(f, "upload_rejected"),
            EventType::CharacterSaved => write!(f, "character_saved"),
            EventType::LikesChanged => write!(f, "likes_changed"),
        }
    }
}

/// Transient notice published to all event stream subscribers.
#[derive(Clone, Debug)]
pub struct EventMessage {
    id: String,
    kind: EventType,
    data: String,
}

impl EventMessage {
    pub fn new<T>(id: impl ToString, kind: EventType, data: T) -> Self
    where
        T: Serialize,
    {
        let data = serde_json::to_string(&data).unwrap_or_else(|e| {
            error!("Cannot serialize {kind} event: {e}");
            "null".to_string()
        });
        Self {
            id: id.to_string(),
            kind,
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EventType {
        self.kind
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

#[derive(Clone)]
pub struct Events {
    sender: broadcast::Sender<EventMessage>,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Events { sender }
    }

    /// Publishes the notice, it is dropped when nobody listens.
    pub fn send(&self, message: EventMessage) {
        debug!("Event {} {}", message.kind, message.id);
        let _ = self.sender.send(message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventMessage> {
        self.sender.subscribe()
    }

    /// Lagging subscribers skip the notices they missed.
    pub fn receiver_stream(&self) -> impl Stream<Item = EventMessage> + Send + 'static {
        BroadcastStream::new(self.subscribe()).filter_map(|m| match m {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("Event subscriber lagging: {e}");
                None
            }
        })
    }
}

async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.events().receiver_stream().map(|e| {
        Ok(Event::default()
            .id(e.id)
            .event(e.kind.to_string())
            .data(format!(r#"{{"type":"{}","data":{}}}"#, e.kind, e.data)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(10))
            .text("ping"),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(sse_handler))
}
