//! Browser WebSocket wrapper.
//!
//! Each socket reports its events tagged with the [`ConnectionId`] it was
//! opened under, so the reducer can discard anything from a socket it has
//! already let go of.

use gloo_events::EventListener;
use js_sys::{ArrayBuffer, Uint8Array};
use wasm_bindgen::JsCast;
use web_sys::{BinaryType, CloseEvent, MessageEvent, WebSocket};
use yew::Callback;

use crate::error::{Result, ViewerError};
use crate::reconnect::ConnectionId;

#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    Opened,
    Message(String),
    Closed,
}

pub struct LogSocket {
    id: ConnectionId,
    socket: WebSocket,
    _listeners: [EventListener; 4],
}

impl LogSocket {
    pub fn open(
        url: &str,
        id: ConnectionId,
        on_event: Callback<(ConnectionId, SocketEvent)>,
    ) -> Result<Self> {
        log::info!("connecting to log stream at {url} ({id})");
        let socket =
            WebSocket::new(url).map_err(|err| ViewerError::Connect(format!("{err:?}")))?;
        socket.set_binary_type(BinaryType::Arraybuffer);

        let on_open = {
            let on_event = on_event.clone();
            EventListener::new(&socket, "open", move |_| {
                log::info!("log stream connected ({id})");
                on_event.emit((id, SocketEvent::Opened));
            })
        };

        let on_message = {
            let on_event = on_event.clone();
            EventListener::new(&socket, "message", move |event| {
                let Some(event) = event.dyn_ref::<MessageEvent>() else {
                    return;
                };
                match frame_text(&event.data()) {
                    Some(text) => on_event.emit((id, SocketEvent::Message(text))),
                    None => log::debug!("skipping unsupported frame on {id}"),
                }
            })
        };

        let on_close = EventListener::new(&socket, "close", move |event| {
            match event.dyn_ref::<CloseEvent>() {
                Some(close) => log::warn!(
                    "log stream disconnected ({id}, code {}, reason {:?})",
                    close.code(),
                    close.reason()
                ),
                None => log::warn!("log stream disconnected ({id})"),
            }
            on_event.emit((id, SocketEvent::Closed));
        });

        let on_error = {
            let target = socket.clone();
            EventListener::new(&socket, "error", move |event| {
                log::error!("log stream error on {id}: {:?}", event.type_());
                if let Err(err) = target.close() {
                    log::error!("failed to close errored socket {id}: {err:?}");
                }
            })
        };

        Ok(Self {
            id,
            socket,
            _listeners: [on_open, on_message, on_close, on_error],
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for LogSocket {
    fn drop(&mut self) {
        let state = self.socket.ready_state();
        if state == WebSocket::CONNECTING || state == WebSocket::OPEN {
            log::debug!("closing log stream {}", self.id);
            if let Err(err) = self.socket.close() {
                log::error!("failed to close log stream {}: {err:?}", self.id);
            }
        }
    }
}

fn frame_text(data: &wasm_bindgen::JsValue) -> Option<String> {
    if let Some(text) = data.as_string() {
        return Some(text);
    }
    let buffer = data.dyn_ref::<ArrayBuffer>()?;
    let bytes = Uint8Array::new(buffer).to_vec();
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
