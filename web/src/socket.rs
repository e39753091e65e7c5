//! The single duplex channel to the game peer.
//!
//! One [`web_sys::WebSocket`] at a time, pointed at `/ws` on the hosting
//! page's own host, with the scheme following the page's scheme. There is
//! deliberately no send buffer: anything sent while the channel is not open
//! is dropped, and the component layer owns the fixed-delay reconnect.

use velha_protocol::{ClientMessage, ServerMessage};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};
use yew::Callback;

/// Connectivity and traffic events delivered to the component layer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SocketEvent {
    Opened,
    Message(ServerMessage),
    Closed,
}

/// Derives the channel address from the page's scheme and host.
pub(crate) fn socket_url(scheme: &str, host: &str) -> String {
    let ws_scheme = if scheme == "https:" { "wss:" } else { "ws:" };
    format!("{}//{}/ws", ws_scheme, host)
}

pub(crate) fn page_socket_url() -> String {
    let location = gloo::utils::window().location();
    let scheme = location
        .protocol()
        .unwrap_or_else(|_| String::from("http:"));
    let host = location
        .host()
        .unwrap_or_else(|_| String::from("localhost"));
    socket_url(&scheme, &host)
}

pub(crate) struct Socket {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(ErrorEvent)>,
}

impl Socket {
    pub(crate) fn open(url: &str, events: Callback<SocketEvent>) -> Result<Self, JsValue> {
        let ws = WebSocket::new(url)?;

        let on_open = {
            let events = events.clone();
            Closure::wrap(Box::new(move || {
                log::info!("channel open");
                events.emit(SocketEvent::Opened);
            }) as Box<dyn FnMut()>)
        };
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let on_message = {
            let events = events.clone();
            Closure::wrap(Box::new(move |e: MessageEvent| {
                let Some(text) = e.data().as_string() else {
                    log::warn!("discarding non-text frame");
                    return;
                };
                match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(msg) => events.emit(SocketEvent::Message(msg)),
                    // One undecodable payload never takes the channel down.
                    Err(err) => log::warn!("discarding undecodable payload: {}", err),
                }
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_close = {
            let events = events.clone();
            Closure::wrap(Box::new(move |e: CloseEvent| {
                log::info!("channel closed (code {})", e.code());
                events.emit(SocketEvent::Closed);
            }) as Box<dyn FnMut(CloseEvent)>)
        };
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        // Advisory only; the close handler owns the reconnect.
        let on_error = Closure::wrap(Box::new(move |e: ErrorEvent| {
            log::error!("channel error: {}", e.message());
        }) as Box<dyn FnMut(ErrorEvent)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Self {
            ws,
            _on_open: on_open,
            _on_message: on_message,
            _on_close: on_close,
            _on_error: on_error,
        })
    }

    pub(crate) fn is_open(&self) -> bool {
        self.ws.ready_state() == WebSocket::OPEN
    }

    /// Sends one message, or drops it when the channel is not open.
    pub(crate) fn send(&self, msg: &ClientMessage) {
        if !self.is_open() {
            log::debug!("dropping outbound message while disconnected: {:?}", msg);
            return;
        }

        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(err) = self.ws.send_with_str(&json) {
                    log::error!("send failed: {:?}", err);
                }
            }
            Err(err) => log::error!("could not encode outbound message: {}", err),
        }
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        // Detach handlers first so replacing the socket never fires a stale
        // close event into the reconnect path.
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
        let _ = self.ws.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insecure_pages_get_plain_ws() {
        assert_eq!(socket_url("http:", "example.com:8001"), "ws://example.com:8001/ws");
    }

    #[test]
    fn secure_pages_get_wss() {
        assert_eq!(socket_url("https:", "example.com"), "wss://example.com/ws");
    }

    #[test]
    fn unexpected_schemes_fall_back_to_plain_ws() {
        assert_eq!(socket_url("file:", "localhost"), "ws://localhost/ws");
    }
}
