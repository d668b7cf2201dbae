use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::dictionary::{Dictionary, DictionaryError};
use crate::dispatcher::Event;
use crate::fetch::OutboundRequest;

/// Size of the inbound message buffer. Larger responses are dropped.
pub const INBOUND_BUFFER_SIZE: usize = 124;

/// Size of the outbound message buffer.
pub const OUTBOUND_BUFFER_SIZE: usize = 124;

#[derive(Debug, Error, PartialEq)]
pub enum BridgeError {
    #[error("no runtime to carry the request")]
    Offline,
    #[error("request path is not a valid URL")]
    InvalidPath,
    #[error("request needs {0} bytes of the {} byte outbound buffer", OUTBOUND_BUFFER_SIZE)]
    MessageTooLarge(usize),
}

/// Outbound side of the phone's network bridge. Sending is fire-and-forget: the response, if one
/// ever arrives, comes back through the dispatcher as a separate event.
pub trait NetworkBridge {
    fn is_ready(&self) -> bool;

    fn send(&mut self, request: OutboundRequest) -> Result<(), BridgeError>;
}

#[derive(Debug, Error)]
enum ResponseError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response of {0} bytes exceeds the {} byte inbound buffer", INBOUND_BUFFER_SIZE)]
    TooLarge(usize),
    #[error("response is not UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("response is not a dictionary: {0}")]
    Dictionary(#[from] DictionaryError),
}

/// Bridge backed by plain HTTP on the tokio runtime.
pub struct HttpBridge {
    client: reqwest::Client,
    runtime: Option<Handle>,
    events: UnboundedSender<Event>,
}

impl HttpBridge {
    /// Must be created from within the runtime that will carry the requests; otherwise the bridge
    /// reports itself as not ready.
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            client: reqwest::Client::new(),
            runtime: Handle::try_current().ok(),
            events,
        }
    }
}

impl NetworkBridge for HttpBridge {
    fn is_ready(&self) -> bool {
        self.runtime.is_some()
    }

    fn send(&mut self, request: OutboundRequest) -> Result<(), BridgeError> {
        let runtime = self.runtime.as_ref().ok_or(BridgeError::Offline)?;

        if request.encoded_len() > OUTBOUND_BUFFER_SIZE {
            return Err(BridgeError::MessageTooLarge(request.encoded_len()));
        }

        let url = std::str::from_utf8(&request.path)
            .ok()
            .and_then(|path| reqwest::Url::parse(path).ok())
            .ok_or(BridgeError::InvalidPath)?;

        let client = self.client.clone();
        let events = self.events.clone();

        runtime.spawn(async move {
            match get(client, url, &request).await {
                Ok((status, payload)) => {
                    let event = Event::NetworkResponse {
                        correlation_id: request.correlation_id,
                        status,
                        payload,
                    };
                    if events.send(event).is_err() {
                        debug!("dispatcher stopped before the response arrived");
                    }
                }
                Err(e) => warn!(error = %e, "settings request failed"),
            }
        });

        Ok(())
    }
}

async fn get(
    client: reqwest::Client,
    url: reqwest::Url,
    request: &OutboundRequest,
) -> Result<(u16, Dictionary), ResponseError> {
    let response = client
        .get(url)
        .header("X-App-Id", request.app_id.to_string())
        .header("X-Request-Id", request.correlation_id.to_string())
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.bytes().await?;
    Ok((status, decode_body(&body)?))
}

/// Decode a response body that must fit the inbound buffer.
fn decode_body(body: &[u8]) -> Result<Dictionary, ResponseError> {
    if body.len() > INBOUND_BUFFER_SIZE {
        return Err(ResponseError::TooLarge(body.len()));
    }

    Ok(Dictionary::parse(std::str::from_utf8(body)?)?)
}
