//! The one-shot settings request and the correlation of its response.
//!
//! At start-up the watch face asks the settings service for its display parameters. The request
//! path is the service prefix followed by the paired device's hardware identifier, copied in as
//! raw bytes: the service keys its records on exactly those bytes. Exactly one request can be
//! outstanding, and only a response carrying its correlation id is ever applied.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bridge::NetworkBridge;
use crate::dictionary::Dictionary;
use crate::settings::RawSettingsPayload;

/// Prefix of every settings request path.
pub const SETTINGS_BASE_PATH: &str = "http://setpebble.com/api/JRSR/";

/// Capacity of the request path buffer, including its terminating byte.
pub const PATH_CAPACITY: usize = 40;

/// Correlation id used for the settings request. Never randomised.
pub const SETTINGS_COOKIE: i32 = 1_949_328_672;

/// Client identifier presented to the network bridge.
pub const APP_ID: i32 = 0x1631_5378;

/// Length of the hardware identifier supplied by the platform.
pub const DEVICE_ID_LEN: usize = 12;

/// Dictionary key holding the settings string in a response.
pub const SETTINGS_KEY: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum SendError {
    #[error("network bridge is not available")]
    TransportUnavailable,
    #[error("request path needs {needed} bytes but the buffer holds {capacity}")]
    EncodingOverflow { needed: usize, capacity: usize },
    #[error("a settings request is already outstanding")]
    RequestOutstanding,
}

/// Knobs for the request. The defaults are the values the settings service expects.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchConfig {
    pub base_path: String,
    pub path_capacity: usize,
    pub correlation_id: i32,
    pub app_id: i32,
}

impl FetchConfig {
    /// Whether a request for an identifier of this length fits the path buffer.
    pub fn fits(&self, identifier_len: usize) -> bool {
        self.base_path.len() + identifier_len + 1 <= self.path_capacity
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_path: SETTINGS_BASE_PATH.to_string(),
            path_capacity: PATH_CAPACITY,
            correlation_id: SETTINGS_COOKIE,
            app_id: APP_ID,
        }
    }
}

/// What the bridge is asked to send. `path` holds raw bytes and need not be valid UTF-8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest {
    pub path: Vec<u8>,
    pub correlation_id: i32,
    pub app_id: i32,
}

impl OutboundRequest {
    /// Size of the request as the bridge frames it: the terminated path plus the two ids.
    pub fn encoded_len(&self) -> usize {
        self.path.len() + 1 + 2 * std::mem::size_of::<i32>()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: i32,
    pub sent_at: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// No request is outstanding under this id; the response was dropped.
    Unmatched,
    /// The outstanding request was answered. The payload is `None` when the response carried no
    /// usable settings string.
    Matched(Option<RawSettingsPayload>),
}

/// Concatenate the base path and the identifier bytes, verbatim. The terminating byte counts
/// against `capacity` but is not part of the returned path.
pub fn build_path(
    base_path: &str,
    device_identifier: &[u8],
    capacity: usize,
) -> Result<Vec<u8>, SendError> {
    let needed = base_path.len() + device_identifier.len() + 1;
    if needed > capacity {
        return Err(SendError::EncodingOverflow { needed, capacity });
    }

    let mut path = Vec::with_capacity(needed);
    path.extend_from_slice(base_path.as_bytes());
    path.extend_from_slice(device_identifier);
    Ok(path)
}

/// Single-slot settings request state.
#[derive(Debug, Default)]
pub struct SettingsFetch {
    config: FetchConfig,
    pending: Option<PendingRequest>,
}

impl SettingsFetch {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Build and send the settings request. Nothing is left outstanding on failure, and there is
    /// no retry.
    pub fn send_settings_request(
        &mut self,
        bridge: &mut impl NetworkBridge,
        device_identifier: &[u8],
    ) -> Result<PendingRequest, SendError> {
        if self.pending.is_some() {
            return Err(SendError::RequestOutstanding);
        }

        let path = build_path(
            &self.config.base_path,
            device_identifier,
            self.config.path_capacity,
        )?;

        if !bridge.is_ready() {
            return Err(SendError::TransportUnavailable);
        }

        bridge
            .send(OutboundRequest {
                path,
                correlation_id: self.config.correlation_id,
                app_id: self.config.app_id,
            })
            .map_err(|e| {
                warn!(error = %e, "network bridge refused the settings request");
                SendError::TransportUnavailable
            })?;

        let pending = PendingRequest {
            id: self.config.correlation_id,
            sent_at: Instant::now(),
        };
        info!(id = pending.id, "settings request sent");
        self.pending = Some(pending);

        Ok(pending)
    }

    /// Correlate a response with the outstanding request. A match consumes the request, so
    /// duplicates that arrive later are dropped as well.
    pub fn on_response(
        &mut self,
        correlation_id: i32,
        status: u16,
        payload: &Dictionary,
    ) -> ResponseOutcome {
        let pending = match self.pending {
            Some(pending) if pending.id == correlation_id => pending,
            _ => {
                debug!(correlation_id, "dropping response with no matching request");
                return ResponseOutcome::Unmatched;
            }
        };
        self.pending = None;

        info!(
            id = pending.id,
            status,
            elapsed_ms = pending.sent_at.elapsed().as_millis() as u64,
            "settings response received"
        );

        let settings = payload
            .find(SETTINGS_KEY)
            .and_then(|tuple| tuple.cstring())
            .filter(|bytes| !bytes.is_empty())
            .map(RawSettingsPayload::new);

        if settings.is_none() {
            debug!(keys = payload.len(), "response carries no settings string");
        }

        ResponseOutcome::Matched(settings)
    }
}
