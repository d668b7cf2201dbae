use tracing::{debug, warn};

use crate::bridge::NetworkBridge;
use crate::clock::{compose_date_text, compose_time_text, ClockSnapshot};
use crate::dictionary::Dictionary;
use crate::fetch::{FetchConfig, ResponseOutcome, SendError, SettingsFetch};
use crate::render::RenderAdapter;
use crate::settings::DisplaySettings;

/// All of the watch face's state. Owned by whoever dispatches events and handed to one handler
/// at a time.
pub struct WatchFace<R, B> {
    settings: DisplaySettings,
    snapshot: ClockSnapshot,
    fetch: SettingsFetch,
    renderer: R,
    bridge: B,
}

impl<R: RenderAdapter, B: NetworkBridge> WatchFace<R, B> {
    pub fn new(
        renderer: R,
        bridge: B,
        fetch_config: FetchConfig,
        snapshot: ClockSnapshot,
    ) -> Self {
        Self {
            settings: DisplaySettings::default(),
            snapshot,
            fetch: SettingsFetch::new(fetch_config),
            renderer,
            bridge,
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn snapshot(&self) -> &ClockSnapshot {
        &self.snapshot
    }

    pub fn fetch(&self) -> &SettingsFetch {
        &self.fetch
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Ask for remote settings, then draw the first frame with whatever settings are current.
    /// A failed request is not retried; the face keeps its defaults.
    pub fn on_init(
        &mut self,
        device_identifier: &[u8],
        snapshot: ClockSnapshot,
    ) -> Result<(), SendError> {
        let sent = self
            .fetch
            .send_settings_request(&mut self.bridge, device_identifier)
            .map(|_| ());
        if let Err(e) = &sent {
            warn!(error = %e, "settings request not sent, keeping defaults");
        }

        self.snapshot = snapshot;
        self.redraw();

        sent
    }

    pub fn on_minute_tick(&mut self, snapshot: ClockSnapshot) {
        self.snapshot = snapshot;
        self.redraw();
    }

    /// Apply a settings response. Responses that do not answer the outstanding request are
    /// dropped without touching anything; a matching one always ends in a redraw, even if none
    /// of its fields changed.
    pub fn on_network_response(&mut self, correlation_id: i32, status: u16, payload: &Dictionary) {
        match self.fetch.on_response(correlation_id, status, payload) {
            ResponseOutcome::Unmatched => {}
            ResponseOutcome::Matched(raw) => {
                if let Some(raw) = raw {
                    self.settings.apply(&raw);
                }
                self.redraw();
            }
        }
    }

    pub fn redraw(&mut self) {
        let date_text = compose_date_text(&self.snapshot, &self.settings);
        let time_text = compose_time_text(&self.snapshot);
        debug!(%date_text, %time_text, inverted = self.settings.invert_screen, "redraw");

        self.renderer.set_inverted_overlay(self.settings.invert_screen);
        self.renderer.set_date_text(&date_text);
        self.renderer.set_time_text(&time_text);
        self.renderer.flush();
    }
}
