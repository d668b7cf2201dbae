use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::app::WatchFace;
use crate::bridge::NetworkBridge;
use crate::clock::ClockSnapshot;
use crate::dictionary::Dictionary;
use crate::render::RenderAdapter;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Init,
    MinuteTick(ClockSnapshot),
    NetworkResponse {
        correlation_id: i32,
        status: u16,
        payload: Dictionary,
    },
    Shutdown,
}

/// Owns the watch face and feeds it events one at a time, each handled to completion before the
/// next is taken off the queue.
pub struct Dispatcher<R, B, C> {
    face: WatchFace<R, B>,
    events: UnboundedReceiver<Event>,
    device_identifier: Vec<u8>,
    clock: C,
}

impl<R, B, C> Dispatcher<R, B, C>
where
    R: RenderAdapter,
    B: NetworkBridge,
    C: FnMut() -> ClockSnapshot,
{
    pub fn new(
        face: WatchFace<R, B>,
        events: UnboundedReceiver<Event>,
        device_identifier: Vec<u8>,
        clock: C,
    ) -> Self {
        Self {
            face,
            events,
            device_identifier,
            clock,
        }
    }

    /// Run until a `Shutdown` event arrives or every sender is gone, then hand the face back.
    pub async fn run(mut self) -> WatchFace<R, B> {
        while let Some(event) = self.events.recv().await {
            if !self.handle(event) {
                break;
            }
        }

        info!("dispatcher stopped");
        self.face
    }

    fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Init => {
                let snapshot = (self.clock)();
                // Send failures are logged by the face and leave it on defaults.
                let _ = self.face.on_init(&self.device_identifier, snapshot);
            }
            Event::MinuteTick(snapshot) => self.face.on_minute_tick(snapshot),
            Event::NetworkResponse {
                correlation_id,
                status,
                payload,
            } => self.face.on_network_response(correlation_id, status, &payload),
            Event::Shutdown => return false,
        }
        true
    }
}

/// Time left until the next minute boundary.
pub fn until_next_minute(now: time::OffsetDateTime) -> Duration {
    let into_minute =
        Duration::from_secs(now.second() as u64) + Duration::from_nanos(now.nanosecond() as u64);
    Duration::from_secs(60)
        .checked_sub(into_minute)
        .unwrap_or_default()
}

/// Emit a `MinuteTick` at the top of every minute until the dispatcher goes away.
pub async fn minute_ticker(events: UnboundedSender<Event>, is_24h: bool) {
    loop {
        let now = time::OffsetDateTime::try_now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
        tokio::time::delay_for(until_next_minute(now)).await;

        if events
            .send(Event::MinuteTick(ClockSnapshot::now(is_24h)))
            .is_err()
        {
            debug!("dispatcher gone, stopping minute ticker");
            break;
        }
    }
}
