use simplicity::bridge::{BridgeError, NetworkBridge};
use simplicity::dictionary::{Dictionary, Tuple};
use simplicity::fetch::{
    FetchConfig, OutboundRequest, SendError, DEVICE_ID_LEN, SETTINGS_BASE_PATH, SETTINGS_COOKIE,
    SETTINGS_KEY,
};
use simplicity::locale::Language;
use simplicity::settings::DateOrder;
use simplicity::{ClockSnapshot, Dispatcher, DisplaySettings, Event, RenderAdapter, WatchFace};

const DEVICE_ID: &[u8; DEVICE_ID_LEN] = b"00176A1B\x00\xFF\x80C";

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Date(String),
    Time(String),
    Inverted(bool),
    Flush,
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
}

impl RecordingRenderer {
    fn redraws(&self) -> usize {
        self.calls.iter().filter(|call| **call == Call::Flush).count()
    }

    fn last(&self, pick: fn(&Call) -> bool) -> Option<&Call> {
        self.calls.iter().rev().find(|call| pick(call))
    }

    fn date(&self) -> Option<&Call> {
        self.last(|call| matches!(call, Call::Date(_)))
    }

    fn time(&self) -> Option<&Call> {
        self.last(|call| matches!(call, Call::Time(_)))
    }

    fn inverted(&self) -> Option<&Call> {
        self.last(|call| matches!(call, Call::Inverted(_)))
    }
}

impl RenderAdapter for RecordingRenderer {
    fn set_date_text(&mut self, text: &str) {
        self.calls.push(Call::Date(text.to_string()));
    }

    fn set_time_text(&mut self, text: &str) {
        self.calls.push(Call::Time(text.to_string()));
    }

    fn set_inverted_overlay(&mut self, inverted: bool) {
        self.calls.push(Call::Inverted(inverted));
    }

    fn flush(&mut self) {
        self.calls.push(Call::Flush);
    }
}

#[derive(Default)]
struct FakeBridge {
    offline: bool,
    sent: Vec<OutboundRequest>,
}

impl NetworkBridge for FakeBridge {
    fn is_ready(&self) -> bool {
        !self.offline
    }

    fn send(&mut self, request: OutboundRequest) -> Result<(), BridgeError> {
        self.sent.push(request);
        Ok(())
    }
}

fn morning() -> ClockSnapshot {
    ClockSnapshot {
        hour: 9,
        minute: 5,
        day: 3,
        month: 0,
        is_24h: false,
    }
}

fn roomy() -> FetchConfig {
    FetchConfig {
        path_capacity: 64,
        ..FetchConfig::default()
    }
}

fn started_face() -> WatchFace<RecordingRenderer, FakeBridge> {
    let mut face = WatchFace::new(
        RecordingRenderer::default(),
        FakeBridge::default(),
        roomy(),
        morning(),
    );
    face.on_init(DEVICE_ID, morning()).unwrap();
    face
}

fn settings_response(text: &str) -> Dictionary {
    Dictionary::new().with(SETTINGS_KEY, Tuple::Text(text.to_string()))
}

#[test]
fn init_sends_request_and_draws_defaults() {
    let face = started_face();

    let mut path = SETTINGS_BASE_PATH.as_bytes().to_vec();
    path.extend_from_slice(DEVICE_ID);
    assert_eq!(1, face.bridge().sent.len());
    assert_eq!(path, face.bridge().sent[0].path);
    assert_eq!(SETTINGS_COOKIE, face.bridge().sent[0].correlation_id);
    assert!(face.fetch().pending().is_some());

    assert_eq!(
        vec![
            Call::Inverted(false),
            Call::Date("January 3".to_string()),
            Call::Time("9:05".to_string()),
            Call::Flush,
        ],
        face.renderer().calls
    );
}

#[test]
fn stock_buffer_overflows_with_full_identifier() {
    let mut face = WatchFace::new(
        RecordingRenderer::default(),
        FakeBridge::default(),
        FetchConfig::default(),
        morning(),
    );

    assert!(matches!(
        face.on_init(DEVICE_ID, morning()),
        Err(SendError::EncodingOverflow { .. })
    ));
    assert!(face.bridge().sent.is_empty());
    assert!(face.fetch().pending().is_none());
    // The face still comes up, on defaults.
    assert_eq!(1, face.renderer().redraws());
    assert_eq!(&DisplaySettings::default(), face.settings());
}

#[test]
fn unavailable_transport_keeps_defaults() {
    let mut face = WatchFace::new(
        RecordingRenderer::default(),
        FakeBridge {
            offline: true,
            ..FakeBridge::default()
        },
        roomy(),
        morning(),
    );

    assert_eq!(
        Err(SendError::TransportUnavailable),
        face.on_init(DEVICE_ID, morning())
    );
    assert!(face.fetch().pending().is_none());

    // A response can never match when nothing was sent.
    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("141"));
    assert_eq!(&DisplaySettings::default(), face.settings());
    assert_eq!(1, face.renderer().redraws());
}

#[test]
fn foreign_response_is_ignored() {
    let mut face = started_face();

    face.on_network_response(SETTINGS_COOKIE + 1, 200, &settings_response("141"));

    assert_eq!(&DisplaySettings::default(), face.settings());
    assert_eq!(1, face.renderer().redraws());
    assert!(face.fetch().pending().is_some());
}

#[test]
fn invert_only_response() {
    let mut face = started_face();

    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("1"));

    assert!(face.settings().invert_screen);
    assert_eq!(Language::English, face.settings().language);
    assert_eq!(DateOrder::MonthThenDay, face.settings().date_order);
    assert_eq!(2, face.renderer().redraws());
    assert_eq!(Some(&Call::Inverted(true)), face.renderer().inverted());
}

#[test]
fn matched_response_always_redraws() {
    let mut face = started_face();

    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("0  "));

    assert_eq!(&DisplaySettings::default(), face.settings());
    assert_eq!(2, face.renderer().redraws());
    assert!(face.fetch().pending().is_none());

    let mut face = started_face();
    face.on_network_response(SETTINGS_COOKIE, 200, &Dictionary::new());
    assert_eq!(2, face.renderer().redraws());
}

#[test]
fn blank_settings_string_redraws_unchanged() {
    let mut face = started_face();

    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("  "));

    assert_eq!(&DisplaySettings::default(), face.settings());
    assert_eq!(2, face.renderer().redraws());
    assert!(face.fetch().pending().is_none());
    assert_eq!(
        Some(&Call::Date("January 3".to_string())),
        face.renderer().date()
    );
}

#[test]
fn full_response_switches_language_and_order() {
    let mut face = started_face();

    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("041"));

    assert_eq!(
        &DisplaySettings {
            invert_screen: false,
            language: Language::Catalan,
            date_order: DateOrder::DayThenMonth,
        },
        face.settings()
    );
    assert_eq!(
        Some(&Call::Date("3 de gener".to_string())),
        face.renderer().date()
    );

    face.on_minute_tick(ClockSnapshot {
        month: 3,
        minute: 6,
        ..morning()
    });
    assert_eq!(
        Some(&Call::Date("3 d'abril".to_string())),
        face.renderer().date()
    );
    assert_eq!(Some(&Call::Time("9:06".to_string())), face.renderer().time());
}

#[test]
fn duplicate_response_is_dropped() {
    let mut face = started_face();

    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("011"));
    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("190"));

    assert_eq!(Language::French, face.settings().language);
    assert_eq!(DateOrder::DayThenMonth, face.settings().date_order);
    assert!(!face.settings().invert_screen);
    assert_eq!(2, face.renderer().redraws());
}

#[test]
fn minute_tick_redraws_with_current_settings() {
    let mut face = started_face();
    face.on_network_response(SETTINGS_COOKIE, 200, &settings_response("121"));

    let late = ClockSnapshot {
        hour: 23,
        minute: 59,
        is_24h: true,
        ..morning()
    };
    face.on_minute_tick(late);

    assert_eq!(&late, face.snapshot());

    assert_eq!(Some(&Call::Time("23:59".to_string())), face.renderer().time());
    assert_eq!(
        Some(&Call::Date("3 Januar".to_string())),
        face.renderer().date()
    );
    assert_eq!(Some(&Call::Inverted(true)), face.renderer().inverted());
    assert_eq!(3, face.renderer().redraws());
}

#[tokio::test]
async fn dispatcher_handles_events_in_order() {
    let (events, inbox) = tokio::sync::mpsc::unbounded_channel();
    let face = WatchFace::new(
        RecordingRenderer::default(),
        FakeBridge::default(),
        roomy(),
        morning(),
    );
    let dispatcher = Dispatcher::new(face, inbox, DEVICE_ID.to_vec(), morning);

    events.send(Event::Init).unwrap();
    events
        .send(Event::NetworkResponse {
            correlation_id: 7,
            status: 200,
            payload: settings_response("111"),
        })
        .unwrap();
    events
        .send(Event::NetworkResponse {
            correlation_id: SETTINGS_COOKIE,
            status: 200,
            payload: settings_response("131"),
        })
        .unwrap();
    events
        .send(Event::MinuteTick(ClockSnapshot {
            minute: 6,
            ..morning()
        }))
        .unwrap();
    events.send(Event::Shutdown).unwrap();
    events.send(Event::MinuteTick(morning())).unwrap();

    let face = dispatcher.run().await;

    assert_eq!(1, face.bridge().sent.len());
    assert_eq!(Language::Spanish, face.settings().language);
    assert!(face.settings().invert_screen);
    assert_eq!(3, face.renderer().redraws());
    assert_eq!(
        Some(&Call::Date("3 enero".to_string())),
        face.renderer().date()
    );
    assert_eq!(Some(&Call::Time("9:06".to_string())), face.renderer().time());
}
