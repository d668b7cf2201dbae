//! Simplicity watch face: a date and time display whose language, date order and inversion are
//! fetched once, at start-up, from a remote settings service.

pub mod app;
pub mod bridge;
pub mod clock;
pub mod config;
pub mod dictionary;
pub mod dispatcher;
pub mod display;
pub mod face;
pub mod fetch;
pub mod locale;
pub mod render;
pub mod settings;

pub use app::WatchFace;
pub use clock::ClockSnapshot;
pub use dispatcher::{Dispatcher, Event};
pub use render::RenderAdapter;
pub use settings::DisplaySettings;
