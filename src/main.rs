use std::error::Error;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use simplicity::bridge::HttpBridge;
use simplicity::config::Config;
use simplicity::dispatcher::minute_ticker;
use simplicity::display::framebuffer::Framebuffer;
use simplicity::display::Display;
use simplicity::face::FaceRenderer;
use simplicity::fetch::DEVICE_ID_LEN;
use simplicity::{ClockSnapshot, Dispatcher, Event, WatchFace};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })?;
    let clock_24h = config.clock_24h;
    if !config.fetch.fits(DEVICE_ID_LEN) {
        info!(
            capacity = config.fetch.path_capacity,
            "path buffer is too small for the device identifier, settings will not be fetched; \
             raise SIMPLICITY_PATH_CAPACITY to enable the request"
        );
    }

    let mut display = Framebuffer::new();
    display.on()?;

    let (events, inbox) = mpsc::unbounded_channel();
    let face = WatchFace::new(
        FaceRenderer::new(display),
        HttpBridge::new(events.clone()),
        config.fetch.clone(),
        ClockSnapshot::now(clock_24h),
    );
    let dispatcher = Dispatcher::new(
        face,
        inbox,
        config.device_identifier.to_vec(),
        move || ClockSnapshot::now(clock_24h),
    );

    events.send(Event::Init)?;
    tokio::spawn(minute_ticker(events.clone(), clock_24h));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, shutting down");
            let _ = events.send(Event::Shutdown);
        }
    });

    let mut face = dispatcher.run().await;
    face.renderer_mut().display_mut().sleep()?;

    Ok(())
}
