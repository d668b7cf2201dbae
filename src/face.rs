use piet::kurbo::{Line, Rect};
use piet::{Color, FontFamily, RenderContext, Text, TextLayoutBuilder};
use piet_cairo::CairoRenderContext;
use tracing::{trace, warn};

use crate::display::Display;
use crate::render::RenderAdapter;

const SCREEN_WIDTH: f64 = 144.;
const SCREEN_HEIGHT: f64 = 168.;

const DATE_ORIGIN: (f64, f64) = (8., 68.);
const DATE_FONT_SIZE: f64 = 21.;
const TIME_ORIGIN: (f64, f64) = (7., 92.);
const TIME_FONT_SIZE: f64 = 49.;

// Two one-pixel rules separating date and time.
const RULE_ROWS: [f64; 2] = [97.5, 98.5];
const RULE_X: (f64, f64) = (8., 131.);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Layers {
    date_text: String,
    time_text: String,
    inverted: bool,
}

/// Paints the watch face onto a [`Display`]. Layer updates are collected and the screen is
/// repainted once per flush, and only when something changed.
pub struct FaceRenderer<D> {
    display: D,
    layers: Layers,
    dirty: bool,
}

impl<D: Display> FaceRenderer<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            layers: Layers::default(),
            dirty: true,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn update<T: PartialEq>(dirty: &mut bool, field: &mut T, value: T) {
        if *field != value {
            *field = value;
            *dirty = true;
        }
    }

    fn repaint(&mut self) -> Result<(), D::Err> {
        let layers = &self.layers;
        self.display.draw_context(|ctx| paint(ctx, layers))
    }
}

impl<D: Display> RenderAdapter for FaceRenderer<D> {
    fn set_date_text(&mut self, text: &str) {
        Self::update(&mut self.dirty, &mut self.layers.date_text, text.to_string());
    }

    fn set_time_text(&mut self, text: &str) {
        Self::update(&mut self.dirty, &mut self.layers.time_text, text.to_string());
    }

    fn set_inverted_overlay(&mut self, inverted: bool) {
        Self::update(&mut self.dirty, &mut self.layers.inverted, inverted);
    }

    fn flush(&mut self) {
        if !self.dirty {
            trace!("face unchanged, skipping repaint");
            return;
        }

        match self.repaint() {
            Ok(()) => self.dirty = false,
            Err(e) => warn!(error = ?e, "unable to repaint the watch face"),
        }
    }
}

fn paint(ctx: &mut CairoRenderContext, layers: &Layers) -> Result<(), piet::Error> {
    // The overlay inverts every pixel; on a two-colour face that is a palette swap.
    let (background, foreground) = if layers.inverted {
        (Color::WHITE, Color::BLACK)
    } else {
        (Color::BLACK, Color::WHITE)
    };

    ctx.fill(Rect::new(0., 0., SCREEN_WIDTH, SCREEN_HEIGHT), &background);

    let date = ctx
        .text()
        .new_text_layout(layers.date_text.clone())
        .font(FontFamily::SANS_SERIF, DATE_FONT_SIZE)
        .text_color(foreground.clone())
        .build()?;
    ctx.draw_text(&date, DATE_ORIGIN);

    let time = ctx
        .text()
        .new_text_layout(layers.time_text.clone())
        .font(FontFamily::SANS_SERIF, TIME_FONT_SIZE)
        .default_attribute(piet::FontWeight::BOLD)
        .text_color(foreground.clone())
        .build()?;
    ctx.draw_text(&time, TIME_ORIGIN);

    for &y in RULE_ROWS.iter() {
        ctx.stroke(Line::new((RULE_X.0, y), (RULE_X.1, y)), &foreground, 1.);
    }

    Ok(())
}
