/// Drawing collaborator for the watch face. Every call is a one-way push of layer state; nothing
/// is ever read back.
pub trait RenderAdapter {
    fn set_date_text(&mut self, text: &str);

    fn set_time_text(&mut self, text: &str);

    fn set_inverted_overlay(&mut self, inverted: bool);

    /// Called once the handler has pushed everything for this event. Adapters that repaint lazily
    /// do so here.
    fn flush(&mut self) {}
}
