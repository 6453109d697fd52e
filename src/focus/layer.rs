//! Ordered overlay stack with ESC-to-close routing (spec §3 "Layer stack",
//! §4.8 "Layer stack").

pub struct Layer {
    pub id: String,
    pub close_on_escape: bool,
    pub on_close: Option<Box<dyn FnMut() -> Result<(), String>>>,
}

impl Layer {
    #[must_use]
    pub fn new(id: impl Into<String>, close_on_escape: bool) -> Self {
        Self { id: id.into(), close_on_escape, on_close: None }
    }

    #[must_use]
    pub fn with_on_close(mut self, f: impl FnMut() -> Result<(), String> + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

/// Ordered push/pop of layer ids, top = innermost (spec §4.8).
#[derive(Default)]
pub struct LayerStack {
    stack: Vec<Layer>,
}

impl LayerStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: Layer) {
        self.stack.push(layer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn top_id(&self) -> Option<&str> {
        self.stack.last().map(|l| l.id.as_str())
    }

    /// Handle an ESC keystroke. Closes the topmost closable layer that owns
    /// a close callback; layers without `close_on_escape` or without a
    /// callback are skipped (left on the stack, not merely un-closable).
    /// Close-callback errors are swallowed but the layer is removed
    /// regardless (spec §4.8). Returns whether ESC was consumed.
    pub fn handle_escape(&mut self) -> bool {
        let Some(pos) = self.stack.iter().rposition(|l| l.close_on_escape && l.on_close.is_some()) else { return false };
        let mut layer = self.stack.remove(pos);
        if let Some(mut cb) = layer.on_close.take() {
            let _ = cb();
        }
        true
    }
}
