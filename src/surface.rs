use crate::engine::FrameRGBA;
use crate::protocol::RenderParameters;

/// Front-end facade the controller drives.
///
/// Pure accessor seam: reads the current parameter values and toggles the
/// busy/disabled presentation. Implementations hold no orchestration state of
/// their own; validation and sequencing live in the controller.
pub trait RenderSurface {
    /// Current parameter values as entered by the user.
    fn read_parameters(&self) -> RenderParameters;
    /// Enter or leave the visually busy mode (controls disabled while busy).
    fn set_busy(&mut self, busy: bool);
    /// Display a completed frame.
    fn paint(&mut self, frame: &FrameRGBA);
    /// Fill the scene selector from the catalog.
    fn populate_scenes(&mut self, scenes: &[String]);
    /// Surface an error inline, without leaving the current view.
    fn show_error(&mut self, message: &str);
}

/// Recording surface for tests, debugging and headless front ends.
#[derive(Debug)]
pub struct InMemorySurface {
    params: RenderParameters,
    busy: bool,
    busy_transitions: Vec<bool>,
    painted: Vec<FrameRGBA>,
    scenes: Vec<String>,
    errors: Vec<String>,
}

impl InMemorySurface {
    /// Create a surface whose controls currently show `params`.
    pub fn new(params: RenderParameters) -> Self {
        Self {
            params,
            busy: false,
            busy_transitions: Vec::new(),
            painted: Vec::new(),
            scenes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Replace the parameter values, as if the user edited the controls.
    pub fn set_parameters(&mut self, params: RenderParameters) {
        self.params = params;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Every `set_busy` call, in order.
    pub fn busy_transitions(&self) -> &[bool] {
        &self.busy_transitions
    }

    /// Frames painted so far, in paint order.
    pub fn painted(&self) -> &[FrameRGBA] {
        &self.painted
    }

    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.painted.last()
    }

    /// Scene names last pushed via `populate_scenes`.
    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }

    /// Errors surfaced so far, in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl RenderSurface for InMemorySurface {
    fn read_parameters(&self) -> RenderParameters {
        self.params.clone()
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.busy_transitions.push(busy);
    }

    fn paint(&mut self, frame: &FrameRGBA) {
        self.painted.push(frame.clone());
    }

    fn populate_scenes(&mut self, scenes: &[String]) {
        self.scenes = scenes.to_vec();
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
