use crate::error::RaylabResult;

/// A single rendered image: RGBA8 interleaved, row-major, top-to-bottom.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Expected byte length for the frame's dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Scene renderer collaborator.
///
/// `render_image` is synchronous, blocking and CPU-bound; it is expected to be
/// deterministic for a given `(scene, width, height, samples)` tuple. A
/// [`crate::channel::WorkerChannel`] keeps it off the controlling thread; an
/// implementation never has to know whether it runs inline or on a worker.
pub trait RenderEngine: Send + Sync {
    /// Names of the scenes this engine can render, in presentation order.
    ///
    /// Called once per controller; the result is cached as the
    /// [`crate::catalog::SceneCatalog`].
    fn list_scenes(&self) -> Vec<String>;

    /// Render one image.
    ///
    /// Contract: fails with a descriptive error (never silently) when `scene`
    /// is unknown or a dimension is zero. On success the buffer length is
    /// exactly `width * height * 4`.
    fn render_image(
        &self,
        scene: &str,
        width: u32,
        height: u32,
        samples: u32,
    ) -> RaylabResult<FrameRGBA>;
}
