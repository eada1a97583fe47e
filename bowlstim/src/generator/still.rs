use crate::foundation::core::Canvas;
use crate::foundation::error::StimResult;
use crate::foundation::frame::Frame;
use crate::generator::api::Generator;
use crate::generator::texture::TextureSpec;

/// Presents one precomputed texture unchanged.
#[derive(Clone, Debug)]
pub struct StillGenerator {
    frame: Frame,
}

impl StillGenerator {
    /// Wrap an existing frame.
    pub fn new(frame: Frame) -> Self {
        Self { frame }
    }

    /// Render `spec` once on `canvas`.
    pub fn from_texture(spec: &TextureSpec, canvas: Canvas) -> StimResult<Self> {
        Ok(Self::new(spec.render(canvas)?))
    }

    /// The texture being shown.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl Generator for StillGenerator {
    type Params = ();

    fn produce(&mut self, _params: &()) -> StimResult<Frame> {
        Ok(self.frame.clone())
    }
}
