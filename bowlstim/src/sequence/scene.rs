use crate::foundation::error::StimResult;
use crate::foundation::frame::Frame;

/// Combines a foreground and background texture for a given horizontal shift in pixels.
pub type Composer = fn(&Frame, &Frame, f64) -> StimResult<Frame>;

/// Default composer: shift the foreground horizontally with wrap-around (truncating the shift to
/// whole pixels) and fill its transparent pixels from the background.
pub fn compose_shifted(foreground: &Frame, background: &Frame, shift: f64) -> StimResult<Frame> {
    foreground
        .shift_columns(shift.trunc() as i64)
        .composite_over(background)
}

/// One scene of a sequencing run.
#[derive(Clone, Debug)]
pub struct SceneSpec {
    /// Human-readable name used in diagnostics.
    pub label: String,
    /// Moving texture; [`TRANSPARENT`](crate::TRANSPARENT) pixels show the background.
    pub foreground: Frame,
    /// Static texture behind the foreground.
    pub background: Frame,
    /// How foreground and background are combined each active tick.
    pub composer: Composer,
}

impl SceneSpec {
    /// Scene using [`compose_shifted`].
    pub fn new(label: impl Into<String>, foreground: Frame, background: Frame) -> Self {
        Self {
            label: label.into(),
            foreground,
            background,
            composer: compose_shifted,
        }
    }

    /// Replace the composer.
    pub fn with_composer(mut self, composer: Composer) -> Self {
        self.composer = composer;
        self
    }
}
