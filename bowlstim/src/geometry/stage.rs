use crate::foundation::core::{Canvas, Rotation};
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::{Channels, Frame};

/// Projection collaborator mapping an equirectangular texture onto the display device.
///
/// All inputs and outputs are RGB frames. Warp semantics belong to the implementation; the
/// [`TransformStage`] only guarantees call order.
pub trait Geometry {
    /// Rotate the texture on the sphere by `rotation` (degrees).
    fn rotate(&self, frame: &Frame, rotation: Rotation) -> StimResult<Frame>;
    /// Restrict the texture to the solid angle visible to the device.
    fn crop_to_fov(&self, frame: &Frame) -> StimResult<Frame>;
    /// Map the cropped texture into display pixel space.
    fn project(&self, frame: &Frame) -> StimResult<Frame>;
    /// Blank display pixels outside the projection surface.
    fn mask(&self, frame: &Frame) -> StimResult<Frame>;
    /// Dimensions of frames leaving [`Geometry::mask`].
    fn output_canvas(&self) -> Canvas;
}

impl<G: Geometry + ?Sized> Geometry for Box<G> {
    fn rotate(&self, frame: &Frame, rotation: Rotation) -> StimResult<Frame> {
        (**self).rotate(frame, rotation)
    }

    fn crop_to_fov(&self, frame: &Frame) -> StimResult<Frame> {
        (**self).crop_to_fov(frame)
    }

    fn project(&self, frame: &Frame) -> StimResult<Frame> {
        (**self).project(frame)
    }

    fn mask(&self, frame: &Frame) -> StimResult<Frame> {
        (**self).mask(frame)
    }

    fn output_canvas(&self) -> Canvas {
        (**self).output_canvas()
    }
}

/// Fixed per-rig transform: mounting rotation offset and optional 180 degree flip.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageOpts {
    /// Constant rotation applied after the per-tick rotation.
    #[serde(default)]
    pub rot_offset: Rotation,
    /// Display is mounted upside down.
    #[serde(default)]
    pub inverted: bool,
}

/// Runs a frame through the geometry collaborator in the fixed order
/// rotate(dynamic) -> rotate(offset) -> crop -> project -> mask -> flip.
pub struct TransformStage {
    geometry: Box<dyn Geometry>,
    opts: StageOpts,
}

impl std::fmt::Debug for TransformStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformStage")
            .field("opts", &self.opts)
            .field("output", &self.geometry.output_canvas())
            .finish_non_exhaustive()
    }
}

impl TransformStage {
    /// Stage over `geometry`.
    pub fn new(geometry: Box<dyn Geometry>, opts: StageOpts) -> Self {
        Self { geometry, opts }
    }

    /// Rig options.
    pub fn opts(&self) -> StageOpts {
        self.opts
    }

    /// Display-space dimensions.
    pub fn output_canvas(&self) -> Canvas {
        self.geometry.output_canvas()
    }

    /// Transform one generated frame. Gray input is expanded to RGB first; zero rotations are
    /// skipped.
    pub fn apply(&self, frame: &Frame, dynamic: Rotation) -> StimResult<Frame> {
        let mut f = frame.to_rgb();
        if !dynamic.is_zero() {
            f = self.geometry.rotate(&f, dynamic)?;
        }
        if !self.opts.rot_offset.is_zero() {
            f = self.geometry.rotate(&f, self.opts.rot_offset)?;
        }
        let f = self.geometry.crop_to_fov(&f)?;
        let f = self.geometry.project(&f)?;
        let f = self.geometry.mask(&f)?;
        if f.channels() != Channels::Rgb {
            return Err(StimError::geometry("geometry must return RGB frames"));
        }
        Ok(if self.opts.inverted {
            f.rotated_180()
        } else {
            f
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/stage.rs"]
mod tests;
