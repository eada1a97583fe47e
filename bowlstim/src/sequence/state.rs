/// Position of a sequencing run in its loop/scene/side hierarchy.
///
/// Indices are zero-based. `side_index` stays below the configured sides per scene and
/// `scene_index` never exceeds the scene count between ticks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SequencerState {
    /// Current loop (iteration) number.
    pub loop_index: u32,
    /// Scene being shown, or the scene count right after a sequential loop completes.
    pub scene_index: usize,
    /// Side within the current scene.
    pub side_index: u32,
    /// Scenes finished in the current loop.
    pub scenes_completed: usize,
    /// Absolute start of the current loop.
    pub loop_start: f64,
    /// Absolute start of the current scene (including its break).
    pub scene_start: f64,
    /// Absolute start of the current side.
    pub side_start: f64,
    /// A loop starts on the next tick.
    pub new_loop: bool,
    /// A scene starts on the next tick.
    pub new_scene: bool,
    /// A side starts on the next tick.
    pub new_side: bool,
    /// The last tick fell inside the inter-scene break.
    pub in_break: bool,
}

impl SequencerState {
    /// State before the first tick.
    pub fn initial() -> Self {
        Self {
            loop_index: 0,
            scene_index: 0,
            side_index: 0,
            scenes_completed: 0,
            loop_start: 0.0,
            scene_start: 0.0,
            side_start: 0.0,
            new_loop: true,
            new_scene: true,
            new_side: true,
            in_break: true,
        }
    }

    /// `true` when a side is being shown (no pending transition, not in a break).
    pub fn side_active(&self) -> bool {
        !(self.in_break || self.new_loop || self.new_scene || self.new_side)
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::initial()
    }
}
