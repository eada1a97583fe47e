pub(crate) mod log;
pub(crate) mod scene;
pub(crate) mod sequencer;
pub(crate) mod state;
