pub(crate) mod api;
pub(crate) mod clip;
pub(crate) mod edge;
pub(crate) mod looming;
pub(crate) mod noise;
pub(crate) mod still;
pub(crate) mod texture;
