pub(crate) mod equirect;
pub(crate) mod stage;
