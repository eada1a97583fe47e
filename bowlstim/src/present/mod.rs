pub(crate) mod presenter;
pub(crate) mod program;
pub(crate) mod sink;
