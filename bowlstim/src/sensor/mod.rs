pub(crate) mod link;
pub(crate) mod motion;
pub(crate) mod record;
