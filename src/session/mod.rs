pub(crate) mod cancel;
pub(crate) mod progress;
pub(crate) mod reel;
