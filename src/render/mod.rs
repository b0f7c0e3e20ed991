pub(crate) mod background;
pub(crate) mod compositor;
pub(crate) mod frame;
pub(crate) mod overlay;
pub(crate) mod pool;
