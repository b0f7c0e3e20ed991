pub(crate) mod mux;
pub(crate) mod pcm;
pub(crate) mod track;
