pub(crate) mod background;
pub(crate) mod badge;
pub(crate) mod compositor;
pub(crate) mod coords;
pub(crate) mod noise;
pub(crate) mod pixels;
pub(crate) mod schedule;
pub(crate) mod screenshot;
pub(crate) mod shadow;
pub(crate) mod text;
