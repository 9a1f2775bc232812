pub(crate) mod frame_loop;
pub(crate) mod mesh;
pub(crate) mod raster;
pub(crate) mod renderer;
pub(crate) mod rotation;
pub(crate) mod texture;
