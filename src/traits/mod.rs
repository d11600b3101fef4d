mod renderer;
mod store;

pub use renderer::{FrameOptions, RenderSurface, RenderedFeature};
pub use store::BundleStore;
