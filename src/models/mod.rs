pub mod bundle;
pub mod geometry;
pub mod layer;
