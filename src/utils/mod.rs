pub mod files;
pub mod geometry;
pub mod ids;
pub mod status;
