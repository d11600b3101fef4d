pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
mod map;
pub mod models;
pub mod registry;
pub mod render;
pub mod service;
pub mod session;
pub mod store;
pub mod traits;
pub mod utils;

pub use client::ShareClient;
pub use config::Config;
pub use endpoints::server::ShareServer;
pub use error::GeoShareError;
pub use registry::{FileEntry, FileId, Registry};
pub use render::HeadlessSurface;
pub use session::{Session, ViewMode};
