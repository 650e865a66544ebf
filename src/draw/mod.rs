pub mod clip;
pub mod clip_window;
pub mod error;
pub mod handles;
pub mod input;
pub mod model;
pub mod raster;
pub mod render;
pub mod replay;
pub mod scene;
pub mod session;
pub mod settings;
pub mod settings_store;
pub mod state;
pub mod transform;

pub use error::EditError;
pub use session::CanvasSession;
