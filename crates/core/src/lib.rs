pub mod clef;
pub mod config;
pub mod error;
mod format;
pub mod ids;
pub mod included;
pub mod model;
pub mod render;
pub mod template;
pub mod time;

pub use error::{BridgeError, Result};
pub use included::IncludedData;
pub use render::Culture;
pub use template::MessageTemplate;
