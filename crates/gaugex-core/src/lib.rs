pub mod boost;
pub mod constants;
pub mod error;
pub mod events;
pub mod position;
pub mod types;

pub use boost::resolve_boost;
pub use constants::*;
pub use error::GaugeError;
pub use events::*;
pub use position::*;
pub use types::*;
