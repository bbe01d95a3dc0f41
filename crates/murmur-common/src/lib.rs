pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, ConnectionError, MurmurError};
pub use id::{ConnectionId, IdAllocator};
pub use types::{ColorTag, DisplayName, Message};

pub type Result<T> = std::result::Result<T, MurmurError>;
