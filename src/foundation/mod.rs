pub mod constants;
pub mod error;
pub mod types;
pub mod util;

pub use constants::*;
pub use error::{CeremonyError, ErrorCode, Result};
pub use types::{ConsensusPubKey, Hash32};
