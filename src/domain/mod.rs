pub mod hashes;
pub mod model;
pub mod policy;
pub mod quorum;
pub mod state_machine;
pub mod timeout;
pub mod verify;

pub use model::{
    DkgCompletion, DkgRequest, DkgStatus, RefreshStatus, RefreshingCompletion, RefreshingRequest, SignatureScheme, SigningRequest,
    SigningStatus,
};
pub use policy::CeremonyParams;
