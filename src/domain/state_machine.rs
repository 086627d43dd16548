use crate::domain::{DkgStatus, RefreshStatus, SigningStatus};
use crate::foundation::{CeremonyError, Result};
use log::warn;

const VALID_DKG_TRANSITIONS: &[(DkgStatus, DkgStatus)] = &[
    (DkgStatus::Pending, DkgStatus::Completed),
    (DkgStatus::Pending, DkgStatus::Failed),
    (DkgStatus::Pending, DkgStatus::TimedOut),
];

const VALID_SIGNING_TRANSITIONS: &[(SigningStatus, SigningStatus)] = &[
    (SigningStatus::Pending, SigningStatus::Signed),
    (SigningStatus::Pending, SigningStatus::Failed),
];

const VALID_REFRESH_TRANSITIONS: &[(RefreshStatus, RefreshStatus)] = &[
    (RefreshStatus::Pending, RefreshStatus::Completed),
    (RefreshStatus::Pending, RefreshStatus::TimedOut),
];

pub fn is_terminal_dkg(status: DkgStatus) -> bool {
    matches!(status, DkgStatus::Completed | DkgStatus::Failed | DkgStatus::TimedOut)
}

pub fn is_terminal_signing(status: SigningStatus) -> bool {
    matches!(status, SigningStatus::Signed | SigningStatus::Failed)
}

pub fn is_terminal_refresh(status: RefreshStatus) -> bool {
    matches!(status, RefreshStatus::Completed | RefreshStatus::TimedOut)
}

pub fn ensure_dkg_transition(from: DkgStatus, to: DkgStatus) -> Result<()> {
    if from == to || VALID_DKG_TRANSITIONS.contains(&(from, to)) {
        return Ok(());
    }
    warn!("invalid dkg status transition from={} to={}", from.as_str(), to.as_str());
    Err(CeremonyError::InvalidStatusTransition { entity: "dkg", from: from.as_str().to_string(), to: to.as_str().to_string() })
}

pub fn ensure_signing_transition(from: SigningStatus, to: SigningStatus) -> Result<()> {
    if from == to || VALID_SIGNING_TRANSITIONS.contains(&(from, to)) {
        return Ok(());
    }
    warn!("invalid signing status transition from={} to={}", from.as_str(), to.as_str());
    Err(CeremonyError::InvalidStatusTransition { entity: "signing", from: from.as_str().to_string(), to: to.as_str().to_string() })
}

pub fn ensure_refresh_transition(from: RefreshStatus, to: RefreshStatus) -> Result<()> {
    if from == to || VALID_REFRESH_TRANSITIONS.contains(&(from, to)) {
        return Ok(());
    }
    warn!("invalid refreshing status transition from={} to={}", from.as_str(), to.as_str());
    Err(CeremonyError::InvalidStatusTransition { entity: "refreshing", from: from.as_str().to_string(), to: to.as_str().to_string() })
}
