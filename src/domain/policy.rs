use crate::domain::quorum::remaining_participants;
use crate::domain::{DkgRequest, DkgStatus};
use crate::foundation::{
    CeremonyError, ConsensusPubKey, Result, DEFAULT_CEREMONY_TIMEOUT_NANOS, DEFAULT_MIN_PARTICIPANTS, DEFAULT_MIN_THRESHOLD,
    DEFAULT_THRESHOLD_RATIO_DEN, DEFAULT_THRESHOLD_RATIO_NUM,
};
use serde::{Deserialize, Serialize};

/// Module-wide ceremony policy, persisted as a single record and mutated only
/// through the administrative entry point.
///
/// The threshold ratio floor is kept as an integer fraction; consensus code
/// must not compare floats.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CeremonyParams {
    pub min_participants: u32,
    pub min_threshold: u32,
    pub threshold_ratio_num: u32,
    pub threshold_ratio_den: u32,
    pub default_dkg_timeout_nanos: u64,
    pub default_refresh_timeout_nanos: u64,
}

impl Default for CeremonyParams {
    fn default() -> Self {
        Self {
            min_participants: DEFAULT_MIN_PARTICIPANTS,
            min_threshold: DEFAULT_MIN_THRESHOLD,
            threshold_ratio_num: DEFAULT_THRESHOLD_RATIO_NUM,
            threshold_ratio_den: DEFAULT_THRESHOLD_RATIO_DEN,
            default_dkg_timeout_nanos: DEFAULT_CEREMONY_TIMEOUT_NANOS,
            default_refresh_timeout_nanos: DEFAULT_CEREMONY_TIMEOUT_NANOS,
        }
    }
}

impl CeremonyParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_participants == 0 {
            return Err(CeremonyError::InvalidParams { details: "min_participants must be positive".to_string() });
        }
        if self.min_threshold == 0 {
            return Err(CeremonyError::InvalidParams { details: "min_threshold must be positive".to_string() });
        }
        if self.threshold_ratio_den == 0 {
            return Err(CeremonyError::InvalidParams { details: "threshold ratio denominator must be positive".to_string() });
        }
        if self.threshold_ratio_num > self.threshold_ratio_den {
            return Err(CeremonyError::InvalidParams {
                details: format!("threshold ratio {}/{} exceeds 1", self.threshold_ratio_num, self.threshold_ratio_den),
            });
        }
        if self.default_dkg_timeout_nanos == 0 || self.default_refresh_timeout_nanos == 0 {
            return Err(CeremonyError::InvalidParams { details: "default timeouts must be positive".to_string() });
        }
        Ok(())
    }

    /// Participant-count floor for a new DKG ceremony. Initiation itself does
    /// not validate; callers run this before initiating.
    pub fn check_participant_count(&self, count: usize) -> Result<()> {
        if count < self.min_participants as usize {
            return Err(CeremonyError::TooFewParticipants { count, min: self.min_participants });
        }
        Ok(())
    }

    /// Threshold floor, ceiling, and ratio check for a new DKG ceremony.
    pub fn check_threshold(&self, threshold: u32, participant_count: usize) -> Result<()> {
        if threshold < self.min_threshold {
            return Err(CeremonyError::ThresholdTooLow { threshold, min: self.min_threshold });
        }
        if threshold as usize > participant_count {
            return Err(CeremonyError::ThresholdExceedsParticipants { threshold, participants: participant_count });
        }
        // threshold / participants >= num / den, in integer arithmetic.
        let lhs = u64::from(threshold) * u64::from(self.threshold_ratio_den);
        let rhs = participant_count as u64 * u64::from(self.threshold_ratio_num);
        if lhs < rhs {
            return Err(CeremonyError::ThresholdRatioNotMet {
                threshold,
                participants: participant_count,
                num: self.threshold_ratio_num,
                den: self.threshold_ratio_den,
            });
        }
        Ok(())
    }

    /// Full admission check for a resharing request, run before any state is
    /// written.
    pub fn check_refresh(&self, dkg: &DkgRequest, removed: &[ConsensusPubKey], new_threshold: u32) -> Result<()> {
        if dkg.status != DkgStatus::Completed {
            return Err(CeremonyError::InvalidStatus {
                entity: "dkg",
                id: dkg.id,
                status: dkg.status.as_str().to_string(),
                expected: "Completed",
            });
        }
        for participant in removed {
            if !dkg.participants.contains(participant) {
                return Err(CeremonyError::RemovedParticipantUnknown { dkg_id: dkg.id, participant: participant.to_string() });
            }
        }
        let remaining = remaining_participants(&dkg.participants, removed).len();
        if remaining < self.min_participants as usize {
            return Err(CeremonyError::InsufficientRemainingParticipants { remaining, min: self.min_participants });
        }
        if new_threshold < self.min_threshold {
            return Err(CeremonyError::ThresholdTooLow { threshold: new_threshold, min: self.min_threshold });
        }
        if remaining < new_threshold as usize {
            return Err(CeremonyError::RemainingBelowThreshold { remaining, threshold: new_threshold });
        }
        Ok(())
    }
}
