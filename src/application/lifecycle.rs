use crate::application::{CeremonyEvent, Coordinator};
use crate::domain::{DkgStatus, RefreshStatus, SigningStatus};
use crate::foundation::Result;
use log::{debug, info};

impl Coordinator {
    /// Per-cycle maintenance sweep, invoked once between batches of message
    /// handling by the external scheduler.
    ///
    /// Resolves every pending DKG request, then every pending resharing
    /// request, each in ascending id order for reproducibility. Handler
    /// rejections are converted into request failures inside the resolvers;
    /// only storage faults propagate. Signing requests have no timeout and
    /// are never touched here.
    pub fn end_cycle(&self, now_nanos: u64) -> Result<()> {
        let pending_dkg = self.store.dkg_ids_by_status(DkgStatus::Pending)?;
        debug!("cycle sweep start now_nanos={} pending_dkg={}", now_nanos, pending_dkg.len());
        for id in pending_dkg {
            let Some(request) = self.store.get_dkg_request(id)? else {
                continue;
            };
            if request.status != DkgStatus::Pending {
                continue;
            }
            self.resolve_pending_dkg(request, now_nanos)?;
        }

        for id in self.store.refreshing_ids_by_status(RefreshStatus::Pending)? {
            let Some(request) = self.store.get_refreshing_request(id)? else {
                continue;
            };
            if request.status != RefreshStatus::Pending {
                continue;
            }
            self.resolve_pending_refreshing(request, now_nanos)?;
        }
        Ok(())
    }

    /// One-time administrative correction: force-fails every pending signing
    /// request. This is the only path out of Pending besides a successful
    /// submission; it is not part of the per-cycle logic.
    pub fn fail_pending_signing_requests(&self) -> Result<Vec<u64>> {
        let ids = self.store.signing_ids_by_status(SigningStatus::Pending)?;
        for &id in &ids {
            let Some(mut request) = self.store.get_signing_request(id)? else {
                continue;
            };
            request.status = SigningStatus::Failed;
            self.store.write_signing_request(&request)?;
            info!("signing request force-failed id={} module={}", id, request.module);
            self.events.emit(CeremonyEvent::SigningFailed { id, module: request.module });
        }
        Ok(ids)
    }
}
