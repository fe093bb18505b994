//! Connectivity probe

use tracing::{debug, warn};

use crate::store::RemoteStore;

/// One reachability attempt. Never fails: any error means "not reachable".
pub async fn probe(remote: Option<&dyn RemoteStore>) -> bool {
    let Some(remote) = remote else {
        debug!("No remote store configured");
        return false;
    };

    match remote.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Remote store unreachable");
            false
        }
    }
}
