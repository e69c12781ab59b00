//! Peer discovery.
//!
//! At startup the coordinator looks for the structural solver instance in
//! a registry of co-launched applications. Zero matches degrades the run
//! to dry-run mode; exactly one match connects; more than one is a fatal
//! configuration error, since the topology is ambiguous and cannot be
//! resolved automatically.

use fsibridge_types::PeerApplication;

/// Error returned by peer discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// More than one matching peer instance was found.
    #[error("detected {0} structural solver instances; can handle exactly 1")]
    AmbiguousPeers(usize),
}

/// Locates the peer solver instance.
///
/// Implementations scan whatever registry the launch mechanism provides
/// (an MPI application set, a process table, a static list in tests).
pub trait PeerDiscovery {
    /// Find the single application whose type matches `app_type`.
    ///
    /// Returns `Ok(None)` when no instance matches (dry-run mode) and
    /// [`DiscoveryError::AmbiguousPeers`] when several do.
    fn discover(&self, app_type: &str) -> Result<Option<PeerApplication>, DiscoveryError>;
}

/// Discovery over a fixed application list.
///
/// Used by tests and by embedders that already know the launch topology.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    apps: Vec<PeerApplication>,
}

impl StaticRegistry {
    /// Empty registry: discovery always reports no peer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an application to the registry.
    pub fn register(&mut self, app: PeerApplication) {
        self.apps.push(app);
    }
}

impl PeerDiscovery for StaticRegistry {
    fn discover(&self, app_type: &str) -> Result<Option<PeerApplication>, DiscoveryError> {
        let mut matches = self.apps.iter().filter(|app| app.app_type == app_type);
        match (matches.next(), matches.next()) {
            (None, _) => Ok(None),
            (Some(app), None) => Ok(Some(app.clone())),
            (Some(_), Some(_)) => {
                let n = self
                    .apps
                    .iter()
                    .filter(|app| app.app_type == app_type)
                    .count();
                Err(DiscoveryError::AmbiguousPeers(n))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(app_type: &str, name: &str, root_rank: u32) -> PeerApplication {
        PeerApplication {
            root_rank,
            app_type: app_type.into(),
            app_name: name.into(),
        }
    }

    #[test]
    fn test_no_peer_found() {
        let registry = StaticRegistry::new();
        assert_eq!(registry.discover("code_aster").unwrap(), None);
    }

    #[test]
    fn test_single_peer_found() {
        let mut registry = StaticRegistry::new();
        registry.register(app("fluid", "fluid_0", 0));
        registry.register(app("code_aster", "struct_0", 4));

        let found = registry.discover("code_aster").unwrap().unwrap();
        assert_eq!(found.root_rank, 4);
        assert_eq!(found.app_name, "struct_0");
    }

    #[test]
    fn test_ambiguous_peers_is_an_error() {
        let mut registry = StaticRegistry::new();
        registry.register(app("code_aster", "struct_0", 4));
        registry.register(app("code_aster", "struct_1", 8));

        match registry.discover("code_aster") {
            Err(DiscoveryError::AmbiguousPeers(2)) => {}
            other => panic!("expected AmbiguousPeers(2), got {other:?}"),
        }
    }
}
