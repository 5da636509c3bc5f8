pub mod cache;
pub mod path;
pub mod resolve;
pub mod routes;

use anyhow::Result;
use feast_router::{FileSnapshotStore, HandlerCatalog, Router, RouterConfig};
use std::path::Path;
use tracing::{debug, warn};

/// Configuration and handler manifest of the project the tool runs in
pub struct Project {
    pub config: RouterConfig,
    pub catalog: HandlerCatalog,
}

impl Project {
    pub fn load(manifest: &Path, config: &Path) -> Result<Self> {
        let config = RouterConfig::load(config)?;

        let catalog = if manifest.exists() {
            HandlerCatalog::from_file(manifest)?
        } else {
            warn!(manifest = %manifest.display(), "handler manifest not found, using an empty catalog");
            HandlerCatalog::new()
        };

        Ok(Self { config, catalog })
    }

    pub fn store(&self) -> FileSnapshotStore {
        FileSnapshotStore::new(&self.config.cache_path)
    }

    /// A router with its route table ready, honouring `use_route_cache`
    pub fn router(&self) -> Result<Router> {
        let mut router = Router::new(self.catalog.clone(), self.config.clone());
        let source = router.warm_up(&self.store())?;
        debug!(?source, routes = router.registry().len(), "router ready");
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feast_router::{HttpMethod, RoutesSource};
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[[controllers]]
name = "index"

[[controllers.actions]]
name = "teapot"
verbs = ["get"]
routes = [{ template = "im-a-teapot/:name", name = "teapot" }]
"#;

    #[test]
    fn test_missing_files_give_empty_project() {
        let dir = TempDir::new().unwrap();
        let project =
            Project::load(&dir.path().join("feast.routes.toml"), &dir.path().join("feast.toml"))
                .unwrap();
        assert_eq!(project.config, RouterConfig::default());
        assert!(project.router().unwrap().registry().is_empty());
    }

    #[test]
    fn test_router_uses_cache_when_enabled() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("feast.routes.toml");
        let config = dir.path().join("feast.toml");
        let cache = dir.path().join("routes.json");
        fs::write(&manifest, MANIFEST).unwrap();
        fs::write(
            &config,
            format!("[router]\nuse_route_cache = true\ncache_path = {:?}\n", cache),
        )
        .unwrap();

        let project = Project::load(&manifest, &config).unwrap();
        let mut router = project.router().unwrap();
        assert_eq!(router.phase(), feast_router::RouterPhase::RoutesReady(RoutesSource::Scanned));
        router.write_cache(&project.store()).unwrap();

        let router = project.router().unwrap();
        assert!(router.registry().is_from_cache());
        let state = router.match_request("/im-a-teapot/oolong", HttpMethod::Get);
        assert_eq!(state.action_method_name().unwrap(), "teapotGet");
    }
}
