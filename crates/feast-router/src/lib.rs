//! # Feast Router
//!
//! Request routing for the Feast MVC framework. One router serves two
//! surfaces:
//! - Web paths (`/blog/show/id/5`, `/im-a-teapot/earl-grey`)
//! - CLI token strings (`CLI/small/create/--color=orange/testing`)
//!
//! ## Resolution
//!
//! Web paths are matched against declared named routes of the request's HTTP
//! method first, then read positionally as
//! `[module/]controller/action/key/value...`. CLI input is bound to the
//! declared parameters of the target action.
//!
//! Route templates use `:name` for required and `?:name` for optional
//! parameters; the last parameter swallows every remaining segment:
//! - `blog/:slug` matches `/blog/hello`
//! - `im-a-teapot/:name/?:otherArgs` matches `/im-a-teapot/test2/a/b`
//!
//! ## Reverse routing
//!
//! `Router::get_path` is the inverse of matching: a path built for a route
//! and arguments resolves back to the same route and arguments.
//!
//! ## Example
//!
//! ```
//! use feast_router::{
//!     ActionDescriptor, ControllerDescriptor, HandlerCatalog, HandlerVerb, HttpMethod,
//!     PathRequest, RouteAttribute, Router, RouterConfig,
//! };
//!
//! let catalog = HandlerCatalog::new().with_controller(
//!     ControllerDescriptor::new("index").with_action(
//!         ActionDescriptor::new("teapot")
//!             .with_handler(HandlerVerb::Get)
//!             .with_route(RouteAttribute::new("im-a-teapot/:name/?:otherArgs").with_name("teapot")),
//!     ),
//! );
//!
//! let mut router = Router::new(catalog, RouterConfig::default());
//! router.discover().unwrap();
//!
//! let state = router.match_request("/im-a-teapot/earl-grey", HttpMethod::Get);
//! assert_eq!(state.action_method_name().unwrap(), "teapotGet");
//! assert_eq!(state.argument("name"), Some("earl-grey"));
//!
//! let path = router
//!     .get_path(None, &PathRequest::route("teapot").with_argument("name", "earl-grey"))
//!     .unwrap();
//! assert_eq!(path, "/im-a-teapot/earl-grey");
//! ```

use anyhow::Context;
use tracing::{debug, info, warn};

// ============================================================================
// Module Declarations
// ============================================================================

mod args;
mod cache;
mod catalog;
mod cli;
mod config;
mod error;
mod matcher;
mod method;
pub mod path;
mod registry;
pub mod route;
mod state;

pub use args::{zip_arguments, ArgValue, Arguments};
pub use cache::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use catalog::{
    action_method_name, controller_class_name, ActionDescriptor, ControllerDescriptor,
    HandlerCatalog, ModuleDescriptor, ParameterDescriptor, ParameterKind, RouteAttribute,
};
pub use cli::{bind_tokens, CliBinder};
pub use config::{Config, RouterConfig};
pub use error::{Result, RouterError};
pub use matcher::RequestMatcher;
pub use method::{HandlerVerb, HttpMethod, RunAs};
pub use path::{PathBuilder, PathRequest};
pub use registry::{RouteDiscoverySource, RouteRegistry, RouteSnapshot, SNAPSHOT_VERSION};
pub use route::{ArgumentChainEntry, RouteDefinition, RouteRecord, RouteRegistration, DEFAULT_MODULE};
pub use state::{RouterPhase, RouterState, RoutesSource};

// ============================================================================
// Router
// ============================================================================

/// Route table, handler catalog and configuration of one application
///
/// The router owns no per-request state; every match or bind returns a fresh
/// `RouterState` for the caller's dispatch loop.
#[derive(Debug, Clone)]
pub struct Router {
    registry: RouteRegistry,
    catalog: HandlerCatalog,
    config: RouterConfig,
    run_as: RunAs,
    source: Option<RoutesSource>,
}

impl Router {
    pub fn new(catalog: HandlerCatalog, config: RouterConfig) -> Self {
        Self {
            registry: RouteRegistry::new(),
            catalog,
            config,
            run_as: RunAs::Web,
            source: None,
        }
    }

    /// Sets which surface `route` resolves for
    pub fn with_run_as(mut self, run_as: RunAs) -> Self {
        self.run_as = run_as;
        self
    }

    pub fn run_as(&self) -> RunAs {
        self.run_as
    }

    /// `Uninitialized` until routes were scanned or loaded from cache
    pub fn phase(&self) -> RouterPhase {
        match self.source {
            Some(source) => RouterPhase::RoutesReady(source),
            None => RouterPhase::Uninitialized,
        }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &HandlerCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registers a route outside of the catalog; ignored once loaded from cache
    pub fn register(&mut self, registration: RouteRegistration) -> Result<()> {
        self.registry.register(registration)
    }

    /// Scans the catalog for declared routes
    pub fn discover(&mut self) -> Result<()> {
        self.registry.discover(&self.catalog)?;
        self.source.get_or_insert(RoutesSource::Scanned);
        Ok(())
    }

    /// Replaces the route table with a snapshot
    pub fn load_snapshot(&mut self, bytes: &[u8]) -> Result<()> {
        self.registry = RouteRegistry::load(bytes)?;
        self.source = Some(RoutesSource::Cached);
        Ok(())
    }

    /// Scans the catalog if needed and encodes the route table
    pub fn snapshot(&mut self) -> Result<Vec<u8>> {
        let bytes = self.registry.snapshot(&self.catalog)?;
        self.source.get_or_insert(RoutesSource::Scanned);
        Ok(bytes)
    }

    /// Makes the route table ready, from the cache when enabled and present
    pub fn warm_up(&mut self, store: &dyn SnapshotStore) -> anyhow::Result<RoutesSource> {
        if self.config.use_route_cache {
            match store.read()? {
                Some(bytes) => {
                    self.load_snapshot(&bytes)
                        .with_context(|| format!("Failed to load route cache from {} store", store.name()))?;
                    return Ok(RoutesSource::Cached);
                }
                None => warn!(store = store.name(), "route cache enabled but empty, scanning"),
            }
        }

        self.discover().context("Failed to discover routes")?;
        Ok(RoutesSource::Scanned)
    }

    /// Writes the current route table to `store`
    pub fn write_cache(&mut self, store: &dyn SnapshotStore) -> anyhow::Result<()> {
        let bytes = self.snapshot().context("Failed to encode route cache")?;
        store.write(&bytes)?;
        info!(store = store.name(), routes = self.registry.len(), "route cache written");
        Ok(())
    }

    /// Resolves a web path; never fails, see `RouterState::action_method_name`
    pub fn match_request(&self, path: &str, method: HttpMethod) -> RouterState {
        RequestMatcher::new(&self.registry, &self.catalog, &self.config).match_request(path, method)
    }

    /// Resolves and binds a CLI token string
    pub fn bind_cli(&self, input: &str) -> Result<RouterState> {
        CliBinder::new(&self.catalog, &self.config).bind(input)
    }

    /// Resolves `input` on the surface this router runs as
    pub fn route(&self, input: &str, method: HttpMethod) -> Result<RouterState> {
        match self.run_as {
            RunAs::Web => Ok(self.match_request(input, method)),
            RunAs::Cli => self.bind_cli(input),
        }
    }

    /// Builds the external path of a named route or conventional target
    pub fn get_path(&self, current: Option<&RouterState>, request: &PathRequest) -> Result<String> {
        PathBuilder::new(&self.registry, &self.config).build(current, request)
    }

    /// Retargets `state` and marks it for re-dispatch
    pub fn forward_to(
        &self,
        state: &mut RouterState,
        controller: impl Into<String>,
        action: impl Into<String>,
        arguments: Arguments,
    ) {
        state.controller_name = controller.into();
        state.action_name = action.into();
        state.arguments = arguments;
        state.route_name.clear();
        matcher::resolve_handler(&self.catalog, state);
        state.forward(true);

        debug!(
            controller = %state.controller_name,
            action = %state.action_name,
            "request forwarded"
        );
    }

    /// Runs `handler` until it stops forwarding
    ///
    /// Fails with `RoutingLoop` once the request was forwarded more than
    /// `max_forwards` times.
    pub fn run<F>(&self, state: &mut RouterState, mut handler: F) -> Result<()>
    where
        F: FnMut(&Router, &mut RouterState) -> Result<()>,
    {
        loop {
            handler(self, state)?;
            if !state.forwarded {
                return Ok(());
            }

            state.forward_count += 1;
            if state.forward_count > self.config.max_forwards {
                return Err(RouterError::RoutingLoop {
                    limit: self.config.max_forwards,
                });
            }
            state.forward(false);
        }
    }
}
