//! Route registry
//!
//! Stores compiled routes per HTTP method in registration order, enforces
//! uniqueness of `(method, computed path)` and `(method, route name)`, and
//! converts to and from the versioned snapshot used by the route cache.
//!
//! A registry rehydrated from a snapshot is frozen: registration and discovery
//! become no-ops.

use crate::error::{Result, RouterError};
use crate::method::HttpMethod;
use crate::route::{RouteDefinition, RouteRecord, RouteRegistration};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, trace};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Supplier of declared routes, walked by `RouteRegistry::discover`
///
/// Implementations yield one registration per (route, HTTP method), default
/// module first, then every other module.
pub trait RouteDiscoverySource {
    fn discover_routes(&self) -> Vec<RouteRegistration>;
}

/// Versioned, data-only form of the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub version: u32,
    pub from_cache: bool,
    pub routes: BTreeMap<HttpMethod, Vec<RouteRecord>>,
}

/// Compiled routes keyed by HTTP method
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<HttpMethod, Vec<RouteDefinition>>,
    from_cache: bool,
    discovered: bool,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this registry was rehydrated from a snapshot
    pub fn is_from_cache(&self) -> bool {
        self.from_cache
    }

    /// Whether `discover` has populated this registry
    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Compiles and stores a route
    ///
    /// # Examples
    ///
    /// ```
    /// use feast_router::{HttpMethod, RouteRegistration, RouteRegistry, RouterError};
    ///
    /// let mut registry = RouteRegistry::new();
    /// registry.register(RouteRegistration::new("blog/:slug", "blog", "show")).unwrap();
    ///
    /// let duplicate = registry.register(RouteRegistration::new("blog/:post", "blog", "other"));
    /// assert!(matches!(duplicate, Err(RouterError::RouteConflict { .. })));
    ///
    /// // Same path on another method is fine
    /// registry
    ///     .register(RouteRegistration::new("blog/:slug", "blog", "update").with_method(HttpMethod::Post))
    ///     .unwrap();
    /// ```
    pub fn register(&mut self, registration: RouteRegistration) -> Result<()> {
        if self.from_cache {
            trace!(template = %registration.template, "registry is cached, registration skipped");
            return Ok(());
        }

        Self::insert(&mut self.routes, registration)
    }

    fn insert(
        routes: &mut HashMap<HttpMethod, Vec<RouteDefinition>>,
        registration: RouteRegistration,
    ) -> Result<()> {
        let definition = RouteDefinition::compile(registration)?;
        let table = routes.entry(definition.http_method).or_default();

        if table.iter().any(|existing| existing.path == definition.path) {
            return Err(RouterError::RouteConflict {
                method: definition.http_method,
                path: definition.path,
            });
        }
        if table
            .iter()
            .any(|existing| existing.route_name == definition.route_name)
        {
            return Err(RouterError::DuplicateRouteName {
                method: definition.http_method,
                name: definition.route_name,
            });
        }

        debug!(
            method = %definition.http_method,
            name = %definition.route_name,
            template = %definition.raw_template,
            "registered route"
        );
        table.push(definition);
        Ok(())
    }

    /// Registers every route the source declares
    ///
    /// Runs once per registry; later calls, and calls on a cached registry,
    /// are no-ops. Registrations are staged on a copy and committed only when
    /// all of them succeed, so a conflict leaves the registry untouched.
    pub fn discover(&mut self, source: &dyn RouteDiscoverySource) -> Result<()> {
        if self.from_cache || self.discovered {
            return Ok(());
        }

        let mut staged = self.routes.clone();
        for registration in source.discover_routes() {
            Self::insert(&mut staged, registration)?;
        }
        self.routes = staged;
        self.discovered = true;

        info!(routes = self.len(), "route discovery complete");
        Ok(())
    }

    /// Discovers every route, then encodes the registry as a cached snapshot
    ///
    /// The encoded snapshot is marked as cached; this registry is not, so it
    /// keeps accepting registrations for the rest of the process.
    pub fn snapshot(&mut self, source: &dyn RouteDiscoverySource) -> Result<Vec<u8>> {
        self.discover(source)?;

        let snapshot = RouteSnapshot {
            version: SNAPSHOT_VERSION,
            from_cache: true,
            routes: self
                .routes
                .iter()
                .map(|(method, table)| {
                    (*method, table.iter().map(RouteDefinition::to_record).collect())
                })
                .collect(),
        };

        Ok(serde_json::to_vec_pretty(&snapshot)?)
    }

    /// Rehydrates a registry from snapshot bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let snapshot: RouteSnapshot = serde_json::from_slice(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RouterError::UnsupportedSnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut routes: HashMap<HttpMethod, Vec<RouteDefinition>> = HashMap::new();
        for (method, records) in snapshot.routes {
            let table = records
                .into_iter()
                .map(|record| RouteDefinition::compile(record.into_registration(method)))
                .collect::<Result<Vec<_>>>()?;
            routes.insert(method, table);
        }

        let registry = Self {
            routes,
            from_cache: true,
            discovered: true,
        };
        info!(routes = registry.len(), "route registry loaded from cache");
        Ok(registry)
    }

    /// Routes of one method, in registration order
    pub fn routes(&self, method: HttpMethod) -> &[RouteDefinition] {
        self.routes
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find(&self, method: HttpMethod, route_name: &str) -> Option<&RouteDefinition> {
        self.routes(method)
            .iter()
            .find(|route| route.route_name == route_name)
    }

    /// First route whose rule matches `path`, with its captured values
    ///
    /// Every route of the method is a candidate whatever module declared it.
    pub fn first_match(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Option<(&RouteDefinition, Vec<String>)> {
        self.routes(method)
            .iter()
            .find_map(|route| {
                trace!(rule = %route.match_rule, path, "trying route");
                route.captures(path).map(|values| (route, values))
            })
    }

    /// Total number of routes over all methods
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
