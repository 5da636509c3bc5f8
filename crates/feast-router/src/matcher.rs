//! Request matcher
//!
//! Resolves a web path to a `RouterState` in two phases: every named route of
//! the request's HTTP method is tried in registration order against the path
//! left after module detection, and only when none matches is that path read
//! positionally as `[module/]controller/action/key/value...`.
//!
//! Values are bound exactly as they appear in the path; decoding is left to
//! the handler.
//!
//! Matching never fails. A convention-resolved target that does not exist is
//! reported when the dispatch loop asks for its handler method.

use crate::args::zip_arguments;
use crate::catalog::HandlerCatalog;
use crate::config::RouterConfig;
use crate::method::{HandlerVerb, HttpMethod, RunAs};
use crate::path::{normalize_request_path, parse_query};
use crate::registry::RouteRegistry;
use crate::route::DEFAULT_MODULE;
use crate::state::RouterState;
use tracing::debug;

pub struct RequestMatcher<'a> {
    registry: &'a RouteRegistry,
    catalog: &'a HandlerCatalog,
    config: &'a RouterConfig,
}

impl<'a> RequestMatcher<'a> {
    pub fn new(
        registry: &'a RouteRegistry,
        catalog: &'a HandlerCatalog,
        config: &'a RouterConfig,
    ) -> Self {
        Self {
            registry,
            catalog,
            config,
        }
    }

    /// Resolves `path` (optionally carrying `?query`) for `method`
    pub fn match_request(&self, path: &str, method: HttpMethod) -> RouterState {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let normalized = normalize_request_path(path);
        let segments: Vec<&str> = normalized.split('/').collect();

        let (module, segments) = detect_module(self.catalog, &segments);
        let mut state = RouterState::new(module, RunAs::Web);
        state.http_method = method;
        state.query = parse_query(query);

        let remaining = segments.join("/");
        if let Some((route, values)) = self.registry.first_match(method, &remaining) {
            debug!(route = %route.route_name, path = %remaining, "matched named route");
            state.module = route.module.clone();
            state.controller_name = route.controller.clone();
            state.action_name = route.action.clone();
            state.route_name = route.route_name.clone();
            state.arguments = zip_arguments(&route.argument_chain, values);
            resolve_handler(self.catalog, &mut state);
            return state;
        }

        let mut segments = segments;
        if state.module == DEFAULT_MODULE
            && segments.first() == Some(&self.config.internal_prefix.as_str())
        {
            state.is_internal = true;
            segments = &segments[1..];
        }

        state.controller_name = segment_or_index(segments.first());
        state.action_name = segment_or_index(segments.get(1));

        let pairs: &[&str] = segments.get(2..).unwrap_or_default();
        for pair in pairs.chunks_exact(2) {
            if pair[0].is_empty() {
                continue;
            }
            state.arguments.insert(pair[0], pair[1]);
        }

        debug!(
            module = %state.module,
            controller = %state.controller_name,
            action = %state.action_name,
            internal = state.is_internal,
            "resolved by convention"
        );
        resolve_handler(self.catalog, &mut state);
        state
    }
}

/// Consumes the first segment when it names a non-default module
pub(crate) fn detect_module<'s>(
    catalog: &HandlerCatalog,
    segments: &'s [&'s str],
) -> (String, &'s [&'s str]) {
    match segments.first().and_then(|first| catalog.find_module(first)) {
        Some(module) => (module.to_string(), &segments[1..]),
        None => (DEFAULT_MODULE.to_string(), segments),
    }
}

pub(crate) fn segment_or_index(segment: Option<&&str>) -> String {
    match segment {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => "index".to_string(),
    }
}

/// Fills in the controller class and handler method, if they exist
///
/// Web requests prefer the handler for their verb; CLI dispatch prefers the
/// `Get` handler. Both fall back to `<action>Action`.
pub(crate) fn resolve_handler(catalog: &HandlerCatalog, state: &mut RouterState) {
    let controller = if state.is_internal {
        catalog.internal_controller(&state.controller_name)
    } else {
        catalog.controller(&state.module, &state.controller_name)
    };

    let preferred = match state.run_as {
        RunAs::Cli => HandlerVerb::Get,
        RunAs::Web => state.http_method.handler_verb(),
    };

    state.controller_class = controller.map(|controller| controller.class_name.clone());
    state.action_method = controller
        .and_then(|controller| controller.action(&state.action_name))
        .and_then(|action| action.resolve_handler(preferred))
        .map(str::to_string);
}
