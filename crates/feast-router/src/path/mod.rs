//! Path normalization and reverse path building
//!
//! The builder is the inverse of the request matcher: a path generated here
//! for a route resolves back to the same route and arguments.

use crate::args::{ArgValue, Arguments};
use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::method::HttpMethod;
use crate::registry::RouteRegistry;
use crate::route::{classify_segment, PatternSegmentType, RouteDefinition, DEFAULT_MODULE};
use crate::state::RouterState;

pub mod query;
pub use query::{build_query, parse_query};

/// Strips one leading and one trailing `/`; an empty path is `index/index`
///
/// # Examples
///
/// ```
/// use feast_router::path::normalize_request_path;
///
/// assert_eq!(normalize_request_path("/blog/post/"), "blog/post");
/// assert_eq!(normalize_request_path("//a//"), "/a/");
/// assert_eq!(normalize_request_path("/"), "index/index");
/// assert_eq!(normalize_request_path(""), "index/index");
/// ```
pub fn normalize_request_path(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        "index/index"
    } else {
        path
    }
}

/// Canonical form of a generated path
///
/// Trailing `/index` segments are stripped repeatedly, as is a bare `index`,
/// then one trailing `/`. The result always starts with `/`.
///
/// # Examples
///
/// ```
/// use feast_router::path::normalize_generated_path;
///
/// assert_eq!(normalize_generated_path("/testing/index/index"), "/testing");
/// assert_eq!(normalize_generated_path("/index/index"), "/");
/// assert_eq!(normalize_generated_path("/blog/index-page"), "/blog/index-page");
/// assert_eq!(normalize_generated_path("blog/"), "/blog");
/// ```
pub fn normalize_generated_path(path: &str) -> String {
    let mut path = path;
    while let Some(stripped) = path.strip_suffix("/index") {
        path = stripped;
    }
    if path == "index" {
        path = "";
    }
    let path = path.strip_suffix('/').unwrap_or(path);

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// What to build a path for
///
/// Either a named route, or an explicit module/controller/action; missing
/// parts of the latter default to the current request.
///
/// ```
/// use feast_router::PathRequest;
///
/// let named = PathRequest::route("teapot").with_argument("name", "earl-grey");
/// let conventional = PathRequest::action("show").with_controller("blog").with_query("page", "2");
/// assert_eq!(named.route_name.as_deref(), Some("teapot"));
/// assert_eq!(conventional.controller.as_deref(), Some("blog"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathRequest {
    pub route_name: Option<String>,
    pub module: Option<String>,
    pub controller: Option<String>,
    pub action: Option<String>,
    pub arguments: Arguments,
    pub query: Arguments,
    pub http_method: Option<HttpMethod>,
}

impl PathRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(name: impl Into<String>) -> Self {
        Self {
            route_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.http_method = Some(method);
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.arguments.insert(name, value);
        self
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments.extend(arguments);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.query.insert(name, value);
        self
    }
}

/// Synthesizes external paths from route names or conventional targets
pub struct PathBuilder<'a> {
    registry: &'a RouteRegistry,
    config: &'a RouterConfig,
}

impl<'a> PathBuilder<'a> {
    pub fn new(registry: &'a RouteRegistry, config: &'a RouterConfig) -> Self {
        Self { registry, config }
    }

    pub fn build(&self, current: Option<&RouterState>, request: &PathRequest) -> Result<String> {
        match &request.route_name {
            Some(name) => {
                let method = request.http_method.unwrap_or_default();
                let route = self
                    .registry
                    .find(method, name)
                    .ok_or_else(|| RouterError::NotFoundRoute(name.clone()))?;
                Ok(named_path(route, request))
            }
            None => Ok(conventional_path(current, request, &self.config.internal_prefix)),
        }
    }
}

/// Substitutes a named route's placeholders; other arguments go to the query
fn named_path(route: &RouteDefinition, request: &PathRequest) -> String {
    let mut leftovers = request.arguments.clone();
    let mut segments: Vec<String> = Vec::new();

    for segment in route.raw_template.trim_matches('/').split('/') {
        let (name, optional) = match classify_segment(segment) {
            PatternSegmentType::Static(literal) => {
                segments.push(literal);
                continue;
            }
            PatternSegmentType::Required(name) => (name, false),
            PatternSegmentType::Optional(name) => (name, true),
        };

        let supplied = leftovers.remove(&name).filter(|value| !value.is_null());
        let default = route
            .argument_chain
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.default.clone())
            .map(ArgValue::Single);

        match supplied.or(default) {
            Some(ArgValue::Many(values)) if values.is_empty() && optional => {}
            Some(value) => segments.push(encode_value(&value)),
            None if optional => {}
            None => segments.push(String::new()),
        }
    }

    let path = normalize_generated_path(&segments.join("/"));
    with_query(path, leftovers.iter().chain(request.query.iter()))
}

/// `module/controller/action/key/value...`
///
/// A target whose module and controller both come from an internal current
/// request stays under `internal_prefix`.
fn conventional_path(
    current: Option<&RouterState>,
    request: &PathRequest,
    internal_prefix: &str,
) -> String {
    let internal = request.module.is_none()
        && request.controller.is_none()
        && current.is_some_and(|state| state.is_internal);
    let module = request
        .module
        .clone()
        .or_else(|| current.map(|state| state.module.clone()))
        .unwrap_or_else(|| DEFAULT_MODULE.to_string());
    let controller = request
        .controller
        .clone()
        .or_else(|| current.map(|state| state.controller_name.clone()))
        .unwrap_or_else(|| "index".to_string());
    let action = request
        .action
        .clone()
        .or_else(|| current.map(|state| state.action_name.clone()))
        .unwrap_or_else(|| "index".to_string());

    let mut segments: Vec<String> = Vec::new();
    if internal {
        segments.push(internal_prefix.to_string());
    } else if module != DEFAULT_MODULE {
        segments.push(module);
    }
    segments.push(controller);
    segments.push(action);

    for (key, value) in request.arguments.iter() {
        if value.is_null() {
            continue;
        }
        segments.push(urlencoding::encode(key).into_owned());
        segments.push(urlencoding::encode(&value.to_string()).into_owned());
    }

    let path = normalize_generated_path(&segments.join("/"));
    with_query(path, request.query.iter())
}

/// Percent-encodes a value; list values become one encoded segment each
fn encode_value(value: &ArgValue) -> String {
    value
        .values()
        .into_iter()
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn with_query<'a>(path: String, args: impl IntoIterator<Item = (&'a str, &'a ArgValue)>) -> String {
    let query = build_query(args);
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RunAs;
    use crate::route::RouteRegistration;
    use pretty_assertions::assert_eq;

    fn registry() -> RouteRegistry {
        let mut registry = RouteRegistry::new();
        registry
            .register(
                RouteRegistration::new("im-a-teapot/:name/?:otherArgs", "index", "teapot")
                    .with_name("teapot"),
            )
            .unwrap();
        registry
            .register(
                RouteRegistration::new("archive/:year/?:page", "blog", "archive")
                    .with_name("archive")
                    .with_default("year", "2024"),
            )
            .unwrap();
        registry
            .register(
                RouteRegistration::new("people/:id", "users", "show")
                    .with_name("admin-user")
                    .with_module("Admin"),
            )
            .unwrap();
        registry
    }

    fn build(request: PathRequest) -> Result<String> {
        let registry = registry();
        let config = RouterConfig::default();
        PathBuilder::new(&registry, &config).build(None, &request)
    }

    #[test]
    fn test_named_path_substitutes_and_encodes() {
        let path = build(PathRequest::route("teapot").with_argument("name", "earl grey")).unwrap();
        assert_eq!(path, "/im-a-teapot/earl%20grey");
    }

    #[test]
    fn test_named_path_joins_list_values() {
        let path = build(
            PathRequest::route("teapot")
                .with_argument("name", "test2")
                .with_argument("otherArgs", vec!["a", "b"]),
        )
        .unwrap();
        assert_eq!(path, "/im-a-teapot/test2/a/b");
    }

    #[test]
    fn test_named_path_uses_defaults_and_queries_leftovers() {
        let path = build(
            PathRequest::route("archive")
                .with_argument("sort", "desc")
                .with_query("ref", "home"),
        )
        .unwrap();
        assert_eq!(path, "/archive/2024?sort=desc&ref=home");
    }

    #[test]
    fn test_named_path_in_module_is_template_only() {
        let path = build(PathRequest::route("admin-user").with_argument("id", "7")).unwrap();
        assert_eq!(path, "/people/7");
    }

    #[test]
    fn test_unknown_route_name() {
        let err = build(PathRequest::route("missing")).unwrap_err();
        assert!(matches!(err, RouterError::NotFoundRoute(name) if name == "missing"));
    }

    #[test]
    fn test_route_names_are_per_method() {
        assert!(build(PathRequest::route("teapot").with_method(HttpMethod::Post)).is_err());
    }

    #[test]
    fn test_conventional_path() {
        let path = build(
            PathRequest::action("edit")
                .with_controller("blog")
                .with_argument("id", "5")
                .with_query("draft", "1"),
        )
        .unwrap();
        assert_eq!(path, "/blog/edit/id/5?draft=1");
    }

    #[test]
    fn test_conventional_path_strips_index() {
        assert_eq!(build(PathRequest::action("index").with_controller("blog")).unwrap(), "/blog");
        assert_eq!(build(PathRequest::new()).unwrap(), "/");
    }

    #[test]
    fn test_conventional_path_defaults_to_current_request() {
        let registry = registry();
        let mut current = RouterState::new("Admin", RunAs::Web);
        current.controller_name = "users".to_string();
        current.action_name = "list".to_string();

        let config = RouterConfig::default();
        let path = PathBuilder::new(&registry, &config)
            .build(Some(&current), &PathRequest::action("show"))
            .unwrap();
        assert_eq!(path, "/Admin/users/show");
    }

    #[test]
    fn test_conventional_path_keeps_internal_prefix() {
        let registry = registry();
        let config = RouterConfig::default();
        let mut current = RouterState::new(DEFAULT_MODULE, RunAs::Web);
        current.is_internal = true;
        current.controller_name = "cache".to_string();
        current.action_name = "clear".to_string();

        let builder = PathBuilder::new(&registry, &config);
        let path = builder.build(Some(&current), &PathRequest::action("show")).unwrap();
        assert_eq!(path, "/feast/cache/show");

        let path = builder
            .build(Some(&current), &PathRequest::action("show").with_controller("blog"))
            .unwrap();
        assert_eq!(path, "/blog/show");
    }
}
