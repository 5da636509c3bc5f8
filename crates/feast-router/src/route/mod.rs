//! Route definitions
//!
//! A `RouteDefinition` is created once at registration time and never
//! mutated. It owns the compiled rule and the argument chain and can turn
//! itself back into a plain `RouteRecord` for the snapshot cache.

pub mod pattern;

pub use pattern::{classify_segment, compile_template, CompiledPattern, PatternSegmentType};

use crate::error::Result;
use crate::method::HttpMethod;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Module every route belongs to unless registered otherwise
pub const DEFAULT_MODULE: &str = "Default";

/// One declared parameter of a route template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentChainEntry {
    pub name: String,
    pub default: Option<String>,
    /// May capture zero values (`?` marker)
    #[serde(default)]
    pub optional: bool,
    /// May capture more than one value (final template segment)
    #[serde(default)]
    pub variadic: bool,
}

impl ArgumentChainEntry {
    pub fn new(name: impl Into<String>, default: Option<String>) -> Self {
        Self {
            name: name.into(),
            default,
            optional: false,
            variadic: false,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn variadic(mut self, variadic: bool) -> Self {
        self.variadic = variadic;
        self
    }
}

/// Input to `RouteRegistry::register`
///
/// # Examples
///
/// ```
/// use feast_router::{HttpMethod, RouteRegistration};
///
/// let registration = RouteRegistration::new("im-a-teapot/:name/?:otherArgs", "index", "teapot")
///     .with_name("teapot")
///     .with_default("name", "earl-grey")
///     .with_method(HttpMethod::Get);
/// assert_eq!(registration.module, "Default");
/// ```
#[derive(Debug, Clone)]
pub struct RouteRegistration {
    pub template: String,
    pub controller: String,
    pub action: String,
    pub route_name: Option<String>,
    pub defaults: HashMap<String, String>,
    pub http_method: HttpMethod,
    pub module: String,
}

impl RouteRegistration {
    pub fn new(
        template: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            controller: controller.into(),
            action: action.into(),
            route_name: None,
            defaults: HashMap::new(),
            http_method: HttpMethod::Get,
            module: DEFAULT_MODULE.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = Some(name.into());
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn with_defaults(mut self, defaults: HashMap<String, String>) -> Self {
        self.defaults.extend(defaults);
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.http_method = method;
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }
}

/// A compiled, registered route
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub module: String,
    pub controller: String,
    pub action: String,
    pub route_name: String,
    pub http_method: HttpMethod,
    pub argument_chain: Vec<ArgumentChainEntry>,
    /// Computed path, see `CompiledPattern::path`
    pub path: String,
    pub match_rule: Regex,
    pub raw_template: String,
}

impl RouteDefinition {
    /// Compiles a registration into a definition
    ///
    /// Without an explicit name the route is named after its computed path.
    pub fn compile(registration: RouteRegistration) -> Result<Self> {
        let compiled = compile_template(&registration.template, &registration.defaults)?;
        let route_name = registration
            .route_name
            .unwrap_or_else(|| compiled.path.trim_start_matches('/').to_string());

        Ok(Self {
            module: registration.module,
            controller: registration.controller,
            action: registration.action,
            route_name,
            http_method: registration.http_method,
            argument_chain: compiled.argument_chain,
            path: compiled.path,
            match_rule: compiled.match_rule,
            raw_template: registration.template,
        })
    }

    /// Matches the post-module request path and returns every captured value
    ///
    /// Each capture is split on `/` and bound as written in the path; an
    /// optional tail that matched nothing contributes no values.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let captures = self.match_rule.captures(path)?;
        let values = captures
            .iter()
            .skip(1)
            .flatten()
            .flat_map(|group| group.as_str().split('/'))
            .map(str::to_string)
            .collect();
        Some(values)
    }

    /// Plain data form used by the snapshot cache
    pub fn to_record(&self) -> RouteRecord {
        RouteRecord {
            module: self.module.clone(),
            controller: self.controller.clone(),
            action: self.action.clone(),
            route_name: self.route_name.clone(),
            template: self.raw_template.clone(),
            defaults: self
                .argument_chain
                .iter()
                .filter_map(|entry| {
                    entry
                        .default
                        .as_ref()
                        .map(|value| (entry.name.clone(), value.clone()))
                })
                .collect(),
        }
    }
}

/// Serializable registration data of one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub module: String,
    pub controller: String,
    pub action: String,
    pub route_name: String,
    pub template: String,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

impl RouteRecord {
    pub fn into_registration(self, method: HttpMethod) -> RouteRegistration {
        RouteRegistration::new(self.template, self.controller, self.action)
            .with_name(self.route_name)
            .with_defaults(self.defaults.into_iter().collect())
            .with_method(method)
            .with_module(self.module)
    }
}
