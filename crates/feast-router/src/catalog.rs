//! Handler catalog
//!
//! The router never probes controllers at request time. Everything it needs to
//! know about modules, controllers, verb-suffixed action methods, declared
//! routes and CLI parameters is collected up front in a `HandlerCatalog`,
//! either through the builder API or from a TOML manifest.

use crate::method::{HandlerVerb, HttpMethod};
use crate::registry::RouteDiscoverySource;
use crate::route::{RouteRegistration, DEFAULT_MODULE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Declarative route metadata attached to an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAttribute {
    pub template: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub defaults: HashMap<String, String>,
    #[serde(default = "default_route_methods")]
    pub methods: Vec<HttpMethod>,
}

fn default_route_methods() -> Vec<HttpMethod> {
    vec![HttpMethod::Get]
}

impl RouteAttribute {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            name: None,
            defaults: HashMap::new(),
            methods: default_route_methods(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }
}

/// How a CLI token binds to a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Consumes the next bare token
    Positional,
    /// Bound from `--name=value`
    Flag,
}

/// Declared CLI parameter of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default)]
    pub default: Option<String>,
}

impl ParameterDescriptor {
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Positional,
            default: None,
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Flag,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// One action of a controller and the handler methods it exposes
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    pub name: String,
    handlers: HashMap<HandlerVerb, String>,
    pub routes: Vec<RouteAttribute>,
    pub parameters: Vec<ParameterDescriptor>,
}

impl ActionDescriptor {
    /// An action with no handler methods yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
            routes: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Declares the `<action><Verb>` method; its name is fixed here
    ///
    /// ```
    /// use feast_router::{ActionDescriptor, HandlerVerb};
    ///
    /// let action = ActionDescriptor::new("create-user").with_handler(HandlerVerb::Post);
    /// assert_eq!(action.handler(HandlerVerb::Post), Some("createUserPost"));
    /// assert_eq!(action.handler(HandlerVerb::Get), None);
    /// ```
    pub fn with_handler(mut self, verb: HandlerVerb) -> Self {
        let method = action_method_name(&self.name, verb);
        self.handlers.insert(verb, method);
        self
    }

    pub fn with_handlers(self, verbs: impl IntoIterator<Item = HandlerVerb>) -> Self {
        verbs.into_iter().fold(self, |action, verb| action.with_handler(verb))
    }

    pub fn with_route(mut self, route: RouteAttribute) -> Self {
        self.routes.push(route);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn handler(&self, verb: HandlerVerb) -> Option<&str> {
        self.handlers.get(&verb).map(String::as_str)
    }

    /// The preferred verb handler, else the verb-agnostic `<action>Action`
    pub fn resolve_handler(&self, preferred: HandlerVerb) -> Option<&str> {
        self.handler(preferred)
            .or_else(|| self.handler(HandlerVerb::Action))
    }
}

/// A controller and its actions
#[derive(Debug, Clone)]
pub struct ControllerDescriptor {
    pub name: String,
    pub class_name: String,
    pub actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let class_name = controller_class_name(&name);
        Self {
            name,
            class_name,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions
            .iter()
            .find(|action| action.name.eq_ignore_ascii_case(name))
    }
}

/// A module: a named group of controllers
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub name: String,
    pub controllers: Vec<ControllerDescriptor>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controllers: Vec::new(),
        }
    }

    pub fn with_controller(mut self, controller: ControllerDescriptor) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn controller(&self, name: &str) -> Option<&ControllerDescriptor> {
        self.controllers
            .iter()
            .find(|controller| controller.name.eq_ignore_ascii_case(name))
    }
}

/// Everything the router knows about the application's handlers
#[derive(Debug, Clone)]
pub struct HandlerCatalog {
    /// Default module first, then the other modules in declaration order
    modules: Vec<ModuleDescriptor>,
    /// Framework-owned controllers, reached through the internal prefix
    internal: ModuleDescriptor,
}

impl Default for HandlerCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self {
            modules: vec![ModuleDescriptor::new(DEFAULT_MODULE)],
            internal: ModuleDescriptor::new("Feast"),
        }
    }

    /// Adds a controller to the default module
    pub fn with_controller(mut self, controller: ControllerDescriptor) -> Self {
        self.modules[0].controllers.push(controller);
        self
    }

    /// Adds a module, merging its controllers into an existing one of the same name
    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        match self
            .modules
            .iter_mut()
            .find(|existing| existing.name == module.name)
        {
            Some(existing) => existing.controllers.extend(module.controllers),
            None => self.modules.push(module),
        }
        self
    }

    pub fn with_internal_controller(mut self, controller: ControllerDescriptor) -> Self {
        self.internal.controllers.push(controller);
        self
    }

    /// Canonical name of the non-default module a path segment names, if any
    pub fn find_module(&self, segment: &str) -> Option<&str> {
        self.modules
            .iter()
            .skip(1)
            .find(|module| module.name.eq_ignore_ascii_case(segment))
            .map(|module| module.name.as_str())
    }

    pub fn module(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|module| module.name == name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    pub fn controller(&self, module: &str, name: &str) -> Option<&ControllerDescriptor> {
        self.module(module)?.controller(name)
    }

    pub fn internal_controller(&self, name: &str) -> Option<&ControllerDescriptor> {
        self.internal.controller(name)
    }

    /// Loads a catalog from a TOML manifest
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read handler manifest: {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse handler manifest: {:?}", path))
    }

    /// Parses a TOML manifest
    ///
    /// ```
    /// use feast_router::{HandlerCatalog, HandlerVerb};
    ///
    /// let catalog = HandlerCatalog::from_toml_str(r#"
    ///     [[controllers]]
    ///     name = "testing"
    ///
    ///     [[controllers.actions]]
    ///     name = "service"
    ///     verbs = ["action", "post"]
    /// "#).unwrap();
    ///
    /// let action = catalog.controller("Default", "testing").unwrap().action("service").unwrap();
    /// assert_eq!(action.handler(HandlerVerb::Post), Some("servicePost"));
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: CatalogManifest = toml::from_str(content)?;
        Ok(manifest.into_catalog())
    }
}

impl RouteDiscoverySource for HandlerCatalog {
    fn discover_routes(&self) -> Vec<RouteRegistration> {
        let mut registrations = Vec::new();

        for module in &self.modules {
            for controller in &module.controllers {
                for action in &controller.actions {
                    for route in &action.routes {
                        for method in &route.methods {
                            let mut registration =
                                RouteRegistration::new(&route.template, &controller.name, &action.name)
                                    .with_defaults(route.defaults.clone())
                                    .with_method(*method)
                                    .with_module(&module.name);
                            registration.route_name = route.name.clone();
                            registrations.push(registration);
                        }
                    }
                }
            }
        }

        registrations
    }
}

#[derive(Debug, Deserialize)]
struct CatalogManifest {
    /// Controllers of the default module
    #[serde(default)]
    controllers: Vec<ControllerManifest>,
    #[serde(default)]
    modules: Vec<ModuleManifest>,
    #[serde(default)]
    internal: Vec<ControllerManifest>,
}

#[derive(Debug, Deserialize)]
struct ModuleManifest {
    name: String,
    #[serde(default)]
    controllers: Vec<ControllerManifest>,
}

#[derive(Debug, Deserialize)]
struct ControllerManifest {
    name: String,
    #[serde(default)]
    actions: Vec<ActionManifest>,
}

#[derive(Debug, Deserialize)]
struct ActionManifest {
    name: String,
    #[serde(default = "default_verbs")]
    verbs: Vec<HandlerVerb>,
    #[serde(default)]
    routes: Vec<RouteAttribute>,
    #[serde(default)]
    params: Vec<ParameterDescriptor>,
}

fn default_verbs() -> Vec<HandlerVerb> {
    vec![HandlerVerb::Action]
}

impl ControllerManifest {
    fn into_descriptor(self) -> ControllerDescriptor {
        self.actions
            .into_iter()
            .fold(ControllerDescriptor::new(self.name), |controller, action| {
                let descriptor = ActionDescriptor::new(action.name).with_handlers(action.verbs);
                let descriptor = action
                    .routes
                    .into_iter()
                    .fold(descriptor, ActionDescriptor::with_route);
                let descriptor = action
                    .params
                    .into_iter()
                    .fold(descriptor, ActionDescriptor::with_parameter);
                controller.with_action(descriptor)
            })
    }
}

impl CatalogManifest {
    fn into_catalog(self) -> HandlerCatalog {
        let mut catalog = HandlerCatalog::new();
        for controller in self.controllers {
            catalog = catalog.with_controller(controller.into_descriptor());
        }
        for module in self.modules {
            let descriptor = module
                .controllers
                .into_iter()
                .fold(ModuleDescriptor::new(module.name), |module, controller| {
                    module.with_controller(controller.into_descriptor())
                });
            catalog = catalog.with_module(descriptor);
        }
        for controller in self.internal {
            catalog = catalog.with_internal_controller(controller.into_descriptor());
        }
        catalog
    }
}

/// `im-a-teapot` → `ImATeapotController`
pub fn controller_class_name(name: &str) -> String {
    let mut class_name: String = name
        .split(|c: char| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect();
    class_name.push_str("Controller");
    class_name
}

/// `create-user` + `Post` → `createUserPost`
pub fn action_method_name(action: &str, verb: HandlerVerb) -> String {
    let mut parts = action
        .split(|c: char| c == '-' || c == '_')
        .filter(|part| !part.is_empty());
    let mut method = parts.next().unwrap_or_default().to_string();
    method.extend(parts.map(capitalize));
    method.push_str(verb.suffix());
    method
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
