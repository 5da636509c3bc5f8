//! Router state
//!
//! The outcome of matching one request. A `RouterState` is a plain value owned
//! by the dispatch loop, so repeated or concurrent dispatches never share it.

use crate::args::Arguments;
use crate::error::{Result, RouterError};
use crate::method::{HttpMethod, RunAs};
use serde::Serialize;

/// Where the route table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutesSource {
    Scanned,
    Cached,
}

/// Lifecycle of routing
///
/// `Uninitialized` and `RoutesReady` describe the router, `RouteMatched` and
/// `Forwarded` a dispatched `RouterState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouterPhase {
    Uninitialized,
    RoutesReady(RoutesSource),
    RouteMatched,
    Forwarded,
}

/// The resolved target of a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterState {
    pub module: String,
    pub controller_name: String,
    pub action_name: String,
    /// `<Name>Controller`, or `None` when no such controller exists
    pub controller_class: Option<String>,
    /// Resolved handler method, or `None` when no such method exists
    pub action_method: Option<String>,
    /// Matched named route; empty for convention-resolved requests
    pub route_name: String,
    pub arguments: Arguments,
    pub query: Arguments,
    pub http_method: HttpMethod,
    pub run_as: RunAs,
    /// Framework-owned controller reached through the internal prefix
    pub is_internal: bool,
    pub forwarded: bool,
    /// Number of times this request has been forwarded
    pub forward_count: usize,
}

impl RouterState {
    pub fn new(module: impl Into<String>, run_as: RunAs) -> Self {
        Self {
            module: module.into(),
            controller_name: "index".to_string(),
            action_name: "index".to_string(),
            controller_class: None,
            action_method: None,
            route_name: String::new(),
            arguments: Arguments::new(),
            query: Arguments::new(),
            http_method: HttpMethod::Get,
            run_as,
            is_internal: false,
            forwarded: false,
            forward_count: 0,
        }
    }

    pub fn phase(&self) -> RouterPhase {
        if self.forwarded {
            RouterPhase::Forwarded
        } else {
            RouterPhase::RouteMatched
        }
    }

    /// Requests (or cancels) a re-dispatch
    pub fn forward(&mut self, forwarded: bool) {
        self.forwarded = forwarded;
    }

    /// Resolved handler method name
    ///
    /// Convention routing does not validate its target; a missing controller
    /// or action surfaces here, when the dispatch loop asks for the method.
    pub fn action_method_name(&self) -> Result<&str> {
        match (&self.controller_class, &self.action_method) {
            (Some(_), Some(method)) => Ok(method.as_str()),
            _ => Err(RouterError::NotFound404 {
                controller: self.controller_name.clone(),
                action: self.action_name.clone(),
            }),
        }
    }

    /// Resolved controller class name, same laziness as `action_method_name`
    pub fn controller_class_name(&self) -> Result<&str> {
        self.controller_class
            .as_deref()
            .ok_or_else(|| RouterError::NotFound404 {
                controller: self.controller_name.clone(),
                action: self.action_name.clone(),
            })
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get_str(name)
    }
}
