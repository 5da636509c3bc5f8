//! CLI argument binder
//!
//! Resolves `CLI/[module/]controller/action/token...` to a handler and binds
//! the tokens to the action's declared parameters: `--key=value` tokens bind
//! to flags, every other token fills the next unbound positional parameter.

use crate::args::{ArgValue, Arguments};
use crate::catalog::{HandlerCatalog, ParameterDescriptor, ParameterKind};
use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::matcher::{detect_module, resolve_handler, segment_or_index};
use crate::method::RunAs;
use crate::path::normalize_request_path;
use crate::route::DEFAULT_MODULE;
use crate::state::RouterState;
use tracing::{debug, warn};

pub struct CliBinder<'a> {
    catalog: &'a HandlerCatalog,
    config: &'a RouterConfig,
}

impl<'a> CliBinder<'a> {
    pub fn new(catalog: &'a HandlerCatalog, config: &'a RouterConfig) -> Self {
        Self { catalog, config }
    }

    /// Resolves and binds a CLI token string
    ///
    /// Unlike web matching, a missing controller or action fails right here.
    pub fn bind(&self, input: &str) -> Result<RouterState> {
        let normalized = normalize_request_path(input);
        let all: Vec<&str> = normalized.split('/').collect();
        let mut segments: &[&str] = match all.first() {
            Some(first) if *first == self.config.cli_prefix => &all[1..],
            _ => &all,
        };

        let (module, rest) = detect_module(self.catalog, segments);
        segments = rest;

        let mut state = RouterState::new(module, RunAs::Cli);
        if state.module == DEFAULT_MODULE
            && segments.first() == Some(&self.config.internal_prefix.as_str())
        {
            state.is_internal = true;
            segments = &segments[1..];
        }

        state.controller_name = segment_or_index(segments.first());
        state.action_name = segment_or_index(segments.get(1));
        let tokens: &[&str] = segments.get(2..).unwrap_or_default();

        let controller = if state.is_internal {
            self.catalog.internal_controller(&state.controller_name)
        } else {
            self.catalog.controller(&state.module, &state.controller_name)
        }
        .ok_or_else(|| RouterError::NotFoundController(state.controller_name.clone()))?;

        let action = controller
            .action(&state.action_name)
            .ok_or_else(|| RouterError::NotFoundAction(state.action_name.clone()))?;

        resolve_handler(self.catalog, &mut state);
        if state.action_method.is_none() {
            return Err(RouterError::NotFoundAction(state.action_name.clone()));
        }

        state.arguments = bind_tokens(&action.parameters, tokens);
        debug!(
            controller = %state.controller_name,
            action = %state.action_name,
            arguments = state.arguments.len(),
            "bound CLI arguments"
        );
        Ok(state)
    }
}

/// Binds tokens to declared parameters
///
/// Every declared parameter appears in the result, in declaration order,
/// holding its default (or `Null`) when no token bound it. Unknown flags and
/// surplus positional tokens are ignored.
pub fn bind_tokens(parameters: &[ParameterDescriptor], tokens: &[&str]) -> Arguments {
    let mut args: Arguments = parameters
        .iter()
        .map(|parameter| (parameter.name.clone(), ArgValue::from(parameter.default.clone())))
        .collect();

    let mut positional = parameters
        .iter()
        .filter(|parameter| parameter.kind == ParameterKind::Positional);

    for token in tokens {
        if let Some((key, value)) = token
            .strip_prefix("--")
            .and_then(|flag| flag.split_once('='))
        {
            let declared = parameters
                .iter()
                .any(|parameter| parameter.kind == ParameterKind::Flag && parameter.name == key);
            if declared {
                args.insert(key, value);
            } else {
                warn!(flag = key, "ignoring undeclared CLI flag");
            }
            continue;
        }

        match positional.next() {
            Some(parameter) => args.insert(parameter.name.clone(), *token),
            None => debug!(token = *token, "ignoring surplus positional token"),
        }
    }

    args
}
