use super::Project;
use anyhow::Result;
use feast_router::{ArgValue, Arguments, HttpMethod, PathRequest};

pub fn execute(project: &Project, request: &PathRequest) -> Result<()> {
    let router = project.router()?;
    println!("{}", router.get_path(None, request)?);
    Ok(())
}

/// Parses a `name=value` command line pair
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("missing name in '{}'", raw)),
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected name=value, got '{}'", raw)),
    }
}

pub fn build_request(
    route: Option<String>,
    module: Option<String>,
    controller: Option<String>,
    action: Option<String>,
    method: Option<HttpMethod>,
    args: Vec<(String, String)>,
    query: Vec<(String, String)>,
) -> PathRequest {
    PathRequest {
        route_name: route,
        module,
        controller,
        action,
        arguments: collect_pairs(args),
        query: collect_pairs(query),
        http_method: method,
    }
}

/// Repeated names collect into a list value
fn collect_pairs(pairs: Vec<(String, String)>) -> Arguments {
    let mut arguments = Arguments::new();
    for (name, value) in pairs {
        let merged = match arguments.get(&name) {
            Some(existing) => {
                let mut values: Vec<String> =
                    existing.values().into_iter().map(str::to_string).collect();
                values.push(value);
                ArgValue::Many(values)
            }
            None => ArgValue::Single(value),
        };
        arguments.insert(name, merged);
    }
    arguments
}
