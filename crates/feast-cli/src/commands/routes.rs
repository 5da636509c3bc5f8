use super::Project;
use anyhow::Result;
use colored::Colorize;
use feast_router::{HttpMethod, RouteRegistry, DEFAULT_MODULE};

pub fn execute(project: &Project, method: Option<HttpMethod>) -> Result<()> {
    let router = project.router()?;
    print_routes(router.registry(), method);
    Ok(())
}

/// Prints routes grouped by method, in registration order
pub fn print_routes(registry: &RouteRegistry, method: Option<HttpMethod>) {
    if registry.is_empty() {
        println!("{}", "No routes registered".yellow());
        return;
    }

    let methods: Vec<HttpMethod> = match method {
        Some(method) => vec![method],
        None => HttpMethod::ALL.to_vec(),
    };

    for method in methods {
        let routes = registry.routes(method);
        if routes.is_empty() {
            continue;
        }

        println!("{}", method.as_str().green().bold());
        for route in routes {
            let target = if route.module == DEFAULT_MODULE {
                format!("{}/{}", route.controller, route.action)
            } else {
                format!("{}:{}/{}", route.module, route.controller, route.action)
            };
            println!(
                "  {:<24} /{:<36} {}",
                route.route_name.cyan(),
                route.raw_template.trim_start_matches('/'),
                target.dimmed()
            );
        }
        println!();
    }

    println!("{} routes", registry.len());
}
