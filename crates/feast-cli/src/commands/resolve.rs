use super::Project;
use anyhow::Result;
use colored::Colorize;
use feast_router::{HttpMethod, RouterState};

pub fn execute_match(project: &Project, path: &str, method: HttpMethod, json: bool) -> Result<()> {
    let router = project.router()?;
    let state = router.match_request(path, method);
    print_state(&state, json)
}

pub fn execute_cli(project: &Project, tokens: &[String], json: bool) -> Result<()> {
    let router = project.router()?;
    let input = cli_input(&project.config.cli_prefix, tokens);
    let state = router.bind_cli(&input)?;
    print_state(&state, json)
}

/// Joins tokens into `CLI/...` input, adding the prefix when it is missing
pub fn cli_input(prefix: &str, tokens: &[String]) -> String {
    let joined = tokens.join("/");
    if tokens.first().map(String::as_str) == Some(prefix) {
        joined
    } else {
        format!("{}/{}", prefix, joined)
    }
}

fn print_state(state: &RouterState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    println!("Module:     {}", state.module.cyan());
    println!("Controller: {}", state.controller_name.cyan());
    println!("Action:     {}", state.action_name.cyan());
    if !state.route_name.is_empty() {
        println!("Route:      {}", state.route_name.cyan());
    }
    if state.is_internal {
        println!("Internal:   {}", "yes".cyan());
    }

    match (state.controller_class_name(), state.action_method_name()) {
        (Ok(class), Ok(method)) => {
            println!("Handler:    {}", format!("{}::{}", class, method).green().bold())
        }
        (_, Err(err)) | (Err(err), _) => println!("Handler:    {}", err.to_string().red()),
    }

    print_arguments("Arguments", state.arguments.iter());
    print_arguments("Query", state.query.iter());
    Ok(())
}

fn print_arguments<'a>(
    title: &str,
    arguments: impl Iterator<Item = (&'a str, &'a feast_router::ArgValue)>,
) {
    let mut arguments = arguments.peekable();
    if arguments.peek().is_none() {
        return;
    }

    println!();
    println!("{}", title.bold());
    for (name, value) in arguments {
        let value = if value.is_null() {
            "null".dimmed().to_string()
        } else {
            value.to_string()
        };
        println!("  {} = {}", name, value);
    }
}
