use super::routes::print_routes;
use super::Project;
use crate::CacheCommands;
use anyhow::{Context, Result};
use colored::Colorize;
use feast_router::{RouteRegistry, Router, SnapshotStore};

pub fn execute(project: &Project, command: CacheCommands) -> Result<()> {
    let store = project.store();

    match command {
        CacheCommands::Build => {
            println!("{}", "Building route cache...".green().bold());

            let mut router = Router::new(project.catalog.clone(), project.config.clone());
            router.write_cache(&store)?;

            println!(
                "Wrote {} routes to {}",
                router.registry().len(),
                store.path().display().to_string().cyan()
            );
            if !project.config.use_route_cache {
                println!(
                    "{}",
                    "⚠ use_route_cache is off; the router will keep scanning the manifest".yellow()
                );
            }
        }
        CacheCommands::Show => match store.read()? {
            Some(bytes) => {
                let registry = RouteRegistry::load(&bytes)
                    .with_context(|| format!("Failed to decode route cache: {:?}", store.path()))?;
                println!("Route cache: {}", store.path().display().to_string().cyan());
                println!();
                print_routes(&registry, None);
            }
            None => {
                println!(
                    "{} {}",
                    "No route cache at".yellow(),
                    store.path().display()
                );
            }
        },
        CacheCommands::Clear => {
            store.clear()?;
            println!("{}", "Route cache cleared".green().bold());
        }
    }

    Ok(())
}
