//! Handler for `tether update`.
//!
//! Reports what would change. Nothing is copied or installed.

use miette::Result;

use tether_core::config::GlobalConfig;
use tether_resolver::environment::Environment;
use tether_resolver::repository::PackageRepository;
use tether_resolver::resolver::try_resolve_dependencies;
use tether_resolver::update::scan_for_updates;
use tether_util::progress;

pub fn exec(system: bool) -> Result<()> {
    let config = GlobalConfig::load()?;
    if system {
        update_system(&config)
    } else {
        update_project(&config)
    }
}

fn update_system(config: &GlobalConfig) -> Result<()> {
    let env = Environment::load(None, config)?;
    progress::status("Scanning", &format!("system repository ({} packages)", env.system.len()));

    let updates = scan_for_updates(&env.system, &env.remotes());
    if updates.is_empty() {
        println!("All system packages are up to date.");
    }
    for update in &updates {
        println!("{update}");
    }
    Ok(())
}

fn update_project(config: &GlobalConfig) -> Result<()> {
    let project = super::current_project(config)?;
    let env = Environment::load(Some(&project.dir), config)?;

    progress::status("Updating", &project.descriptor.name);
    let result = try_resolve_dependencies(&project.descriptor, &env.update_order());

    for entry in &result.entries {
        let Some(package) = &entry.package else {
            progress::status_warn("Missing", &entry.requirement.to_string());
            continue;
        };
        let installed = env.project.as_ref().is_some_and(|p| {
            p.packages_named(&package.name)
                .iter()
                .any(|p| p.version == package.version)
        });
        if installed {
            println!("{package} (up to date)");
        } else {
            println!("{package} ({})", package.source);
        }
    }
    if !result.success {
        progress::status_warn("Conflicts", &result.conflicts().to_string());
    }
    Ok(())
}
