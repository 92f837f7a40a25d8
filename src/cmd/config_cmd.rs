//! Configuration introspection command.
//!
//! Provides `fzrank config` subcommands:
//! - show: Display resolved configuration
//! - env: List environment variables
//! - schema: Output JSON schema
//! - init: Create template manifest

use std::fs;
use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{
    self, CONFIG_DIR, ENV_VARS, LoadedConfig, MANIFEST_FILE, template_manifest, user_config_path,
};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show resolved configuration
    Show(ShowArgs),

    /// List environment variables
    Env,

    /// Output JSON schema for manifest validation
    Schema,

    /// Create template manifest file
    Init(InitArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// List the sources that were merged
    #[arg(long)]
    effective: bool,
}

#[derive(Args)]
struct InitArgs {
    /// Directory to create manifest in (default: current directory)
    #[arg(default_value = ".")]
    path: String,

    /// Overwrite existing manifest
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, loaded: &LoadedConfig) -> Result<(), String> {
    match args.command {
        ConfigCommand::Show(show_args) => run_show(loaded, show_args.effective),
        ConfigCommand::Env => run_env(),
        ConfigCommand::Schema => run_schema(),
        ConfigCommand::Init(init_args) => {
            let cwd = std::env::current_dir().map_err(|e| format!("cannot get cwd: {}", e))?;
            run_init(&cwd, init_args)
        }
    }
}

fn run_show(loaded: &LoadedConfig, effective: bool) -> Result<(), String> {
    let yaml = serde_yaml::to_string(&loaded.config)
        .map_err(|e| format!("failed to serialize config: {}", e))?;

    if effective {
        println!("# Resolved configuration");
        println!("# Sources (in order of precedence):");
        for source in &loaded.sources {
            println!("#   - {}", source);
        }
        println!();
    }
    println!("{}", yaml.trim());

    Ok(())
}

fn run_env() -> Result<(), String> {
    println!("Environment Variables:");
    println!();

    for var in ENV_VARS {
        println!("  {}", var.name);
        println!("    {}", var.description);
        if let Some(values) = var.values {
            println!("    Values: {}", values);
        }
        println!("    Default: {}", var.default);
        println!("    Config path: {}", var.config_path);
        println!();
    }

    Ok(())
}

fn run_schema() -> Result<(), String> {
    println!("{}", config::json_schema());
    Ok(())
}

fn run_init(cwd: &Path, args: InitArgs) -> Result<(), String> {
    let target_dir = if args.path == "." {
        cwd.to_path_buf()
    } else {
        cwd.join(&args.path)
    };

    let config_dir = target_dir.join(CONFIG_DIR);
    let manifest_path = config_dir.join(MANIFEST_FILE);

    if manifest_path.exists() && !args.force {
        return Err(format!(
            "manifest already exists: {}\nUse --force to overwrite",
            manifest_path.display()
        ));
    }

    fs::create_dir_all(&config_dir)
        .map_err(|e| format!("failed to create {}: {}", config_dir.display(), e))?;

    fs::write(&manifest_path, template_manifest())
        .map_err(|e| format!("failed to write {}: {}", manifest_path.display(), e))?;

    println!("Created: {}", manifest_path.display());

    if let Some(user_path) = user_config_path()
        && !user_path.exists()
    {
        println!(
            "Hint: User global config can be placed at: {}",
            user_path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("fzrank-init-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let args = || InitArgs {
            path: ".".to_string(),
            force: false,
        };
        run_init(&dir, args()).unwrap();
        let manifest = dir.join(CONFIG_DIR).join(MANIFEST_FILE);
        assert!(manifest.is_file());

        let err = run_init(&dir, args()).unwrap_err();
        assert!(err.contains("already exists"));

        run_init(
            &dir,
            InitArgs {
                path: ".".to_string(),
                force: true,
            },
        )
        .unwrap();

        fs::remove_dir_all(&dir).unwrap();
    }
}
