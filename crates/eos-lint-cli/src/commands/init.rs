//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# eos-lint configuration

# Rule preset: "recommended" (all rules), "naming" or "comments"
preset = "recommended"

[analyzer]
# Root module directory (default: current directory)
# root = "./infra"

# Glob patterns of module directories to skip
exclude = ["**/.terraform/**"]

# Treat every directory containing .tf files as a root module
recursive = false

# Follow module calls with a local source ("local") or not at all ("none")
call_module_type = "local"

# Respect .gitignore files during recursive discovery
respect_gitignore = true

# Rule configurations
# Every rule accepts `enabled` and `level` ("notice", "warning" or "error")

[rules.eos_type_echo]
enabled = true
# [rules.eos_type_echo.synonyms]
# instance = ["server", "vm"]

[rules.eos_hungarian]
enabled = true
# more = ["lst"]

[rules.eos_shout]
enabled = true

[rules.eos_length]
enabled = true
length = 16

[rules.eos_reminder]
enabled = true
# tags = ["BUG", "FIXME", "HACK", "TODO"]

[rules.eos_comments]
enabled = true
block = true
jammed = true
column = 80
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("eos-lint.toml");
    write_config(config_path, force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit eos-lint.toml to configure rules");
    println!("  2. Run: eos-lint check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
