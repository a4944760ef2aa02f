//! List rules command implementation.

use eos_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

fn render() -> String {
    let mut out = String::from("Available rules:\n\n");
    out.push_str(&format!("{:<8} {:<16} Description\n", "Code", "Name"));
    out.push_str(&format!("{}\n", "-".repeat(80)));

    for rule in all_rules() {
        out.push_str(&format!(
            "{:<8} {:<16} {}\n",
            rule.code(),
            rule.name(),
            rule.description()
        ));
    }

    out.push_str("\nPresets:\n");
    for (name, preset) in [
        ("recommended", Preset::Recommended),
        ("naming", Preset::Naming),
        ("comments", Preset::Comments),
    ] {
        out.push_str(&format!("  {:<12} - {}\n", name, preset.rule_names().join(", ")));
    }

    out.push_str("\nUse --rules to run specific rules, e.g.:\n");
    out.push_str("  eos-lint check --rules eos_shout,eos_length\n");
    out.push_str("  eos-lint check --rules EOS001,EOS005\n");
    out
}
