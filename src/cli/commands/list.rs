//! List command - show binaries and their local dependencies

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::scan::{discover, output_format};
use crate::config::Config;
use crate::discover::Discovery;
use crate::error::BinscopeResult;
use crate::resolve::Binary;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> BinscopeResult<()> {
    let format = output_format(args.format, config)?;
    let discovery = discover(&args.scan, config, format).await?;

    match format {
        OutputFormat::Table => print_table(&discovery),
        OutputFormat::Json => print_json(&discovery)?,
        OutputFormat::Plain => print_plain(&discovery.binaries),
    }

    Ok(())
}

fn print_table(discovery: &Discovery) {
    let ctx = UiContext::detect();

    if discovery.binaries.is_empty() {
        ui::step_info(&ctx, "No binaries found");
    } else {
        ui::intro(&ctx, "Binaries");

        println!(
            "{:<20} {:<50} {:>5}",
            style("NAME").bold(),
            style("ENTRY").bold(),
            style("DEPS").bold()
        );
        println!("{}", "-".repeat(77));

        for binary in &discovery.binaries {
            println!(
                "{:<20} {:<50} {:>5}",
                binary.name,
                binary.entry_file.display().to_string(),
                binary.dependencies.len()
            );
            for dep in &binary.dependencies {
                println!("    {}", style(&dep.import).dim());
            }
        }

        println!();
        println!("{} binary(s)", discovery.binaries.len());
    }

    for skipped in &discovery.skipped {
        ui::step_warn_hint(
            &ctx,
            &format!("Skipped {}", skipped.path.display()),
            &skipped.reason,
        );
    }
}

fn print_json(discovery: &Discovery) -> BinscopeResult<()> {
    let json = serde_json::to_string_pretty(discovery)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(binaries: &[Binary]) {
    for binary in binaries {
        println!("{}", binary.name);
        for dep in &binary.dependencies {
            println!("  {}", dep.import);
        }
    }
}
