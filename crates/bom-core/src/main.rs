//! `bom` - boundary BOM roll-up from the command line

use anyhow::{Context, Result};
use bom_aggregate::{BoundarySlot, StaticSelection};
use bom_core::{BomConfig, BomPipeline, BomRun, ExportOutcome};
use bom_query::{InMemoryFeatureService, LayerKey, Snapshot};
use bom_report::ExportRequest;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML config file (defaults to $BOM_CONFIG)");

    Command::new("bom")
        .version(bom_core::VERSION)
        .about("Per-boundary bill-of-materials roll-up")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("run")
                .about("Aggregate one boundary and derive its metrics")
                .arg(
                    Arg::new("boundary")
                        .long("boundary")
                        .default_value("")
                        .help("Boundary identifier (blank uses the selection)"),
                )
                .arg(
                    Arg::new("snapshot")
                        .long("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Feature snapshot JSON"),
                )
                .arg(
                    Arg::new("selected")
                        .long("selected")
                        .action(ArgAction::Append)
                        .help("Boundary selected on the map (overrides the snapshot selection)"),
                )
                .arg(config.clone())
                .arg(
                    Arg::new("export")
                        .long("export")
                        .action(ArgAction::SetTrue)
                        .help("Write the report"),
                )
                .arg(
                    Arg::new("construction-rate")
                        .long("construction-rate")
                        .help("Construction vendor rate"),
                )
                .arg(
                    Arg::new("design-rate")
                        .long("design-rate")
                        .help("Design vendor rate"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output workbook path"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print metrics as JSON"),
                ),
        )
        .subcommand(
            Command::new("layers")
                .about("Print the layer catalog")
                .arg(config),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &ArgMatches) -> Result<BomConfig> {
    let path = args.get_one::<PathBuf>("config");
    BomConfig::load(path.map(PathBuf::as_path)).context("failed to load configuration")
}

async fn run(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let snapshot_path = args
        .get_one::<PathBuf>("snapshot")
        .context("--snapshot is required")?;
    let snapshot = Snapshot::from_file(snapshot_path)
        .with_context(|| format!("failed to load snapshot {}", snapshot_path.display()))?;
    let service = InMemoryFeatureService::from_snapshot(&snapshot);

    let selected: Vec<String> = args
        .get_many::<String>("selected")
        .map(|ids| ids.cloned().collect())
        .unwrap_or_else(|| snapshot.selection.clone());
    let selection = StaticSelection::new(selected);

    let export = ExportRequest {
        enabled: args.get_flag("export"),
        construction_rate: args.get_one::<String>("construction-rate").cloned(),
        design_rate: args.get_one::<String>("design-rate").cloned(),
        output: args.get_one::<PathBuf>("output").cloned(),
    };

    let mut slot = BoundarySlot::new(
        args.get_one::<String>("boundary")
            .cloned()
            .unwrap_or_default(),
    );
    let pipeline = BomPipeline::new(config, &service);
    let run = pipeline
        .run(&mut slot, &selection, &export)
        .await
        .context("BOM run failed")?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&run_json(&run))?);
    } else {
        print_run(&run);
    }
    Ok(())
}

fn run_json(run: &BomRun) -> serde_json::Value {
    let export = match &run.export {
        ExportOutcome::Skipped(reason) => serde_json::json!({ "skipped": reason.to_string() }),
        ExportOutcome::Written(summary) => serde_json::json!({
            "saved_to": summary.saved_to,
            "cells_written": summary.cells_written,
            "skipped_metrics": summary.skipped,
        }),
    };
    serde_json::json!({
        "run_id": run.run_id.to_string(),
        "boundary": run.boundary.id().as_str(),
        "metrics": run.metrics.to_json(),
        "advisories": run.metrics.advisories(),
        "export": export,
    })
}

fn print_run(run: &BomRun) {
    println!("BOM roll-up for {} (run {})", run.boundary.id(), run.run_id);
    println!();
    for (key, value) in run.metrics.iter() {
        println!("  {:<36} {value}", key.as_str());
    }
    if !run.metrics.advisories().is_empty() {
        println!();
        println!("Advisories:");
        for advisory in run.metrics.advisories() {
            println!("  - {advisory}");
        }
    }
    println!();
    match &run.export {
        ExportOutcome::Skipped(reason) => println!("Report: not written ({reason})"),
        ExportOutcome::Written(summary) => println!(
            "Report: {} ({} cells)",
            summary.saved_to.display(),
            summary.cells_written
        ),
    }
}

fn layers(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    for key in LayerKey::ALL {
        println!("{:<20} {}", key.name(), config.layers.get(key));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let result = match matches.subcommand() {
        Some(("run", args)) => run(args).await,
        Some(("layers", args)) => layers(args),
        _ => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "fatal");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn run_arguments() {
        let matches = cli()
            .try_get_matches_from([
                "bom",
                "run",
                "--snapshot",
                "f.json",
                "--selected",
                "A",
                "--selected",
                "B",
                "--export",
                "--log-json",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        assert!(args.get_flag("export"));
        assert_eq!(args.get_one::<String>("boundary").map(String::as_str), Some(""));
        assert_eq!(args.get_many::<String>("selected").unwrap().count(), 2);
        assert!(matches.get_flag("log-json"));
    }

    #[test]
    fn snapshot_is_required() {
        assert!(cli().try_get_matches_from(["bom", "run"]).is_err());
    }
}
