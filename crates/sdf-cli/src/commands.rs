//! Command handlers for CLI subcommands.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sdf_core::{ProjectWorkspace, SdfConfig};
use sdf_kpi::{load_definition, KpiSummary, Project};
use sdf_models::{KpiId, Value};
use sdf_table::{load_schema, Tracker};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{Commands, OutputFormat};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Outcome of evaluating a project's KPIs.
#[derive(Debug, Default, Serialize)]
pub struct EvaluationReport {
    pub summaries: Vec<KpiSummary>,
    pub failures: Vec<EvaluationFailure>,
}

/// A KPI whose evaluation returned an error.
#[derive(Debug, Serialize)]
pub struct EvaluationFailure {
    pub identifier: KpiId,
    pub error: String,
}

/// Execute a CLI command.
pub fn execute(command: Commands, config: &SdfConfig) -> Result<()> {
    match command {
        Commands::Evaluate {
            definition,
            kpi,
            format,
        } => cmd_evaluate(&definition, kpi.as_deref(), format),
        Commands::TrackerInit {
            name,
            schema,
            rows,
            project,
            index,
        } => cmd_tracker_init(
            config,
            &name,
            &schema,
            rows.as_deref(),
            &project,
            index.as_deref(),
        ),
    }
}

fn cmd_evaluate(definition: &Path, only: Option<&str>, format: OutputFormat) -> Result<()> {
    let mut project = load_definition(definition)?.into_project()?;
    if let Some(id) = only {
        if !project.contains(id) {
            return Err(format!("Unknown KPI: {}", id).into());
        }
    }

    let report = evaluate_project(&mut project, only);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "Project at {} ({}), {} KPI(s)",
                project.phase(),
                project.development_type(),
                project.len()
            );
            for summary in &report.summaries {
                println!("\n{}", summary);
            }
            for failure in &report.failures {
                println!("\nKPI {} could not be evaluated: {}", failure.identifier, failure.error);
            }
        }
    }
    Ok(())
}

/// Evaluates every KPI (or just `only`), collecting per-KPI failures
/// instead of stopping at the first one.
pub fn evaluate_project(project: &mut Project, only: Option<&str>) -> EvaluationReport {
    let ids: Vec<KpiId> = project
        .kpi_ids()
        .filter(|id| only.map_or(true, |only| id.as_str() == only))
        .cloned()
        .collect();

    let mut report = EvaluationReport::default();
    for id in ids {
        match project.summary(id.as_str()) {
            Ok(Some(summary)) => report.summaries.push(summary),
            Ok(None) => {}
            Err(e) => {
                warn!(kpi = %id, error = %e, "KPI evaluation failed");
                report.failures.push(EvaluationFailure {
                    identifier: id,
                    error: e.to_string(),
                });
            }
        }
    }
    report
}

fn cmd_tracker_init(
    config: &SdfConfig,
    name: &str,
    schema: &Path,
    rows: Option<&Path>,
    project: &str,
    index: Option<&str>,
) -> Result<()> {
    let columns = load_schema(schema)?;
    config.ensure_projects_dir()?;
    let workspace = ProjectWorkspace::open_or_init(config, project)?;
    let mut tracker = workspace.add_tracker(name, columns, index)?;

    if let Some(rows) = rows {
        let entries = load_rows(&tracker, rows)?;
        let inserted = tracker.add_rows(&entries)?;
        info!(tracker = %tracker.tag(), inserted, offered = entries.len(), "Rows loaded");
        println!("Added {} of {} row(s)", inserted, entries.len());
    }

    let saved = tracker.save()?;
    println!("Tracker '{}' created in {}", tracker.name(), tracker.dir().display());
    println!("  data:       {}", saved.data.display());
    if let Some(validation) = saved.validation {
        println!("  validation: {}", validation.display());
    }
    Ok(())
}

/// Reads a JSON array of `{tag: value}` objects, typing each value by its
/// column's kind.
///
/// Values that do not fit their column's kind are dropped with a warning.
/// Unknown tags are passed through so the tracker can report them.
pub fn load_rows(tracker: &Tracker, path: &Path) -> Result<Vec<HashMap<String, Value>>> {
    let text = fs::read_to_string(path)?;
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&text)?;

    let rows = objects
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .filter_map(|(tag, json)| {
                    let Some(column) = tracker.column(&tag) else {
                        return Some((tag, Value::Null));
                    };
                    match Value::from_json(column.kind(), &json) {
                        Some(value) => Some((tag, value)),
                        None => {
                            warn!(column = %tag, value = %json, kind = %column.kind(), "Value does not fit column kind");
                            None
                        }
                    }
                })
                .collect()
        })
        .collect();
    Ok(rows)
}
