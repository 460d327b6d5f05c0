use anyhow::{anyhow, Context, Result};
use carsales::{
    config::PrepareConfig,
    export::write_parquet,
    process::{self, PrepareReport},
    view::{self, BoundedView, ModelPrice},
};
use serde::Serialize;
use std::{env, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: carsales <LISTINGS_CSV> [--config <YAML>] [--out <PARQUET>]";

struct Args {
    csv: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut csv = None;
        let mut config = None;
        let mut out = None;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    config = Some(args.next().ok_or_else(|| anyhow!("--config needs a path"))?)
                }
                "--out" => out = Some(args.next().ok_or_else(|| anyhow!("--out needs a path"))?),
                _ if csv.is_none() => csv = Some(arg.clone()),
                other => return Err(anyhow!("unexpected argument `{}`\n{}", other, USAGE)),
            }
        }

        Ok(Self {
            csv: csv.ok_or_else(|| anyhow!(USAGE))?.into(),
            config: config.map(PathBuf::from),
            out: out.map(PathBuf::from),
        })
    }
}

/// What the presentation layer needs to know about one run.
#[derive(Serialize)]
struct RunSummary<'a> {
    report: &'a PrepareReport,
    models: usize,
    bounded_rows: usize,
    bounded_max_model_year: Option<f64>,
    top_models: Vec<ModelPrice>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) args + config ────────────────────────────────────────────
    let args = Args::parse()?;
    let config = match &args.config {
        Some(path) => PrepareConfig::load(path)?,
        None => PrepareConfig::default(),
    };
    info!(?config, "startup");

    // ─── 3) load + prepare ───────────────────────────────────────────
    // zero-year rows still count towards the model ranking, so the drop
    // runs after the ranking is taken
    let mut table = process::load_vehicles_csv(&args.csv)?;
    let keep_zero_years = PrepareConfig {
        drop_zero_model_year: false,
        ..config.clone()
    };
    let mut report = process::prepare(&mut table, &keep_zero_years)
        .with_context(|| format!("preparing {}", args.csv.display()))?;
    let top_models = view::top_models(&table, config.top_models);
    if config.drop_zero_model_year {
        report.zero_year_dropped = process::drop_zero_model_year(&mut table);
        report.rows_out = table.len();
        info!(dropped = report.zero_year_dropped, "zero model_year rows removed");
    }
    if report.model_year.residual + report.cylinders.residual + report.odometer.residual > 0 {
        warn!(
            model_year = report.model_year.residual,
            cylinders = report.cylinders.residual,
            odometer = report.odometer.residual,
            "values left missing: their whole group had none"
        );
    }

    // ─── 4) presentation views ───────────────────────────────────────
    let bounded = BoundedView::new(&table, config.view);
    let summary = RunSummary {
        report: &report,
        models: view::distinct_models(&table).len(),
        bounded_rows: bounded.len(),
        bounded_max_model_year: bounded.max_model_year(),
        top_models,
    };

    // ─── 5) optional parquet hand-off ────────────────────────────────
    if let Some(out) = &args.out {
        let batch = process::to_record_batch(&table)?;
        write_parquet(&batch, out)?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
