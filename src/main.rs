//! polymet-replay: apply a JSON script of dashboard input and print the
//! resulting scene and statistics.
//!
//! ```text
//! polymet-replay [--config PATH] SCRIPT.json
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use polymet::{
        Dashboard, DashboardConfig, DashboardStats, Legend, LogLevel, Message, PolygonSummary,
        ScriptStep, SyntheticSamples,
    };
    use polymet_ui::{RangeLabels, Scene};
    use serde::Serialize;

    const USAGE: &str = "Usage: polymet-replay [--config PATH] SCRIPT.json";

    #[derive(Debug, thiserror::Error)]
    pub enum ReplayError {
        #[error("{0}")]
        Usage(String),
        #[error("Failed to read {path:?}: {source}")]
        Read {
            path: PathBuf,
            source: std::io::Error,
        },
        #[error("Invalid script: {0}")]
        Script(#[from] serde_json::Error),
        #[error(transparent)]
        Config(#[from] polymet::ConfigError),
    }

    struct Args {
        config: Option<PathBuf>,
        script: PathBuf,
    }

    fn parse_args() -> Result<Args, ReplayError> {
        let mut config = None;
        let mut script = None;
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or_else(|| {
                        ReplayError::Usage("--config requires a path".to_string())
                    })?;
                    config = Some(PathBuf::from(path));
                }
                "-h" | "--help" => return Err(ReplayError::Usage(USAGE.to_string())),
                _ if script.is_none() => script = Some(PathBuf::from(&arg)),
                _ => {
                    return Err(ReplayError::Usage(format!(
                        "Unexpected argument '{}'\n{}",
                        arg, USAGE
                    )));
                }
            }
        }

        let script = script.ok_or_else(|| ReplayError::Usage(USAGE.to_string()))?;
        Ok(Args { config, script })
    }

    #[derive(Serialize)]
    struct Report {
        scene: Scene,
        range: RangeLabels,
        stats: DashboardStats,
        polygons: Vec<PolygonSummary>,
        legend: Option<Legend>,
    }

    /// Level to apply once the config is known. `RUST_LOG` wins when set.
    fn configured_max_level(configured: LogLevel, env_override: bool) -> Option<log::LevelFilter> {
        (!env_override).then(|| configured.to_level_filter())
    }

    pub fn run() -> Result<(), ReplayError> {
        // Everything until the config is loaded, narrowed below
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Trace)
            .parse_default_env()
            .init();

        let args = parse_args()?;

        let config = match &args.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::load_from_default_path().unwrap_or_default(),
        };

        let env_override = std::env::var_os("RUST_LOG").is_some();
        if let Some(level) = configured_max_level(config.preferences.log_level, env_override) {
            log::set_max_level(level);
        }

        let json = std::fs::read_to_string(&args.script).map_err(|source| ReplayError::Read {
            path: args.script.clone(),
            source,
        })?;
        let steps: Vec<ScriptStep> = serde_json::from_str(&json)?;
        log::info!("Replaying {} step(s) from {:?}", steps.len(), args.script);

        let mut source = match config.samples.seed {
            Some(seed) => SyntheticSamples::seeded(seed),
            None => SyntheticSamples::from_entropy(),
        };
        let mut dashboard = Dashboard::from_config(config)?;
        for step in steps {
            dashboard.update(Message::from(step));
            dashboard.pump(&mut source);
        }

        let report = Report {
            scene: dashboard.scene(),
            range: dashboard.range_labels(),
            stats: dashboard.stats(),
            polygons: dashboard.polygon_summaries(),
            legend: dashboard.legend(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

}
