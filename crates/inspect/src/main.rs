mod asset;
mod cli;
mod logger;
mod report;
mod script;
mod simulate;

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use awsm_avatar::{
    catalog::AssetCatalog, config::AvatarConfig, debug::AvatarLogging, AvatarEngine, LoadOutcome,
};
use clap::Parser;

use asset::LoadedAsset;
use cli::{Cli, Commands};
use report::CatalogReport;
use script::Script;

fn main() -> Result<()> {
    logger::init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { asset } => {
            let asset = LoadedAsset::open(&asset)?;
            let catalog = AssetCatalog::scan(&asset).context("scanning asset")?;
            let report = CatalogReport::new(&catalog, AvatarConfig::default().model.fit_size);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Simulate {
            asset,
            script,
            config,
            fps,
        } => {
            run_simulation(&asset, &script, config.as_deref(), fps)?;
        }
    }

    Ok(())
}

fn run_simulation(asset: &Path, script: &Path, config: Option<&Path>, fps: f64) -> Result<()> {
    if !(fps > 0.0 && fps.is_finite()) {
        anyhow::bail!("fps must be positive, got {fps}");
    }

    let config = match config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<AvatarConfig>(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => AvatarConfig::default(),
    };

    let script = {
        let json = std::fs::read_to_string(script)
            .with_context(|| format!("reading {}", script.display()))?;
        Script::parse(&json).with_context(|| format!("parsing {}", script.display()))?
    };

    let logging = AvatarLogging {
        frame_timings: false,
        resolution_misses: true,
    };
    let mut engine = AvatarEngine::new_with_logging(config, logging)?;

    let asset = LoadedAsset::open(asset)?;
    if let LoadOutcome::Recovered { error, .. } = engine.load_asset(&asset) {
        tracing::warn!("continuing without the asset: {error}");
    }

    let records = simulate::simulate(&mut engine, &script, fps);

    let mut out = BufWriter::new(std::io::stdout().lock());
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}
