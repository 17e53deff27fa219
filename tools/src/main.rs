//! snapshot-tool: headless driver for forest landscape snapshots.
//!
//! Usage:
//!   snapshot-tool save       --data-dir ./data --db snap.db [--seed 42]
//!   snapshot-tool load       --data-dir ./data --db snap.db
//!   snapshot-tool inspect    --db snap.db
//!   snapshot-tool save-stand --data-dir ./data --db stands.db --stand 1 [--seed 42]
//!   snapshot-tool load-stand --data-dir ./data --db stands.db --stand 1 [--seed 42]

use anyhow::{bail, Context, Result};
use forest_snapshot_core::{
    config::SnapshotConfig,
    demo::{self, DemoDensity},
    landscape::Landscape,
    raster::AsciiRaster,
    report::LoadReport,
    snapshot,
    stand_snapshot,
    store::{SnapshotStore, LANDSCAPE_TABLES, STAND_TABLES},
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        bail!("usage: snapshot-tool <save|load|inspect|save-stand|load-stand> [--flag value ...]");
    };
    let seed = parse_arg(&args, "--seed", 42u64);
    let stand = parse_arg(&args, "--stand", 1i32);
    let db = flag_value(&args, "--db").unwrap_or("snapshot.db");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let db = Path::new(db);

    println!("forest snapshot-tool");
    println!("  command:   {command}");
    println!("  db:        {}", db.display());
    println!("  data_dir:  {data_dir}");
    println!();

    match command {
        "save" => {
            let config = SnapshotConfig::load(data_dir)?;
            let mut landscape = Landscape::from_config(&config);
            demo::populate(&mut landscape, seed, DemoDensity::default());
            let report = snapshot::save(&landscape, db, &config.settings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "load" => {
            let config = SnapshotConfig::load(data_dir)?;
            let mut landscape = Landscape::from_config(&config);
            let report = snapshot::load(&mut landscape, db, &config.settings)
                .with_context(|| format!("loading {}", db.display()))?;
            print_load_summary(&landscape, &report)?;
        }
        "inspect" => inspect(db)?,
        "save-stand" => {
            let config = SnapshotConfig::load(data_dir)?;
            let mut landscape = Landscape::from_config(&config);
            demo::populate(&mut landscape, seed, DemoDensity::default());
            let stands = demo::unit_stands(&landscape);
            let report = stand_snapshot::save_stand(&landscape, &stands, stand, db, &config.settings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "load-stand" => {
            let config = SnapshotConfig::load(data_dir)?;
            let mut landscape = Landscape::from_config(&config);
            demo::populate(&mut landscape, seed, DemoDensity::default());
            let stands = demo::unit_stands(&landscape);
            let report = stand_snapshot::load_stand(&mut landscape, &stands, stand, db, &config.settings)
                .with_context(|| format!("loading stand {stand} from {}", db.display()))?;
            print_load_summary(&landscape, &report)?;
        }
        other => bail!("unknown command '{other}'"),
    }

    log::info!("snapshot-tool: {command} finished");
    Ok(())
}

fn print_load_summary(landscape: &Landscape, report: &LoadReport) -> Result<()> {
    let extent = landscape.extent();
    let species: Vec<&str> = landscape.species.iter().map(|s| s.id.as_str()).collect();
    println!("=== LANDSCAPE ===");
    println!("  extent:    {} x {} m", extent.width(), extent.height());
    println!("  species:   {}", species.join(", "));
    println!();
    println!("=== LOAD REPORT ===");
    println!("{}", serde_json::to_string_pretty(report)?);
    println!();
    println!("=== RESOURCE UNITS ===");
    println!(
        "  {:>6} {:>7} {:>9} {:>9} {:>9} {:>9} {:>10} {:>9}",
        "index", "stems", "BA m2", "dbh cm", "height m", "saplings", "soil C", "snag C"
    );
    for ru in &landscape.resource_units {
        let s = &ru.statistics;
        let soil_c = ru.soil.as_ref().map_or(0.0, |soil| soil.total_carbon());
        let snag_c = ru.snags.as_ref().map_or(0.0, |snags| snags.total_carbon());
        println!(
            "  {:>6} {:>7} {:>9.2} {:>9.1} {:>9.1} {:>9} {:>10.0} {:>9.0}",
            ru.index, s.stems, s.basal_area, s.mean_dbh, s.mean_height, s.saplings, soil_c, snag_c
        );
    }
    Ok(())
}

fn inspect(db: &Path) -> Result<()> {
    let store = SnapshotStore::open_read_only(db)?;
    println!("=== TABLES ===");
    for table in LANDSCAPE_TABLES.iter().chain(STAND_TABLES.iter()) {
        match store.row_count(table)? {
            Some(n) => println!("  {table:<16} {n:>9} rows"),
            None => println!("  {table:<16}         -"),
        }
    }

    println!();
    println!("=== INDEX GRID ===");
    let raster_path = snapshot::index_raster_path(db);
    match AsciiRaster::read(&raster_path) {
        Ok(r) => {
            println!("  file:      {}", raster_path.display());
            println!("  size:      {} x {}", r.ncols, r.nrows);
            println!("  origin:    {} / {}", r.xll, r.yll);
            println!("  cellsize:  {}", r.cell_size);
        }
        Err(e) => println!("  (none: {e})"),
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
