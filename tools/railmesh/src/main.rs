use anyhow::{bail, Context, Result};
use clap::Parser;
use geo::Coord;
use railmesh_core::prelude::*;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

mod documents;
mod output;

use documents::{read_json, Documents};
use output::{layer_summary, write_geojson};

#[derive(Parser, Debug)]
#[command(
    name = "railmesh",
    author,
    version,
    about = "Generate per-zoom railway and station geometry as GeoJSON",
    long_about = "Reads railway composition rules, station groups and reference records, \
                  composes every railway line at each zoom level (offsetting shared track, \
                  smoothing joins and filling interpolated gaps), buffers station markers \
                  around the composed lines and writes the result as GeoJSON."
)]
struct Args {
    /// Railway composition document (`railways` with `_sublines`)
    #[arg(long)]
    railways: PathBuf,

    /// Station group document (`stations` with `aliases`)
    #[arg(long)]
    stations: PathBuf,

    /// Railway reference records with station order
    #[arg(long)]
    railway_refs: PathBuf,

    /// Station reference records with locations
    #[arg(long)]
    station_refs: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Decimal digits kept in output coordinates
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    /// Longitude of the planar projection origin
    #[arg(long, default_value_t = 139.7670, allow_negative_numbers = true)]
    origin_lon: f64,

    /// Latitude of the planar projection origin
    #[arg(long, default_value_t = 35.6814, allow_negative_numbers = true)]
    origin_lat: f64,

    /// Extra buffer steps per line coordinate when offsetting
    #[arg(long, default_value_t = 2)]
    steps_per_coordinate: usize,

    /// Only synthesize these zoom levels (13 to 18); all by default
    #[arg(short, long, value_delimiter = ',')]
    zoom: Vec<u8>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = FilterFn::new(move |metadata| {
        metadata.level() <= &max_level
            && metadata.module_path().unwrap_or_default().starts_with("railmesh")
    });
    let layer = tracing_subscriber::fmt::layer().event_format(Format::default().without_time());

    tracing_subscriber::registry().with(layer).with(filter).init();
}

/// Requested zoom levels, sorted and without repeats.
fn zoom_levels(requested: &[u8]) -> Result<Vec<ZoomLevel>> {
    if requested.is_empty() {
        return Ok(ZoomLevel::ALL.to_vec());
    }

    let mut levels = requested
        .iter()
        .map(|&z| {
            ZoomLevel::new(z).with_context(|| {
                format!("Zoom {z} is outside {}..={}", ZoomLevel::MIN, ZoomLevel::MAX)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    levels.sort();
    levels.dedup();

    Ok(levels)
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    info!("=== Railmesh Geometry Generator ===");
    info!("Output: {}", args.output.display());

    for input in [&args.railways, &args.stations, &args.railway_refs, &args.station_refs] {
        if !input.exists() {
            bail!("Input file does not exist: {}", input.display());
        }
    }

    let config = PipelineConfig {
        zoom_levels: zoom_levels(&args.zoom)?,
        offset: OffsetOptions {
            steps_per_coordinate: args.steps_per_coordinate,
            ..Default::default()
        },
        ..Default::default()
    };
    let projection = LocalProjection::new(Coord {
        x: args.origin_lon,
        y: args.origin_lat,
    });

    // Phase 1: Load documents
    info!("");
    info!("Phase 1: Loading documents...");
    let documents = Documents {
        railways: read_json(&args.railways)?,
        stations: read_json(&args.stations)?,
        railway_refs: read_json(&args.railway_refs)?,
        station_refs: read_json(&args.station_refs)?,
    };
    info!(
        "  {} railways, {} stations, {} station references",
        documents.railways.railways.len(),
        documents.stations.stations.len(),
        documents.station_refs.len()
    );

    let network = documents
        .into_network(&projection)
        .context("Failed to build network from documents")?;

    // Phase 2: Compose
    info!("");
    info!("Phase 2: Composing {} zoom levels...", config.zoom_levels.len());
    let pipeline = Pipeline::new(config);
    let output = pipeline.run(&network).context("Geometry synthesis failed")?;

    let summary = layer_summary(&output.features, &pipeline.config().zoom_levels);
    for layer in summary.iter().filter(|layer| layer.count > 0) {
        let level = if layer.underground { "underground" } else { "surface" };
        let (min, max) = layer.display_range;
        info!(
            "  zoom {} {:?} {} (shown at {}..{}): {}",
            layer.zoom, layer.class, level, min, max, layer.count
        );
    }

    // Phase 3: Export
    info!("");
    info!("Phase 3: Exporting...");
    let collection = to_geojson(&output.features, args.precision, Some(&projection));
    write_geojson(collection, &args.output)?;

    info!("");
    info!("=== Complete ===");
    info!("  Lines composed: {}", output.lines.len());
    info!("  Features written: {}", output.features.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_levels_sorted_and_deduplicated() {
        let levels = zoom_levels(&[16, 14, 14, 16]).unwrap();
        assert_eq!(levels, vec![ZoomLevel::new(14).unwrap(), ZoomLevel::new(16).unwrap()]);
    }

    #[test]
    fn test_zoom_levels_default_and_range() {
        assert_eq!(zoom_levels(&[]).unwrap(), ZoomLevel::ALL.to_vec());
        assert!(zoom_levels(&[12]).is_err());
    }

    #[test]
    fn test_repeated_zoom_runs_once() {
        let railway = RailwayTopology {
            id: RailwayIdentifier::new("asakusa"),
            stations: vec![],
            sublines: vec![SublineSpec::Own {
                coordinates: vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 0.0 }],
            }],
            color: "#E85298".into(),
            altitude: AltitudeTier(-1),
            is_loop: false,
        };
        let network = Network::new(vec![railway], vec![], vec![]).unwrap();

        let config = PipelineConfig {
            zoom_levels: zoom_levels(&[14, 14]).unwrap(),
            ..Default::default()
        };
        let output = Pipeline::new(config).run(&network).unwrap();
        assert_eq!(output.lines.len(), 1);
    }
}
