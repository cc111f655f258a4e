//! PointGrid CLI - grid point samples into GeoTIFF rasters

mod input;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pointgrid_algorithms::interpolation::{
    interpolate_idw, interpolate_nearest, GridParams, IdwParams, NearestParams,
};
use pointgrid_algorithms::vector::{minimum_rectangle, spacing_summary, BoundingBox, BufferParams};
use pointgrid_core::io::{write_geotiff, GeoTiffOptions};
use pointgrid_core::{PointSet, RasterImage, CRS};
use pointgrid_parallel::strategy::num_cpus;
use pointgrid_parallel::ProcessingMode;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pointgrid")]
#[command(author, version, about = "Grid scattered point samples into rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the gridding commands
#[derive(Args)]
struct GridArgs {
    /// Input GeoJSON with point features
    input: PathBuf,
    /// Output GeoTIFF
    output: PathBuf,
    /// Numeric attribute to grid
    #[arg(short, long)]
    field: String,
    /// Cell size in CRS units
    #[arg(short, long)]
    cell_size: f64,
    /// Distance added around the point extent
    #[arg(short, long, default_value = "0.0")]
    buffer: f64,
    /// EPSG code of the point coordinates
    #[arg(long, conflicts_with = "wkt_file", required_unless_present = "wkt_file")]
    epsg: Option<u32>,
    /// File holding the WKT of the point coordinates' CRS
    #[arg(long)]
    wkt_file: Option<PathBuf>,
    /// Sentinel written to cells without a value
    #[arg(long, default_value = "-2.0", allow_negative_numbers = true)]
    nodata: f64,
    /// Evaluate lattice rows on all cores
    #[arg(short, long)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Grid points by nearest neighbor
    Nearest {
        #[command(flatten)]
        grid: GridArgs,
        /// Cells farther than this from every point become nodata
        #[arg(short = 'r', long)]
        max_radius: Option<f64>,
    },
    /// Grid points by inverse distance weighting
    Idw {
        #[command(flatten)]
        grid: GridArgs,
        /// Distance decay power
        #[arg(long, default_value = "2.0")]
        power: f64,
        /// Blend only the k nearest points
        #[arg(short = 'k', long)]
        max_points: Option<usize>,
    },
    /// Print the buffered rounded rectangle around the points
    Bounds {
        /// Input GeoJSON with point features
        input: PathBuf,
        /// Buffer distance
        #[arg(short, long, default_value = "1.0")]
        buffer: f64,
        /// Segments per rounded corner
        #[arg(short, long, default_value = "16")]
        segments: usize,
    },
    /// Print nearest-neighbor spacing statistics
    Spacing {
        /// Input GeoJSON with point features
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

impl GridArgs {
    fn crs(&self) -> Result<CRS> {
        match (&self.wkt_file, self.epsg) {
            (Some(path), _) => {
                let wkt = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read WKT from {}", path.display()))?;
                Ok(CRS::from_wkt(wkt.trim()))
            }
            (None, Some(code)) => {
                let crs = CRS::from_epsg(code);
                crs.to_wkt().with_context(|| {
                    format!(
                        "EPSG:{} cannot be written to the output; pass its WKT with --wkt-file",
                        code
                    )
                })?;
                Ok(crs)
            }
            (None, None) => anyhow::bail!("Either --epsg or --wkt-file is required"),
        }
    }

    fn grid(&self) -> GridParams {
        GridParams::new(self.cell_size, self.buffer)
    }

    fn mode(&self) -> ProcessingMode {
        if self.parallel {
            info!("Parallel evaluation on {} threads", num_cpus());
            ProcessingMode::Parallel
        } else {
            ProcessingMode::Sequential
        }
    }

    fn read_points(&self) -> Result<PointSet> {
        let pb = spinner("Reading points...");
        let features = input::read_features(&self.input)?;
        let points = PointSet::from_features(&features, &self.field, Some(self.crs()?))
            .context("Failed to read sample points")?;
        pb.finish_and_clear();
        info!("Input: {} points, field '{}'", points.len(), points.field());
        Ok(points)
    }
}

fn write_result(raster: &RasterImage, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, raster: &RasterImage, path: &Path, elapsed: std::time::Duration) {
    let (rows, cols) = raster.shape();
    let bounds = raster.bounds();
    let stats = raster.statistics();

    println!("{} saved to: {}", name, path.display());
    println!("  Dimensions: {} x {} ({} cells)", cols, rows, rows * cols);
    println!(
        "  Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.0, bounds.1, bounds.2, bounds.3
    );
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        println!("  Values: min {:.4}, max {:.4}, mean {:.4}", min, max, mean);
    }
    if stats.nodata_count > 0 {
        println!("  NoData cells: {}", stats.nodata_count);
    }
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Nearest { grid, max_radius } => {
            let points = grid.read_points()?;
            let params = NearestParams {
                grid: grid.grid(),
                max_radius,
                nodata: grid.nodata,
                mode: grid.mode(),
                ..Default::default()
            };

            let start = Instant::now();
            let raster = interpolate_nearest(&points, &params).context("Nearest neighbor gridding failed")?;
            let elapsed = start.elapsed();

            write_result(&raster, &grid.output)?;
            done("Nearest neighbor grid", &raster, &grid.output, elapsed);
        }

        Commands::Idw {
            grid,
            power,
            max_points,
        } => {
            let points = grid.read_points()?;
            let params = IdwParams {
                grid: grid.grid(),
                power,
                max_points,
                nodata: grid.nodata,
                mode: grid.mode(),
                ..Default::default()
            };

            let start = Instant::now();
            let raster = interpolate_idw(&points, &params).context("IDW gridding failed")?;
            let elapsed = start.elapsed();

            write_result(&raster, &grid.output)?;
            done("IDW grid", &raster, &grid.output, elapsed);
        }

        Commands::Bounds {
            input,
            buffer,
            segments,
        } => {
            let points = input::read_locations(&input)?;
            let params = BufferParams {
                distance: buffer,
                segments,
            };
            let polygon = minimum_rectangle(&points, &params)?;
            if let Some(bbox) = BoundingBox::from_points(&points) {
                println!(
                    "Extent: {} x {} (before buffering)",
                    bbox.width(),
                    bbox.height()
                );
            }

            let ring: Vec<String> = polygon
                .exterior()
                .coords()
                .map(|c| format!("{} {}", c.x, c.y))
                .collect();
            println!("POLYGON (({}))", ring.join(", "));
        }

        Commands::Spacing { input } => {
            let points = input::read_locations(&input)?;
            let summary = spacing_summary(&points)?;

            println!("Points: {}", summary.count);
            println!("Nearest-neighbor distance:");
            println!("  min:  {:.6}", summary.min);
            println!("  mean: {:.6}", summary.mean);
            println!("  max:  {:.6}", summary.max);
        }
    }

    Ok(())
}
