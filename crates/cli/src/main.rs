use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use triangulator::codec::{
    decode_mesh, decode_pointset, encode_mesh, encode_pointset, encode_triangles,
};
use triangulator::geom::DEFAULT_EPS;
use triangulator::pipeline::Pipeline;
use triangulator::sample::{draw_points, Layout, SampleCfg};
use triangulator::{GeomCfg, Triangulator};

mod provenance;
mod report;
mod store;

use provenance::{write_sidecar, Payload};
use store::DirSource;

#[derive(Parser)]
#[command(name = "triangulator-cli", version)]
#[command(about = "Delaunay triangulation of binary point sets")]
struct Cmd {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Triangulate a point-set file
    Triangulate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Write a mesh document (points + triangles) instead of triangles only
        #[arg(long)]
        mesh: bool,
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f64,
    },
    /// Run the fetch/triangulate pipeline against a directory of `<id>.bin` files
    Fetch {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f64,
    },
    /// Write a seeded random point set
    Generate {
        #[arg(long)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Points fall in [-half_extent, half_extent]²
        #[arg(long, default_value_t = 1.0)]
        half_extent: f64,
        /// Snap to an integer lattice with this many cells per axis
        #[arg(long)]
        lattice: Option<u32>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a JSON summary of a point-set or mesh-document file
    Inspect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        mesh: bool,
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f64,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    init_logging(cmd.verbose);
    match cmd.action {
        Action::Triangulate {
            input,
            out,
            mesh,
            eps,
        } => triangulate(&input, &out, mesh, eps),
        Action::Fetch {
            store,
            id,
            out,
            eps,
        } => fetch(store, &id, &out, eps),
        Action::Generate {
            count,
            seed,
            half_extent,
            lattice,
            out,
        } => generate(count, seed, half_extent, lattice, &out),
        Action::Inspect { input, mesh, eps } => inspect(&input, mesh, eps),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn geom_cfg(eps: f64) -> Result<GeomCfg> {
    if !(eps.is_finite() && eps >= 0.0) {
        bail!("--eps must be a finite non-negative number, got {eps}");
    }
    Ok(GeomCfg::with_eps(eps))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn triangulate(input: &Path, out: &Path, mesh_doc: bool, eps: f64) -> Result<()> {
    let cfg = geom_cfg(eps)?;
    let raw = read_input(input)?;
    let points =
        decode_pointset(&raw).with_context(|| format!("decoding {}", input.display()))?;
    let (mesh, stats) = Triangulator::new(cfg).triangulate_with_stats(&points)?;
    let bytes = if mesh_doc {
        encode_mesh(&points, &mesh)?
    } else {
        encode_triangles(&mesh, points.len())?
    };
    write_output(out, &bytes)?;
    tracing::info!(
        points = points.len(),
        triangles = mesh.len(),
        duplicates = stats.duplicates,
        out = %out.display(),
        "triangulate"
    );
    let payload = Payload::new(
        "triangulate",
        json!({
            "input": input,
            "eps": eps,
            "mesh_document": mesh_doc,
            "points": points.len(),
            "triangles": mesh.len(),
            "duplicates": stats.duplicates,
            "degenerate_removed": stats.degenerate_removed,
        }),
    );
    write_sidecar(out, &payload)?;
    Ok(())
}

fn fetch(store: PathBuf, id: &str, out: &Path, eps: f64) -> Result<()> {
    let cfg = geom_cfg(eps)?;
    let pipeline = Pipeline::new(DirSource::new(store), cfg);
    let outcome = pipeline.run(id);
    let summary = json!({
        "id": id,
        "status": outcome.class.status_code(),
        "code": outcome.class.code(),
        "message": outcome.message,
        "bytes": outcome.body.len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if !outcome.class.is_success() {
        bail!("{}: {}", outcome.class, outcome.message);
    }
    write_output(out, &outcome.body)?;
    let payload = Payload::new(
        "fetch",
        json!({
            "store": pipeline.source().root(),
            "id": id,
            "eps": eps,
        }),
    );
    write_sidecar(out, &payload)?;
    Ok(())
}

fn generate(
    count: usize,
    seed: u64,
    half_extent: f64,
    lattice: Option<u32>,
    out: &Path,
) -> Result<()> {
    if !(half_extent.is_finite() && half_extent > 0.0) {
        bail!("--half-extent must be finite and positive, got {half_extent}");
    }
    let cfg = SampleCfg {
        count,
        half_extent,
        layout: lattice.map_or(Layout::Uniform, |cells| Layout::Lattice { cells }),
    };
    let points = draw_points(cfg, seed);
    write_output(out, &encode_pointset(&points)?)?;
    tracing::info!(count, seed, out = %out.display(), "generate");
    let payload = Payload::new(
        "generate",
        json!({
            "count": count,
            "seed": seed,
            "half_extent": half_extent,
            "lattice": lattice,
        }),
    );
    write_sidecar(out, &payload)?;
    Ok(())
}

fn inspect(input: &Path, mesh_doc: bool, eps: f64) -> Result<()> {
    let cfg = geom_cfg(eps)?;
    let raw = read_input(input)?;
    let summary = if mesh_doc {
        let (points, mesh) =
            decode_mesh(&raw).with_context(|| format!("decoding {}", input.display()))?;
        serde_json::to_value(report::summarize_mesh(&points, &mesh, cfg))?
    } else {
        let points =
            decode_pointset(&raw).with_context(|| format!("decoding {}", input.display()))?;
        serde_json::to_value(report::summarize_points(&points, cfg))?
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
