//! Diagnostic: print header fields and record statistics for a `.shp` file.
//!
//! Usage: `shp_info <file.shp> [--records]`
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::collections::BTreeMap;
use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use shpcursor::{GeometryCursor, GeometryType, ShapefileGeometryCursor};

#[derive(Default)]
struct KindStats {
    records: usize,
    empty: usize,
    parts: usize,
    vertices: usize,
}

fn run(path: &str, print_records: bool) -> Result<()> {
    let mut cursor = ShapefileGeometryCursor::from_file(path)
        .with_context(|| format!("failed to open {path}"))?;

    let header = cursor.header().clone();
    println!("{path}");
    println!("  file length : {} bytes", header.file_length);
    match header.shape_type() {
        Some(shape_type) => println!("  shape type  : {shape_type}"),
        None => println!("  shape type  : undefined ({})", header.shape_type_code),
    }
    println!("  geometry    : {}", header.geometry_type);
    println!("  extent      : {}", header.bounding_box);
    println!("  z range     : {} .. {}", header.z_range.0, header.z_range.1);
    println!("  m range     : {} .. {}", header.m_range.0, header.m_range.1);

    let mut stats: BTreeMap<&'static str, KindStats> = BTreeMap::new();
    while let Some(geometry) = cursor
        .next_geometry()
        .with_context(|| format!("failed after record {}", cursor.geometry_id()))?
    {
        let kind = geometry.geometry_type();
        if print_records {
            let extent = geometry
                .bounding_box()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "empty".to_string());
            println!(
                "  #{:<6} {:<10} parts={:<4} vertices={:<6} {}",
                cursor.geometry_id(),
                kind,
                geometry.part_count(),
                geometry.point_count(),
                extent
            );
        }
        let entry = stats.entry(kind.name()).or_default();
        entry.records += 1;
        entry.parts += geometry.part_count();
        entry.vertices += geometry.point_count();
        if geometry.is_empty() {
            entry.empty += 1;
        }
    }

    let total: usize = stats.values().map(|s| s.records).sum();
    println!("  records     : {total}");
    for (kind, s) in &stats {
        println!(
            "    {kind:<10} records={} empty={} parts={} vertices={}",
            s.records, s.empty, s.parts, s.vertices
        );
    }

    if header.geometry_type == GeometryType::Unknown && total > 0 {
        tracing::warn!("header shape type {} is not a supported kind", header.shape_type_code);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = parse_args(&args).and_then(|(path, records)| run(path, records));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Result<(&str, bool)> {
    let mut path = None;
    let mut records = false;
    for arg in args {
        match arg.as_str() {
            "--records" => records = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            p if path.is_none() => path = Some(p),
            _ => bail!("usage: shp_info <file.shp> [--records]"),
        }
    }
    match path {
        Some(p) => Ok((p, records)),
        None => bail!("usage: shp_info <file.shp> [--records]"),
    }
}
