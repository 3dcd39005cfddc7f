//! # JDRKit
//!
//! Document and object model for a vector drawing editor:
//! - Paths built from shared control points, with lines, cubic Béziers,
//!   moves and self-maintaining closing moves
//! - Symmetric paths mirrored across a line of symmetry
//! - Rotational, scaled and spiral patterns of any shape
//! - Export to SVG, EPS and PGF
//!
//! ## Architecture
//!
//! JDRKit is organized as a workspace with multiple crates:
//!
//! 1. **jdrkit-core** - Errors, units, geometric primitives, binary codec
//! 2. **jdrkit-designer** - Paths, compound shapes, iterators, exporters, drawing files
//! 3. **jdrkit-settings** - Configuration persisted as TOML or JSON
//! 4. **jdrkit** - This facade and the `jdrkit` command line tool

use std::path::Path;

use anyhow::Context;
use tracing::info;

pub use jdrkit_core as core;
pub use jdrkit_designer as designer;
pub use jdrkit_settings as settings;

pub use jdrkit_core::{Angle, BoundingBox, Length, Line, Point, Unit};
pub use jdrkit_designer::{
    emit_eps, emit_pgf, emit_svg, DesignerError, DrawContext, DrawObject, Drawing, Path as JdrPath, PathSegment,
    Pattern, PatternMode, Shape, ShapeGeometry, SymmetricPath,
};
pub use jdrkit_settings::{Config, ExportFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Log lines go to stderr so exported documents written to stdout stay
/// clean. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Render every object of `drawing` in `format`
///
/// The drawing's own storage unit wins over the configured one; canvas
/// scale and export precision come from `config`.
pub fn render(drawing: &Drawing, format: ExportFormat, config: &Config) -> anyhow::Result<String> {
    let ctx = DrawContext {
        storage_unit: drawing.storage_unit,
        ..config.draw_context()
    };
    let precision = config.export.precision;
    let document = match format {
        ExportFormat::Svg => emit_svg(drawing.shapes(), &ctx, precision, config.export.svg_pretty),
        ExportFormat::Eps => emit_eps(drawing.shapes(), &ctx, precision),
        ExportFormat::Pgf => emit_pgf(drawing.shapes(), &ctx, precision),
    }
    .with_context(|| format!("Failed to export drawing '{}' as {}", drawing.metadata.name, format))?;
    Ok(document)
}

/// Load `input`, render it and write the result to `output` (stdout when `None`)
pub fn export_file(input: &Path, output: Option<&Path>, format: ExportFormat, config: &Config) -> anyhow::Result<()> {
    let drawing = Drawing::load_from_file(input)?;
    info!(
        "Exporting '{}' ({} objects) as {}",
        drawing.metadata.name,
        drawing.objects.len(),
        format
    );
    let document = render(&drawing, format, config)?;

    match output {
        Some(path) => {
            std::fs::write(path, document).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", document),
    }

    Ok(())
}
