//! The figure pipeline: load, draw basin and rivers, annotate, save.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cama_map::shapefile::read_shapes;
use cama_map::CamaMap;
use renderer::{
    crop_to_content, draw_colorbar, load_font, save_jpeg, Anchor, Colormap, Figure, MapAxes,
    Normalize, TextItem,
};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::segments::{render_level, LevelStats};
use crate::vector::{RivvecTools, VectorSource};

/// Gap between the title baseline and the map, in points.
const TITLE_PAD_PT: f32 = 6.0;

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub levels: Vec<LevelStats>,
}

impl RunSummary {
    pub fn segments_drawn(&self) -> usize {
        self.levels.iter().map(|s| s.drawn).sum()
    }
}

/// Render the figure using `source` for river vectors. Intermediate files
/// are left in place.
pub fn render_map<S: VectorSource>(config: &RunConfig, source: &mut S) -> Result<RunSummary> {
    let style = &config.style;

    let map = CamaMap::load(&config.map_paths(), &config.rivnum)
        .with_context(|| format!("Failed to load map '{}'", config.mapname))?;
    let discharge = map
        .load_discharge(&config.discharge)
        .with_context(|| format!("Failed to read discharge {}", config.discharge.display()))?;

    let extent = map.params.display_extent(config.north_limit);
    info!(
        west = extent.west,
        east = extent.east,
        south = extent.south,
        north = extent.north,
        "Display extent"
    );

    let cmap = Colormap::from_name(&style.colormap)?;
    let norm = Normalize::new(0.0, discharge.max() as f64);
    debug!(vmax = norm.vmax, timesteps = discharge.timesteps(), "Color scale");

    let mut fig = Figure::from_style(style)?;
    let mut axes = fig.map_axes(extent, style.map_rect)?;

    if let Some(shp) = &config.basin_shapefile {
        draw_basin(&mut axes, shp, config)?;
    }

    info!("Plotting rivers");
    source
        .prepare(&extent)
        .context("Failed to prepare river vectors")?;

    let resolver = map.resolver(&discharge);
    let mut levels = Vec::new();
    for level in style.rivers.levels() {
        let lines = source
            .level_lines(level)
            .with_context(|| format!("Failed to read river vectors for level {}", level))?;
        let layer = render_level(level, &lines, &resolver, &cmap, &norm, &style.rivers)?;

        axes.draw_line_collection(&layer.collection);
        if layer.stats.lines_read == 0 {
            warn!(level, "No river vectors for level");
        }
        debug!(stats = %layer.stats, "Rendered level");
        levels.push(layer.stats);
    }

    let title_anchor = axes.rect();
    fig.add_axes(axes);
    if !style.title.is_empty() {
        let pad = fig.pt_to_px(TITLE_PAD_PT);
        fig.add_text(TextItem::new(
            style.title.clone(),
            title_anchor.center_x(),
            title_anchor.y - pad,
            fig.pt_to_px(style.title_size_pt),
            Anchor::BottomCenter,
        ));
    }
    draw_colorbar(&mut fig, &cmap, &norm, &style.colorbar);

    let font = load_font(config.font.as_deref())?;
    let background = fig.background();
    let mut img = fig.render(font.as_ref());
    if style.tight {
        img = crop_to_content(&img, background);
    }

    std::fs::create_dir_all(&config.fig_dir)
        .with_context(|| format!("Failed to create {}", config.fig_dir.display()))?;
    let output = config.output_path();
    save_jpeg(&output, &img, style.jpeg_quality, background)?;

    let summary = RunSummary {
        output,
        width: img.width(),
        height: img.height(),
        levels,
    };
    info!(
        output = %summary.output.display(),
        width = summary.width,
        height = summary.height,
        segments = summary.segments_drawn(),
        "Saved figure"
    );
    Ok(summary)
}

fn draw_basin(axes: &mut MapAxes, shp: &Path, config: &RunConfig) -> Result<()> {
    info!(path = %shp.display(), "Plotting shapefile");
    let shapes = read_shapes(shp)
        .with_context(|| format!("Failed to read basin shapefile {}", shp.display()))?;
    let color = config.style.basin_color()?;
    let width = config.style.basin.line_width_pt as f64;

    for shape in &shapes {
        for part in &shape.parts {
            axes.draw_outline(part, shape.shape_type.is_polygon(), color, width);
        }
    }
    debug!(shapes = shapes.len(), "Drew basin outline");
    Ok(())
}

/// Delete regular files in `dir` named `<figname>*.txt`. Returns the
/// number removed.
pub fn remove_intermediate_files(dir: &Path, figname: &str) -> Result<usize> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !(name.starts_with(figname) && name.ends_with(".txt")) {
            continue;
        }
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

/// Full run with the external vector tools, then cleanup.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut tools = RivvecTools::from_config(config);
    let summary = render_map(config, &mut tools)?;

    if config.keep_intermediate {
        debug!("Keeping intermediate files");
    } else {
        let removed = remove_intermediate_files(&config.work_dir, &config.figname)?;
        debug!(removed, "Removed intermediate files");
    }
    Ok(summary)
}
