use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use rayon::prelude::*;

use crate::config::AnimationConfig;
use crate::encode::gif::{ensure_parent_dir, GifConfig, GifWriter};
use crate::foundation::core::FrameRgba;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRasterizer;
use crate::render::scene::RenderScene;
use crate::schedule::{schedule, ScheduledFrame};
use crate::token::Token;

/// Frame-level threading configuration. Rasterization has no cross-frame data
/// dependency; results are collected back into strict schedule order before
/// they reach the encoder.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
    pub chunk_size: usize,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
}

/// Options for [`render_to_gif`].
#[derive(Clone, Debug)]
pub struct RenderToGifOpts {
    /// Whether to overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Background flattened under semi-transparent pixels (straight RGBA).
    pub bg_rgba: [u8; 4],
    pub threading: RenderThreading,
}

impl Default for RenderToGifOpts {
    fn default() -> Self {
        Self {
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            threading: RenderThreading::default(),
        }
    }
}

/// Rasterize the full animation into memory with default threading.
pub fn render_frames(tokens: &[Token], config: &AnimationConfig) -> ReelResult<Vec<FrameRgba>> {
    render_frames_with_stats(tokens, config, &RenderThreading::default()).map(|(f, _)| f)
}

/// Rasterize the full animation into memory.
#[tracing::instrument(skip_all)]
pub fn render_frames_with_stats(
    tokens: &[Token],
    config: &AnimationConfig,
    threading: &RenderThreading,
) -> ReelResult<(Vec<FrameRgba>, RenderStats)> {
    let scene = RenderScene::new(tokens, config)?;
    let plan = schedule(scene.total_chars(), config);
    tracing::debug!(frames = plan.len(), canvas = ?scene.canvas(), "render plan ready");

    let frames = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        render_chunk_parallel(&scene, &plan, &pool)?
    } else {
        let mut raster = FrameRasterizer::new(&scene)?;
        plan.iter()
            .map(|sf| raster.render(sf))
            .collect::<ReelResult<Vec<_>>>()?
    };

    let total = frames.len() as u64;
    Ok((
        frames,
        RenderStats {
            frames_total: total,
            frames_rendered: total,
        },
    ))
}

/// Rasterize a single scheduled frame (debugging aid for the CLI).
pub fn render_single_frame(
    tokens: &[Token],
    config: &AnimationConfig,
    index: usize,
) -> ReelResult<FrameRgba> {
    let scene = RenderScene::new(tokens, config)?;
    let plan = schedule(scene.total_chars(), config);
    let sf = plan.get(index).ok_or_else(|| {
        ReelError::validation(format!(
            "frame index {index} out of bounds ({} frames)",
            plan.len()
        ))
    })?;
    FrameRasterizer::new(&scene)?.render(sf)
}

/// Render the whole animation and stream it into an animated gif at
/// `out_path`. The artifact is written to a temporary sibling file and
/// renamed into place only after a successful finish, so a failed run never
/// leaves a partial file that could be mistaken for a valid artifact.
#[tracing::instrument(skip_all)]
pub fn render_to_gif(
    tokens: &[Token],
    config: &AnimationConfig,
    out_path: impl Into<PathBuf>,
    opts: RenderToGifOpts,
) -> ReelResult<RenderStats> {
    let out_path = out_path.into();
    let scene = RenderScene::new(tokens, config)?;
    let plan = schedule(scene.total_chars(), config);
    let canvas = scene.canvas();
    let gif_cfg = GifConfig {
        width: canvas.width,
        height: canvas.height,
        fps: config.fps,
        bg_rgba: opts.bg_rgba,
    };
    gif_cfg.validate()?;

    if !opts.overwrite && out_path.exists() {
        return Err(ReelError::validation(format!(
            "output file '{}' already exists",
            out_path.display()
        )));
    }
    ensure_parent_dir(&out_path)?;

    let tmp = temp_path(&out_path)?;
    let mut guard = TempFileGuard(Some(tmp.clone()));
    let file = File::create(&tmp).map_err(|e| {
        ReelError::encode(format!("failed to create '{}': {e}", tmp.display()))
    })?;
    let mut writer = BufWriter::new(file);

    let mut stats = RenderStats::default();
    {
        let mut gif = GifWriter::new(&mut writer, gif_cfg)?;
        let chunk_size = opts.threading.chunk_size.max(1);
        let pool = if opts.threading.parallel {
            Some(build_thread_pool(opts.threading.threads)?)
        } else {
            None
        };
        let mut seq_raster = if opts.threading.parallel {
            None
        } else {
            Some(FrameRasterizer::new(&scene)?)
        };

        for chunk in plan.chunks(chunk_size) {
            let frames = match (&pool, &mut seq_raster) {
                (Some(pool), _) => render_chunk_parallel(&scene, chunk, pool)?,
                (None, Some(raster)) => chunk
                    .iter()
                    .map(|sf| raster.render(sf))
                    .collect::<ReelResult<Vec<_>>>()?,
                (None, None) => unreachable!("sequential rasterizer always present"),
            };
            for frame in &frames {
                gif.write_frame(frame)?;
            }
            stats.frames_total += chunk.len() as u64;
            stats.frames_rendered += frames.len() as u64;
        }
        gif.finish()?;
    }

    writer
        .flush()
        .map_err(|e| ReelError::encode(format!("failed to flush gif stream: {e}")))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| ReelError::encode(format!("failed to sync gif stream: {e}")))?;
    std::fs::rename(&tmp, &out_path).map_err(|e| {
        ReelError::encode(format!(
            "failed to move artifact into place at '{}': {e}",
            out_path.display()
        ))
    })?;
    guard.0 = None;

    tracing::info!(
        frames = stats.frames_total,
        out = %out_path.display(),
        "gif written"
    );
    Ok(stats)
}

fn render_chunk_parallel(
    scene: &RenderScene,
    frames: &[ScheduledFrame],
    pool: &rayon::ThreadPool,
) -> ReelResult<Vec<FrameRgba>> {
    let rendered: Vec<ReelResult<FrameRgba>> = pool.install(|| {
        frames
            .par_iter()
            .map_init(
                || FrameRasterizer::new(scene),
                |raster, sf| match raster {
                    Ok(r) => r.render(sf),
                    Err(e) => Err(ReelError::render(format!("worker init failed: {e}"))),
                },
            )
            .collect()
    });
    rendered.into_iter().collect()
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

fn temp_path(out_path: &std::path::Path) -> ReelResult<PathBuf> {
    let name = out_path
        .file_name()
        .ok_or_else(|| ReelError::validation("output path must name a file"))?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".part");
    Ok(out_path.with_file_name(tmp_name))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
