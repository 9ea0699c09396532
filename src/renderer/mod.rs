mod color;

// Re-export public API
pub use color::{map_to_rgba, ColorMap};

use color::BACKGROUND;
use crate::state::FrameSnapshot;

/// Which field the annulus is painted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VizMode {
    /// Dye density.
    Density,
    /// Velocity magnitude.
    Speed,
}

impl VizMode {
    /// Cycle to the next visualization mode.
    pub fn next(self) -> Self {
        match self {
            VizMode::Density => VizMode::Speed,
            VizMode::Speed => VizMode::Density,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VizMode::Density => "density",
            VizMode::Speed => "speed",
        }
    }

    pub fn colormap(self) -> ColorMap {
        match self {
            VizMode::Density => ColorMap::TokyoNight,
            VizMode::Speed => ColorMap::ArcticIce,
        }
    }
}

/// Pixel layout: the annulus is drawn centred, its outer wall touching
/// `fill` of the shorter window side.
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Fraction of `min(width, height) / 2` covered by `r_max`.
    pub fill: f64,
    /// Field value mapped to the top of the palette. Larger values saturate.
    pub scale: f64,
}

impl RenderConfig {
    pub fn fit(width: usize, height: usize) -> Self {
        Self { width: width.max(1), height: height.max(1), fill: 0.95, scale: 1.0 }
    }

    /// Outer-wall radius in pixels.
    fn outer_px(&self) -> f64 {
        self.width.min(self.height) as f64 * 0.5 * self.fill
    }
}

/// Paint `snap` into an RGBA buffer of `width * height * 4` bytes.
///
/// Each pixel is mapped back to polar coordinates (y up, θ counter-clockwise
/// from +x) and takes the value of the interior cell it lands in. Pixels
/// outside the annulus get the background color. Values are clamped here;
/// the solver never clamps.
pub fn render_into(buf: &mut Vec<u8>, snap: &FrameSnapshot, cfg: &RenderConfig, viz_mode: VizMode) {
    let (w, h) = (cfg.width, cfg.height);
    buf.resize(w * h * 4, 0);

    let geometry = &snap.geometry;
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;
    let per_px = geometry.r_max as f64 / cfg.outer_px();
    let inv_scale = if cfg.scale > 1e-30 { 1.0 / cfg.scale } else { 1.0 };
    let colormap = viz_mode.colormap();

    for py in 0..h {
        let y = (cy - (py as f64 + 0.5)) * per_px;
        for px in 0..w {
            let x = (px as f64 + 0.5 - cx) * per_px;
            let r = (x * x + y * y).sqrt();
            let theta = y.atan2(x);

            let rgba = match geometry.cell_at(r as f32, theta as f32) {
                Some((i, j)) => {
                    let value = match viz_mode {
                        VizMode::Density => snap.density.get(i, j) as f64,
                        VizMode::Speed => {
                            let (a, b) = (snap.ur.get(i, j) as f64, snap.utheta.get(i, j) as f64);
                            (a * a + b * b).sqrt()
                        }
                    };
                    map_to_rgba(value * inv_scale, colormap)
                }
                None => BACKGROUND,
            };

            let off = (py * w + px) * 4;
            buf[off..off + 4].copy_from_slice(&rgba);
        }
    }
}

/// Render to a new RGBA buffer.
pub fn render(snap: &FrameSnapshot, cfg: &RenderConfig, viz_mode: VizMode) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, snap, cfg, viz_mode);
    buf
}

/// Pack RGBA bytes into the 0RGB words minifb expects.
pub fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (dst, px) in out.iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32;
    }
}
