//! Canvas surface: device-pixel scaling and replay of a [`DrawOp`] scene.

use crate::render::{DrawOp, CENTER, LABEL_INSET, LABEL_SHADOW, LOGICAL_SIZE, OUTER_RADIUS, SLICE_STROKE};
use crate::WheelError;
use log::info;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const LABEL_FONT: &str = "bold 24px Outfit, sans-serif";
const PLACEHOLDER_FONT: &str = "30px Outfit, sans-serif";
const POINTER_LENGTH: f64 = 34.0;
const POINTER_HALF_WIDTH: f64 = 16.0;

/// Mapping from the fixed logical square onto the physical backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceScale {
    /// Displayed side length in CSS pixels.
    pub css_size: f64,
    pub device_pixel_ratio: f64,
    /// Backing store side length in device pixels.
    pub pixel_size: u32,
    /// Logical unit -> device pixel factor.
    pub scale: f64,
}

/// Fit the wheel into a `width` x `height` container at the given pixel ratio.
pub fn compute_scale(width: f64, height: f64, device_pixel_ratio: f64) -> SurfaceScale {
    let side = width.min(height);
    let css_size = if side.is_finite() && side > 0.0 {
        side
    } else {
        LOGICAL_SIZE
    };
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let pixel_size = (css_size * dpr).round().max(1.0) as u32;
    SurfaceScale {
        css_size,
        device_pixel_ratio: dpr,
        pixel_size,
        scale: pixel_size as f64 / LOGICAL_SIZE,
    }
}

/// A canvas with its 2D context, scaled so drawing uses logical coordinates.
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scale: SurfaceScale,
}

impl Surface {
    pub fn attach(canvas: HtmlCanvasElement, scale: SurfaceScale) -> Result<Self, WheelError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(WheelError::SurfaceUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WheelError::SurfaceUnavailable)?;
        let surface = Self { canvas, ctx, scale };
        surface.apply_scale()?;
        Ok(surface)
    }

    pub fn scale(&self) -> SurfaceScale {
        self.scale
    }

    /// Re-fit the backing store. Returns `false` when nothing changed.
    pub fn rescale(&mut self, scale: SurfaceScale) -> Result<bool, WheelError> {
        if scale == self.scale {
            return Ok(false);
        }
        self.scale = scale;
        self.apply_scale()?;
        Ok(true)
    }

    // Resizing the canvas resets its transform, so both happen together.
    fn apply_scale(&self) -> Result<(), WheelError> {
        self.canvas.set_width(self.scale.pixel_size);
        self.canvas.set_height(self.scale.pixel_size);
        self.ctx
            .set_transform(self.scale.scale, 0.0, 0.0, self.scale.scale, 0.0, 0.0)?;
        info!(
            "Canvas scaled to {}px ({}css @ {}x)",
            self.scale.pixel_size, self.scale.css_size, self.scale.device_pixel_ratio
        );
        Ok(())
    }

    /// Replay `ops` in order.
    pub fn paint(&self, ops: &[DrawOp]) -> Result<(), WheelError> {
        for op in ops {
            self.paint_op(op)?;
        }
        Ok(())
    }

    fn paint_op(&self, op: &DrawOp) -> Result<(), WheelError> {
        let ctx = &self.ctx;
        match op {
            DrawOp::Clear => ctx.clear_rect(0.0, 0.0, LOGICAL_SIZE, LOGICAL_SIZE),
            DrawOp::Slice { start, end, fill } => {
                ctx.begin_path();
                ctx.move_to(CENTER, CENTER);
                ctx.arc(CENTER, CENTER, OUTER_RADIUS, *start, *end)?;
                ctx.close_path();
                ctx.set_fill_style_str(fill);
                ctx.fill();
                ctx.set_stroke_style_str(SLICE_STROKE);
                ctx.set_line_width(2.0);
                ctx.stroke();
            }
            DrawOp::Label {
                text,
                angle,
                color,
                shadow,
            } => {
                ctx.save();
                ctx.translate(CENTER, CENTER)?;
                ctx.rotate(*angle)?;
                ctx.set_text_align("right");
                ctx.set_text_baseline("middle");
                ctx.set_font(LABEL_FONT);
                ctx.set_fill_style_str(color);
                if *shadow {
                    ctx.set_shadow_color(LABEL_SHADOW);
                    ctx.set_shadow_blur(4.0);
                }
                let drawn = ctx.fill_text(text, OUTER_RADIUS - LABEL_INSET, 0.0);
                ctx.restore();
                drawn?;
            }
            DrawOp::Hub { radius, fill } => {
                ctx.begin_path();
                ctx.arc(CENTER, CENTER, *radius, 0.0, TAU)?;
                ctx.set_fill_style_str(fill);
                ctx.fill();
            }
            DrawOp::Pointer { fill } => {
                let tip = CENTER + OUTER_RADIUS - POINTER_LENGTH / 2.0;
                let base = CENTER + OUTER_RADIUS + POINTER_LENGTH / 2.0;
                ctx.begin_path();
                ctx.move_to(tip, CENTER);
                ctx.line_to(base, CENTER - POINTER_HALF_WIDTH);
                ctx.line_to(base, CENTER + POINTER_HALF_WIDTH);
                ctx.close_path();
                ctx.set_fill_style_str(fill);
                ctx.fill();
            }
            DrawOp::Placeholder {
                radius,
                fill,
                text,
                text_fill,
            } => {
                ctx.begin_path();
                ctx.arc(CENTER, CENTER, *radius, 0.0, TAU)?;
                ctx.set_fill_style_str(fill);
                ctx.fill();
                ctx.set_font(PLACEHOLDER_FONT);
                ctx.set_fill_style_str(text_fill);
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.fill_text(text, CENTER, CENTER)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_uses_smaller_container_side() {
        let s = compute_scale(800.0, 400.0, 1.0);
        assert_eq!(s.css_size, 400.0);
        assert_eq!(s.pixel_size, 400);
        assert!((s.scale - 400.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn scale_tracks_device_pixel_ratio() {
        let s = compute_scale(300.0, 300.0, 2.0);
        assert_eq!(s.pixel_size, 600);
        assert_eq!(s.scale, 1.0);

        let retina = compute_scale(600.0, 600.0, 3.0);
        assert_eq!(retina.pixel_size, 1800);
        assert_eq!(retina.scale, 3.0);
    }

    #[test]
    fn degenerate_inputs_fall_back() {
        let s = compute_scale(0.0, 0.0, f64::NAN);
        assert_eq!(s.css_size, LOGICAL_SIZE);
        assert_eq!(s.device_pixel_ratio, 1.0);
        assert_eq!(s.pixel_size, 600);
    }
}
