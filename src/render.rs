//! Wheel geometry and scene building.
//!
//! [`build_scene`] is a pure function of the entry list and the rotation: it
//! returns the ordered draw operations for one frame and never touches the
//! drawing surface. The canvas painter in `surface` replays them.

use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashSet;

/// Side of the logical drawing square.
pub const LOGICAL_SIZE: f64 = 600.0;
pub const CENTER: f64 = LOGICAL_SIZE / 2.0;
pub const OUTER_RADIUS: f64 = 270.0;
pub const HUB_RADIUS: f64 = 50.0;
/// Distance from the rim to the right edge of a label.
pub const LABEL_INSET: f64 = 40.0;

pub const LABEL_MAX_CHARS: usize = 14;
pub const LABEL_TRUNCATED_CHARS: usize = 12;
pub const ELLIPSIS: char = '…';

pub const PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#FFE66D", "#1A535C", "#FF9F43", "#54A0FF", "#5F27CD", "#C4E538",
];

pub const LIGHT_LABEL: &str = "#FFFFFF";
pub const DARK_LABEL: &str = "#1E272E";
pub const LABEL_SHADOW: &str = "rgba(0, 0, 0, 0.3)";
pub const SLICE_STROKE: &str = "#FFFFFF";
pub const HUB_FILL: &str = "#FFFFFF";
pub const POINTER_FILL: &str = "#2D3436";
pub const PLACEHOLDER_FILL: &str = "#E9ECEF";
pub const PLACEHOLDER_TEXT_FILL: &str = "#ADB5BD";
pub const PLACEHOLDER_TEXT: &str = "Add names to start";

// Fills bright enough that a white label would wash out.
static LIGHT_FILLS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["#4ECDC4", "#FFE66D", "#C4E538", "#FF9F43"].into_iter().collect());

/// One drawing step, in logical coordinates centred on the wheel hub.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Slice {
        start: f64,
        end: f64,
        fill: &'static str,
    },
    Label {
        text: String,
        /// Direction of the slice's bisector.
        angle: f64,
        color: &'static str,
        shadow: bool,
    },
    Hub {
        radius: f64,
        fill: &'static str,
    },
    Pointer {
        fill: &'static str,
    },
    Placeholder {
        radius: f64,
        fill: &'static str,
        text: &'static str,
        text_fill: &'static str,
    },
}

/// Palette colour for slice `index`.
#[inline]
pub fn slice_fill(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn is_light_fill(fill: &str) -> bool {
    LIGHT_FILLS.contains(fill)
}

/// Label foreground for a slice fill, and whether it needs a drop shadow.
pub fn label_style(fill: &str) -> (&'static str, bool) {
    if is_light_fill(fill) {
        (DARK_LABEL, false)
    } else {
        (LIGHT_LABEL, true)
    }
}

/// Shorten long names to fit inside a slice.
pub fn label_text(name: &str) -> Cow<'_, str> {
    if name.chars().count() <= LABEL_MAX_CHARS {
        return Cow::Borrowed(name);
    }
    let mut short: String = name.chars().take(LABEL_TRUNCATED_CHARS).collect();
    short.push(ELLIPSIS);
    Cow::Owned(short)
}

/// Build the draw list for `names` turned by `rotation` radians.
pub fn build_scene(names: &[String], rotation: f64) -> Vec<DrawOp> {
    let Some(arc) = crate::slice_width(names.len()) else {
        return vec![
            DrawOp::Clear,
            DrawOp::Placeholder {
                radius: OUTER_RADIUS,
                fill: PLACEHOLDER_FILL,
                text: PLACEHOLDER_TEXT,
                text_fill: PLACEHOLDER_TEXT_FILL,
            },
        ];
    };

    let mut ops = Vec::with_capacity(names.len() * 2 + 3);
    ops.push(DrawOp::Clear);

    for (i, name) in names.iter().enumerate() {
        let start = rotation + i as f64 * arc;
        let fill = slice_fill(i);
        let (color, shadow) = label_style(fill);
        ops.push(DrawOp::Slice {
            start,
            end: start + arc,
            fill,
        });
        ops.push(DrawOp::Label {
            text: label_text(name).into_owned(),
            angle: start + arc / 2.0,
            color,
            shadow,
        });
    }

    ops.push(DrawOp::Hub {
        radius: HUB_RADIUS,
        fill: HUB_FILL,
    });
    ops.push(DrawOp::Pointer { fill: POINTER_FILL });
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let ops = build_scene(&[], 1.234);
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[1], DrawOp::Placeholder { text, .. } if text == PLACEHOLDER_TEXT));
    }

    #[test]
    fn slices_tile_the_circle_in_order() {
        let list = names(&["A", "B", "C", "D", "E"]);
        let rotation = 0.75;
        let ops = build_scene(&list, rotation);
        let slices: Vec<(f64, f64, &str)> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Slice { start, end, fill } => Some((*start, *end, *fill)),
                _ => None,
            })
            .collect();

        assert_eq!(slices.len(), list.len());
        assert!((slices[0].0 - rotation).abs() < 1e-12);
        for pair in slices.windows(2) {
            assert!((pair[0].1 - pair[1].0).abs() < 1e-12);
        }
        assert!((slices[4].1 - (rotation + TAU)).abs() < 1e-9);
        for (i, slice) in slices.iter().enumerate() {
            assert_eq!(slice.2, PALETTE[i]);
        }
    }

    #[test]
    fn hub_is_drawn_after_slices() {
        let ops = build_scene(&names(&["A", "B"]), 0.0);
        let hub = ops.iter().position(|op| matches!(op, DrawOp::Hub { .. })).unwrap();
        let last_slice = ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Slice { .. } | DrawOp::Label { .. }))
            .unwrap();
        assert!(hub > last_slice);
        assert!(matches!(ops[hub], DrawOp::Hub { radius, .. } if radius == HUB_RADIUS));
    }

    #[test]
    fn palette_wraps_past_its_length() {
        assert_eq!(slice_fill(0), slice_fill(PALETTE.len()));
        assert_eq!(slice_fill(3), slice_fill(3 + 2 * PALETTE.len()));
    }

    #[test]
    fn light_fills_get_dark_labels() {
        assert_eq!(label_style("#FFE66D"), (DARK_LABEL, false));
        assert_eq!(label_style("#4ECDC4"), (DARK_LABEL, false));
        assert_eq!(label_style("#1A535C"), (LIGHT_LABEL, true));
        assert_eq!(label_style("#5F27CD"), (LIGHT_LABEL, true));
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(label_text("Fourteen chars"), "Fourteen chars");
        assert_eq!(label_text("Fifteen chars!!"), "Fifteen char…");
        assert_eq!(label_text("Élodie-Françoise Dupont"), "Élodie-Franç…");
        assert!(matches!(label_text("Ali"), Cow::Borrowed(_)));
    }

    #[test]
    fn scene_is_idempotent() {
        let list = names(&["Ali", "Beatriz", "Charles"]);
        assert_eq!(build_scene(&list, 42.0), build_scene(&list, 42.0));
    }

    #[test]
    fn labels_sit_on_slice_bisectors() {
        let list = names(&["A", "B", "C", "D"]);
        let ops = build_scene(&list, 0.0);
        let angles: Vec<f64> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Label { angle, .. } => Some(*angle),
                _ => None,
            })
            .collect();
        let arc = TAU / 4.0;
        for (i, angle) in angles.iter().enumerate() {
            assert!((angle - (i as f64 + 0.5) * arc).abs() < 1e-12);
        }
    }
}
