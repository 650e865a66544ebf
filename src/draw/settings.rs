use serde::{Deserialize, Serialize};

const MIN_CIRCLE_CLIP_SEGMENT_LENGTH: f64 = 0.5;

/// Tunables for handle geometry, snapping, nudging and clip previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Side of a resize handle square, in canvas units.
    #[serde(default = "default_handle_size")]
    pub handle_size: f64,
    /// Extra slop around each handle that still counts as a hit.
    #[serde(default = "default_handle_hit_pad")]
    pub handle_hit_pad: f64,
    /// Distance of the rotation knob above the selection box top edge.
    #[serde(default = "default_rotate_handle_offset")]
    pub rotate_handle_offset: f64,
    #[serde(default = "default_rotate_stem_hit_radius")]
    pub rotate_stem_hit_radius: f64,
    #[serde(default = "default_snap_angle_degrees")]
    pub snap_angle_degrees: f64,
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,
    #[serde(default = "default_nudge_step_fast")]
    pub nudge_step_fast: f64,
    #[serde(default = "default_clip_min_size")]
    pub clip_min_size: f64,
    /// Longest polygon edge used to approximate a circle for clipping.
    #[serde(default = "default_circle_clip_segment_length")]
    pub circle_clip_segment_length: f64,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_handle_size() -> f64 {
    10.0
}

fn default_handle_hit_pad() -> f64 {
    4.0
}

fn default_rotate_handle_offset() -> f64 {
    26.0
}

fn default_rotate_stem_hit_radius() -> f64 {
    6.0
}

fn default_snap_angle_degrees() -> f64 {
    15.0
}

fn default_nudge_step() -> f64 {
    1.0
}

fn default_nudge_step_fast() -> f64 {
    10.0
}

fn default_clip_min_size() -> f64 {
    1.0
}

fn default_circle_clip_segment_length() -> f64 {
    4.0
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            handle_size: default_handle_size(),
            handle_hit_pad: default_handle_hit_pad(),
            rotate_handle_offset: default_rotate_handle_offset(),
            rotate_stem_hit_radius: default_rotate_stem_hit_radius(),
            snap_angle_degrees: default_snap_angle_degrees(),
            nudge_step: default_nudge_step(),
            nudge_step_fast: default_nudge_step_fast(),
            clip_min_size: default_clip_min_size(),
            circle_clip_segment_length: default_circle_clip_segment_length(),
            debug_logging: false,
        }
    }
}

impl CanvasSettings {
    pub fn nudge_step_for(&self, fast: bool) -> f64 {
        if fast {
            self.nudge_step_fast
        } else {
            self.nudge_step
        }
    }

    /// Replaces non-finite or out-of-range values with their defaults.
    /// Returns whether anything changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;

        changed |= reset_unless(&mut self.handle_size, default_handle_size(), |v| v > 0.0);
        changed |= reset_unless(&mut self.handle_hit_pad, default_handle_hit_pad(), |v| {
            v >= 0.0
        });
        changed |= reset_unless(
            &mut self.rotate_handle_offset,
            default_rotate_handle_offset(),
            |v| v > 0.0,
        );
        changed |= reset_unless(
            &mut self.rotate_stem_hit_radius,
            default_rotate_stem_hit_radius(),
            |v| v >= 0.0,
        );
        // Zero disables snapping; anything past a half turn is meaningless.
        changed |= reset_unless(
            &mut self.snap_angle_degrees,
            default_snap_angle_degrees(),
            |v| (0.0..=180.0).contains(&v),
        );
        changed |= reset_unless(&mut self.nudge_step, default_nudge_step(), |v| v > 0.0);
        changed |= reset_unless(&mut self.nudge_step_fast, default_nudge_step_fast(), |v| {
            v > 0.0
        });
        changed |= reset_unless(&mut self.clip_min_size, default_clip_min_size(), |v| {
            v >= 0.0
        });
        changed |= reset_unless(
            &mut self.circle_clip_segment_length,
            default_circle_clip_segment_length(),
            |v| v >= MIN_CIRCLE_CLIP_SEGMENT_LENGTH,
        );

        changed
    }
}

fn reset_unless(value: &mut f64, default: f64, valid: impl Fn(f64) -> bool) -> bool {
    if value.is_finite() && valid(*value) {
        return false;
    }
    tracing::warn!(invalid = *value, default, "resetting canvas setting to default");
    *value = default;
    true
}
