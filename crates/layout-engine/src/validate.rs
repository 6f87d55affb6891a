//! Eager parameter checks, run before any layout or geometry work.

use tray_types::{BoxParams, LidParams, TrayParams};

use crate::error::{require_non_negative, require_positive, LayoutError, Result};

pub fn validate_tray_params(params: &TrayParams, subject: &str) -> Result<()> {
    require_positive(subject, "counter thickness", params.counter_thickness)?;
    require_positive(subject, "wall thickness", params.wall_thickness)?;
    require_positive(subject, "floor thickness", params.floor_thickness)?;
    require_non_negative(subject, "clearance", params.clearance)?;
    require_non_negative(subject, "rim height", params.rim_height)?;
    require_non_negative(subject, "cutout ratio", params.cutout_ratio)?;
    require_non_negative(subject, "cutout max", params.cutout_max)?;

    if params.stack_count() == 0 {
        return Err(LayoutError::invalid(subject, "tray has no stacks"));
    }
    let counts = params
        .top_loaded_stacks
        .iter()
        .map(|s| (s.count, s.shape.to_string()))
        .chain(
            params
                .edge_loaded_stacks
                .iter()
                .map(|s| (s.count, s.shape.to_string())),
        );
    for (count, shape) in counts {
        if count == 0 {
            return Err(LayoutError::invalid(
                subject,
                format!("stack of '{shape}' has a count of zero"),
            ));
        }
    }
    Ok(())
}

/// Box-level checks that do not depend on the computed exterior.
pub fn validate_box_params(params: &BoxParams, subject: &str) -> Result<()> {
    require_positive(subject, "wall thickness", params.wall_thickness)?;
    require_positive(subject, "floor thickness", params.floor_thickness)?;
    require_non_negative(subject, "tolerance", params.tolerance)?;
    require_non_negative(subject, "poke hole diameter", params.poke_hole_diameter)?;
    if params.trays.is_empty() {
        return Err(LayoutError::invalid(subject, "box has no trays"));
    }
    validate_lid_params(&params.lid, params.wall_thickness, subject)
}

fn validate_lid_params(lid: &LidParams, wall: f64, subject: &str) -> Result<()> {
    require_positive(subject, "lid thickness", lid.thickness)?;
    require_positive(subject, "lid ledge height", lid.ledge_height)?;
    require_positive(subject, "lid rail inset", lid.rail_inset)?;
    require_non_negative(subject, "lid rail height", lid.rail_height)?;
    require_non_negative(subject, "lid clearance", lid.clearance)?;

    if lid.rail_inset >= wall {
        return Err(LayoutError::invalid(
            subject,
            format!(
                "lid rail inset {}mm must be thinner than the {}mm wall",
                lid.rail_inset, wall
            ),
        ));
    }
    if lid.snap_enabled {
        require_positive(subject, "snap bump height", lid.snap_bump_height)?;
        require_positive(subject, "snap bump width", lid.snap_bump_width)?;
        if !(lid.rail_engagement > 0.0 && lid.rail_engagement <= 1.0) {
            return Err(LayoutError::invalid(
                subject,
                format!(
                    "rail engagement must be within (0, 1], got {}",
                    lid.rail_engagement
                ),
            ));
        }
        let groove_depth = lid.groove_depth();
        if groove_depth >= wall - lid.rail_inset {
            return Err(LayoutError::invalid(
                subject,
                format!(
                    "groove depth {groove_depth}mm leaves no inner wall behind the lid seat"
                ),
            ));
        }
        if lid.groove_height() <= groove_depth + lid.clearance {
            return Err(LayoutError::invalid(
                subject,
                format!(
                    "groove height {}mm is too short for a {groove_depth}mm deep chamfered rail",
                    lid.groove_height()
                ),
            ));
        }
    } else if lid.ramp_lock_enabled {
        require_positive(subject, "ramp height", lid.ramp_height)?;
        require_positive(subject, "ramp length", lid.ramp_length)?;
        if lid.ramp_length > wall {
            return Err(LayoutError::invalid(
                subject,
                format!(
                    "ramp length {}mm exceeds the {}mm entry wall",
                    lid.ramp_length, wall
                ),
            ));
        }
    }
    Ok(())
}

/// Checks that need the final box height.
pub fn validate_lid_fit(lid: &LidParams, box_height: f64, floor: f64, subject: &str) -> Result<()> {
    if lid.ledge_height >= box_height - floor {
        return Err(LayoutError::invalid(
            subject,
            format!(
                "lid ledge height {}mm reaches the {}mm floor of a {}mm box",
                lid.ledge_height, floor, box_height
            ),
        ));
    }
    Ok(())
}
