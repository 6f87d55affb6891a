//! Data-layer migrations for shape references.
//!
//! Deleting a custom shape rewrites every stack that referenced it to the
//! built-in square. That compatibility rule lives here, as an explicit step,
//! so the layout planner can treat every reference as valid.

use crate::box_params::BoxParams;
use crate::shape::{BuiltinShape, ShapeRef};
use crate::tray::TrayParams;

impl TrayParams {
    /// Point every stack that references `old` at `fallback`.
    /// Returns how many stacks were rewritten.
    pub fn replace_shape_references(&mut self, old: &ShapeRef, fallback: &ShapeRef) -> usize {
        let mut replaced = 0;
        let top = self.top_loaded_stacks.iter_mut().map(|s| &mut s.shape);
        let edge = self.edge_loaded_stacks.iter_mut().map(|s| &mut s.shape);
        for shape in top.chain(edge) {
            if shape == old {
                *shape = fallback.clone();
                replaced += 1;
            }
        }
        replaced
    }

    /// Remove a custom shape definition and migrate its references to the
    /// built-in square. Returns the number of migrated stacks, or `None` if
    /// no shape with that name exists.
    pub fn delete_custom_shape(&mut self, name: &str) -> Option<usize> {
        let index = self.custom_shapes.iter().position(|s| s.name == name)?;
        self.custom_shapes.remove(index);
        Some(self.replace_shape_references(
            &ShapeRef::custom(name),
            &ShapeRef::Builtin(BuiltinShape::Square),
        ))
    }
}

impl BoxParams {
    /// Apply [`TrayParams::replace_shape_references`] to every tray.
    pub fn replace_shape_references(&mut self, old: &ShapeRef, fallback: &ShapeRef) -> usize {
        self.trays
            .iter_mut()
            .map(|tray| tray.params.replace_shape_references(old, fallback))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CustomShape;
    use crate::stack::{EdgeLoadedStack, TopLoadedStack};
    use crate::tray::Tray;

    fn params_with_custom() -> TrayParams {
        TrayParams {
            custom_shapes: vec![CustomShape::rectangle("Card", 40.0, 60.0)],
            top_loaded_stacks: vec![
                TopLoadedStack::new(ShapeRef::custom("Card"), 4),
                TopLoadedStack::new(BuiltinShape::Hex, 10),
            ],
            edge_loaded_stacks: vec![EdgeLoadedStack::crosswise(ShapeRef::custom("Card"), 20)],
            ..TrayParams::default()
        }
    }

    #[test]
    fn delete_custom_shape_falls_back_to_square() {
        let mut params = params_with_custom();
        assert_eq!(params.delete_custom_shape("Card"), Some(2));
        assert!(params.custom_shapes.is_empty());
        assert_eq!(params.top_loaded_stacks[0].shape, ShapeRef::Builtin(BuiltinShape::Square));
        assert_eq!(params.top_loaded_stacks[1].shape, ShapeRef::Builtin(BuiltinShape::Hex));
        assert_eq!(params.edge_loaded_stacks[0].shape, ShapeRef::Builtin(BuiltinShape::Square));
    }

    #[test]
    fn delete_unknown_shape_is_noop() {
        let mut params = params_with_custom();
        assert_eq!(params.delete_custom_shape("Missing"), None);
        assert_eq!(params.custom_shapes.len(), 1);
    }

    #[test]
    fn box_level_replacement_counts_all_trays() {
        let mut b = BoxParams::new("Game")
            .with_tray(Tray::new("A", params_with_custom()))
            .with_tray(Tray::new("B", params_with_custom()));
        let n = b.replace_shape_references(
            &ShapeRef::custom("Card"),
            &ShapeRef::Builtin(BuiltinShape::Circle),
        );
        assert_eq!(n, 4);
    }
}
