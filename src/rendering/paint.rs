/// Display list built from a scene, executed in order by the rasterizer

use crate::scene::{Rgb, Scene};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    FillPolygon {
        points: Vec<(i32, i32)>,
        color: Rgb,
    },
    StrokePolygon {
        points: Vec<(i32, i32)>,
        color: Rgb,
    },
    FillEllipse {
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Rgb,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: Rgb,
    },
}

impl PaintCommand {
    /// Best-effort commands may fail without failing the render.
    pub fn is_best_effort(&self) -> bool {
        matches!(self, PaintCommand::Text { .. })
    }
}

/// Island fill, island outline, marker, then one text command per label.
pub fn build_display_list(scene: &Scene) -> Vec<PaintCommand> {
    let mut cmds = vec![
        PaintCommand::FillPolygon {
            points: scene.island.points.clone(),
            color: scene.island.fill,
        },
        PaintCommand::StrokePolygon {
            points: scene.island.points.clone(),
            color: scene.island.outline,
        },
        PaintCommand::FillEllipse {
            top_left: scene.marker.top_left,
            bottom_right: scene.marker.bottom_right,
            color: scene.marker.fill,
        },
    ];
    cmds.extend(scene.labels.iter().map(|l| PaintCommand::Text {
        x: l.position.0,
        y: l.position.1,
        text: l.text.clone(),
        color: l.color,
    }));
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_list_orders_shapes_before_labels() {
        let cmds = build_display_list(&Scene::mauritius());
        assert_eq!(cmds.len(), 5);
        assert!(matches!(cmds[0], PaintCommand::FillPolygon { .. }));
        assert!(matches!(cmds[1], PaintCommand::StrokePolygon { .. }));
        assert!(matches!(cmds[2], PaintCommand::FillEllipse { .. }));
        assert!(cmds[..3].iter().all(|c| !c.is_best_effort()));
        match &cmds[3] {
            PaintCommand::Text { text, x, y, .. } => {
                assert_eq!(text, "Port Louis");
                assert_eq!((*x, *y), (130, 105));
            }
            _ => panic!("unexpected"),
        }
        assert!(cmds[4].is_best_effort());
    }

    #[test]
    fn scene_without_labels_has_only_shapes() {
        let mut scene = Scene::mauritius();
        scene.labels.clear();
        assert_eq!(build_display_list(&scene).len(), 3);
    }
}
