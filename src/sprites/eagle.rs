use crate::constants::{colors, depths};
use crate::stage::{Handle, Stage};
use crate::surface::Surface;

/// White eagle with a golden crown, drawn around its own origin.
pub fn draw_eagle(g: &mut dyn Surface) {
    g.clear();

    // Body and head
    g.fill_style(colors::WHITE, 1.0);
    g.fill_rect(-12.0, -20.0, 24.0, 36.0);
    g.fill_circle(0.0, -30.0, 12.0);

    // Stepped wings, three tiers per side
    for (dx, y, w, h) in [(40.0, -18.0, 28.0, 12.0), (34.0, -6.0, 22.0, 10.0), (28.0, 4.0, 16.0, 8.0)] {
        g.fill_rect(-dx, y, w, h);
        g.fill_rect(12.0, y, w, h);
    }

    // Shield on the chest
    g.fill_style(colors::RED, 1.0);
    g.fill_rect(-8.0, -10.0, 16.0, 20.0);
    g.fill_style(colors::WHITE, 1.0);
    g.fill_rect(-8.0, -10.0, 16.0, 10.0);

    // Crown
    g.fill_style(colors::GOLD, 1.0);
    g.fill_rect(-10.0, -46.0, 20.0, 8.0);
    g.fill_rect(-10.0, -54.0, 4.0, 10.0);
    g.fill_rect(-2.0, -56.0, 4.0, 12.0);
    g.fill_rect(6.0, -54.0, 4.0, 10.0);

    // Beak and talons
    g.fill_rect(8.0, -32.0, 8.0, 5.0);
    for (x, y, w) in [(-14.0, 16.0, 6.0), (-16.0, 20.0, 4.0), (-10.0, 20.0, 4.0), (8.0, 16.0, 6.0), (12.0, 20.0, 4.0), (6.0, 20.0, 4.0)] {
        g.fill_rect(x, y, w, 4.0);
    }

    g.fill_style(colors::BG_BASE, 1.0);
    g.fill_circle(5.0, -32.0, 3.0);
}

pub struct PolishEagle {
    container: Handle,
    gfx: Handle,
}

impl PolishEagle {
    pub fn new(stage: &mut Stage, x: f32, y: f32, scale: f32) -> PolishEagle {
        let gfx = stage.graphics(0.0, 0.0);
        if let Some(g) = gfx.borrow_mut().graphics_mut() {
            draw_eagle(g);
        }

        let container = stage.container(x, y);
        {
            let mut c = container.borrow_mut();
            c.add_child(gfx.clone());
            c.set_scale(scale).set_depth(depths::SPRITES);
        }
        stage.add(&container);

        PolishEagle { container, gfx }
    }

    pub fn container(&self) -> &Handle {
        &self.container
    }

    pub fn destroy(self, stage: &mut Stage) {
        stage.destroy(&self.gfx);
        stage.destroy(&self.container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, CallLog};

    #[test]
    fn eagle_is_symmetric_around_the_origin() {
        let mut log = CallLog::default();
        draw_eagle(&mut log);
        assert_eq!(log.calls[0], Call::Clear);
        // Wing tiers come in mirrored pairs
        let wings: Vec<_> = log
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Fill("rect", v) if v[2] >= 16.0 && v[3] <= 12.0 && (v[0] <= -28.0 || v[0] == 12.0) => Some(v.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(wings.len(), 6);
        for pair in wings.chunks(2) {
            assert_eq!(pair[0][0] + pair[0][2], -12.0);
            assert_eq!(pair[1][0], 12.0);
        }
    }

    #[test]
    fn destroy_releases_stage_objects() {
        let mut stage = Stage::new();
        let eagle = PolishEagle::new(&mut stage, 1050.0, 310.0, 1.6);
        assert_eq!(stage.len(), 1);
        assert_eq!(eagle.container().borrow().scale, 1.6);
        eagle.destroy(&mut stage);
        assert!(stage.is_empty());
    }
}
