use std::rc::Rc;

use log::debug;

use crate::constants::{colors, depths, layout, modal_description_style};
use crate::data::BattleEntry;
use crate::stage::{Handle, ObjectId, Rect, Stage};
use crate::surface::Surface;
use crate::text::{TextMetrics, TextStyle};

pub const CLOSE_LABEL: &str = "[ CLOSE ]";
pub const CLOSE_KEY: &str = "Escape";

/// Full-screen detail view for one battle. The overlay swallows pointer
/// input so nothing underneath reacts while it is open.
pub struct BattleModal {
    entry: Rc<BattleEntry>,
    overlay: Handle,
    panel: Handle,
    texts: Vec<Handle>,
    close_button: Handle,
}

impl BattleModal {
    pub fn new(
        stage: &mut Stage,
        entry: Rc<BattleEntry>,
        width: f32,
        height: f32,
        metrics: &dyn TextMetrics,
    ) -> BattleModal {
        let (cx, cy) = (width / 2.0, height / 2.0);

        let overlay = stage.graphics(0.0, 0.0);
        {
            let mut o = overlay.borrow_mut();
            if let Some(g) = o.graphics_mut() {
                g.fill_style(colors::MODAL_OVERLAY, 0.75);
                g.fill_rect(0.0, 0.0, width, height);
            }
            o.set_depth(depths::MODAL).set_hit_area(Rect::new(0.0, 0.0, width, height));
        }
        stage.add(&overlay);

        let panel = stage.graphics(cx, cy);
        {
            let mut p = panel.borrow_mut();
            if let Some(g) = p.graphics_mut() {
                let (pw, ph) = (layout::MODAL_PANEL_WIDTH, layout::MODAL_PANEL_HEIGHT);
                g.fill_style(colors::BG_PANEL, 1.0);
                g.fill_rect(-pw / 2.0, -ph / 2.0, pw, ph);
                g.line_style(2.0, colors::GOLD, 0.8);
                g.stroke_rect(-pw / 2.0, -ph / 2.0, pw, ph);
            }
            p.set_depth(depths::MODAL_CONTENT);
        }
        stage.add(&panel);

        let mut centered = |y: f32, content: &str, style: TextStyle| {
            let t = stage.text(cx, cy + y, content, style);
            t.borrow_mut().set_origin(0.5, 0.5).set_depth(depths::MODAL_CONTENT);
            stage.add(&t);
            t
        };
        let texts = vec![
            centered(layout::MODAL_TITLE_OFFSET_Y, &entry.name, TextStyle::sized(32.0, colors::GOLD)),
            centered(layout::MODAL_YEAR_OFFSET_Y, &entry.year.to_string(), TextStyle::sized(20.0, colors::WHITE)),
            centered(layout::MODAL_DESC_OFFSET_Y, &entry.description, modal_description_style()),
        ];

        let close_style = TextStyle::sized(20.0, colors::RED);
        let close_size = crate::text::layout(CLOSE_LABEL, &close_style, metrics);
        let close_button = centered(layout::MODAL_CLOSE_OFFSET_Y, CLOSE_LABEL, close_style);
        close_button
            .borrow_mut()
            .set_hit_area(Rect::centered(close_size.width, close_size.height));

        debug!("modal opened for {} ({})", entry.name, entry.year);
        BattleModal { entry, overlay, panel, texts, close_button }
    }

    pub fn entry(&self) -> &Rc<BattleEntry> {
        &self.entry
    }

    pub fn close_button_id(&self) -> ObjectId {
        self.close_button.borrow().id()
    }

    pub fn overlay_id(&self) -> ObjectId {
        self.overlay.borrow().id()
    }

    pub fn closes_on_key(&self, key: &str) -> bool {
        key == CLOSE_KEY
    }

    pub fn destroy(self, stage: &mut Stage) {
        stage.destroy(&self.close_button);
        for t in &self.texts {
            stage.destroy(t);
        }
        stage.destroy(&self.panel);
        stage.destroy(&self.overlay);
        debug!("modal closed for {}", self.entry.name);
    }
}
