//! Winged hussar gallop, synthesized frame by frame.
//!
//! Every frame is the same figure; only the legs and the wing feathers move,
//! both driven by one sine over the frame phase.

use std::f32::consts::TAU;

use log::debug;

use crate::surface::{Graphics, PixelBuffer, Surface};
use crate::textures::{AnimationDef, TextureRegistry};

pub const FRAME_WIDTH: u32 = 120;
pub const FRAME_HEIGHT: u32 = 140;
pub const FRAMES: u32 = 8;
pub const FRAME_RATE: f32 = 12.0;
pub const ANIM_KEY: &str = "hussar-gallop";

const HORSE: u32 = 0x8b4513;
const HORSE_LEGS: u32 = 0x7a3b10;
const COAT: u32 = 0xdc143c;
const STEEL: u32 = 0xc0c0c0;
const CREST: u32 = 0x8b0000;
const FEATHER: u32 = 0xf5deb3;
const LANCE: u32 = 0xdaa520;

pub fn frame_key(index: u32) -> String {
    format!("hussar-frame-{}", index)
}

/// Animation parameters for one point of the gallop cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Phase {
    /// Cycle position in 0..=1.
    pub t: f32,
    /// -1..=1, horizontal leg swing.
    pub leg_sway: f32,
    /// -4..=4 px, vertical feather offset.
    pub wing_bob: f32,
}

impl Phase {
    pub fn at(t: f32) -> Phase {
        let s = (TAU * t).sin();
        Phase { t, leg_sway: s, wing_bob: 4.0 * s }
    }

    pub fn of_frame(frame_index: u32) -> Phase {
        let index = frame_index.min(FRAMES - 1);
        Phase::at(index as f32 / (FRAMES - 1) as f32)
    }
}

/// Draw frame `frame_index` (0..8, larger values clamp to the last frame).
/// Clears the surface first; the same index always issues the same calls.
pub fn render_hussar_frame(surface: &mut dyn Surface, frame_index: u32) {
    surface.clear();

    let phase = Phase::of_frame(frame_index);

    // Horse body and head
    surface.fill_style(HORSE, 1.0);
    surface.fill_ellipse(60.0, 100.0, 70.0, 35.0);
    surface.fill_rect(84.0, 72.0, 22.0, 18.0);
    surface.fill_rect(92.0, 62.0, 14.0, 14.0);

    // Legs swing in alternating pairs
    surface.fill_style(HORSE_LEGS, 1.0);
    let leg = phase.leg_sway * 6.0;
    surface.fill_rect(35.0 + leg, 112.0, 8.0, 24.0);
    surface.fill_rect(48.0 - leg, 112.0, 8.0, 24.0);
    surface.fill_rect(65.0 + leg, 112.0, 8.0, 24.0);
    surface.fill_rect(78.0 - leg, 112.0, 8.0, 24.0);

    // Rider
    surface.fill_style(COAT, 1.0);
    surface.fill_rect(44.0, 50.0, 28.0, 40.0);
    surface.fill_style(STEEL, 1.0);
    surface.fill_rect(47.0, 52.0, 22.0, 28.0);
    surface.fill_circle(58.0, 40.0, 12.0);
    surface.fill_style(CREST, 1.0);
    surface.fill_rect(54.0, 28.0, 8.0, 10.0);

    // Wings: five feathers a side, fanning outwards
    surface.fill_style(FEATHER, 1.0);
    for i in 0..5 {
        let fi = i as f32;
        let wy = 45.0 + fi * 8.0 + phase.wing_bob;
        surface.fill_rect(24.0 - fi * 2.0, wy, 4.0, 18.0);
        surface.fill_rect(88.0 + fi * 2.0, wy, 4.0, 18.0);
    }

    surface.fill_style(LANCE, 1.0);
    surface.fill_rect(78.0, 20.0, 3.0, 60.0);

    surface.fill_style(COAT, 0.8);
    surface.fill_rect(36.0, 55.0, 10.0, 30.0);
}

/// Bake all gallop frames into the registry and register the looping
/// animation. Keys that already exist are skipped, so calling this on every
/// boot is cheap.
pub fn generate_hussar_frames(registry: &mut TextureRegistry) {
    for i in 0..FRAMES {
        let key = frame_key(i);
        if registry.exists(&key) {
            continue;
        }

        let mut gfx = Graphics::new();
        render_hussar_frame(&mut gfx, i);
        let mut frame = PixelBuffer::new(FRAME_WIDTH, FRAME_HEIGHT);
        gfx.replay(&mut frame);
        registry.insert(&key, frame);
    }

    if registry.anim_exists(ANIM_KEY) {
        return;
    }
    registry.create_anim(AnimationDef {
        key: ANIM_KEY.to_string(),
        frames: (0..FRAMES).map(frame_key).collect(),
        frame_rate: FRAME_RATE,
    });
    debug!("registered {}", ANIM_KEY);
}
