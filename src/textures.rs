use std::collections::HashMap;

use log::debug;

use crate::surface::PixelBuffer;

/// A looping sequence of texture keys played at a fixed rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDef {
    pub key: String,
    pub frames: Vec<String>,
    pub frame_rate: f32,
}

impl AnimationDef {
    /// Frame position after `elapsed_ms` of playback.
    pub fn frame_index(&self, elapsed_ms: f64) -> usize {
        let len = self.frames.len();
        if len == 0 || self.frame_rate <= 0.0 {
            return 0;
        }
        let ticks = (elapsed_ms.max(0.0) * self.frame_rate as f64 / 1000.0).floor() as usize;
        ticks % len
    }

    pub fn frame_at(&self, elapsed_ms: f64) -> Option<&str> {
        self.frames.get(self.frame_index(elapsed_ms)).map(String::as_str)
    }
}

/// Baked textures and animations, keyed by name. Lives as long as the game
/// so screens can be re-entered without regenerating anything.
#[derive(Default)]
pub struct TextureRegistry {
    textures: HashMap<String, PixelBuffer>,
    anims: HashMap<String, AnimationDef>,
}

impl TextureRegistry {
    pub fn new() -> TextureRegistry {
        TextureRegistry::default()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    /// Store a texture. An existing key is left untouched and false is returned.
    pub fn insert(&mut self, key: &str, texture: PixelBuffer) -> bool {
        if self.exists(key) {
            return false;
        }
        debug!("texture {} ({}x{})", key, texture.width, texture.height);
        self.textures.insert(key.to_string(), texture);
        true
    }

    pub fn get(&self, key: &str) -> Option<&PixelBuffer> {
        self.textures.get(key)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn anim_exists(&self, key: &str) -> bool {
        self.anims.contains_key(key)
    }

    pub fn create_anim(&mut self, def: AnimationDef) -> bool {
        if self.anim_exists(&def.key) {
            return false;
        }
        debug!("animation {} ({} frames @ {} fps)", def.key, def.frames.len(), def.frame_rate);
        self.anims.insert(def.key.clone(), def);
        true
    }

    pub fn anim(&self, key: &str) -> Option<&AnimationDef> {
        self.anims.get(key)
    }

    pub fn anim_count(&self) -> usize {
        self.anims.len()
    }
}

/// Playback position of one animation on one sprite.
#[derive(Clone, Debug)]
pub struct AnimationPlayer {
    pub key: String,
    elapsed_ms: f64,
}

impl AnimationPlayer {
    pub fn new(key: &str) -> AnimationPlayer {
        AnimationPlayer { key: key.to_string(), elapsed_ms: 0.0 }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms.max(0.0);
    }

    /// Texture key to display now, if the animation is registered.
    pub fn current_frame<'a>(&self, registry: &'a TextureRegistry) -> Option<&'a str> {
        registry.anim(&self.key)?.frame_at(self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallop() -> AnimationDef {
        AnimationDef {
            key: "gallop".into(),
            frames: (0..8).map(|i| format!("f{}", i)).collect(),
            frame_rate: 12.0,
        }
    }

    #[test]
    fn loops_forever_at_frame_rate() {
        let def = gallop();
        assert_eq!(def.frame_index(0.0), 0);
        assert_eq!(def.frame_index(84.0), 1);
        assert_eq!(def.frame_index(1000.0 * 7.0 / 12.0 + 1.0), 7);
        assert_eq!(def.frame_index(1000.0 * 8.0 / 12.0 + 1.0), 0);
    }

    #[test]
    fn degenerate_animations_stay_on_first_frame() {
        let mut def = gallop();
        def.frame_rate = 0.0;
        assert_eq!(def.frame_at(5_000.0), Some("f0"));
        def.frames.clear();
        assert_eq!(def.frame_at(5_000.0), None);
    }

    #[test]
    fn insert_does_not_overwrite() {
        let mut reg = TextureRegistry::new();
        assert!(reg.insert("a", PixelBuffer::new(1, 1)));
        assert!(!reg.insert("a", PixelBuffer::new(2, 2)));
        assert_eq!(reg.get("a").map(|t| t.width), Some(1));
        assert_eq!(reg.texture_count(), 1);
    }

    #[test]
    fn player_reads_registered_animation() {
        let mut reg = TextureRegistry::new();
        let mut player = AnimationPlayer::new("gallop");
        assert_eq!(player.current_frame(&reg), None);

        assert!(reg.create_anim(gallop()));
        let mut faster = gallop();
        faster.frame_rate = 24.0;
        assert!(!reg.create_anim(faster));
        player.advance(250.0);
        assert_eq!(player.current_frame(&reg), Some("f3"));
    }
}
