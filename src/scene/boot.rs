use log::info;

use crate::sprites::generate_hussar_frames;
use crate::textures::TextureRegistry;

/// Everything the menu draws is generated in code, so booting only bakes
/// the sprite textures. Safe to run again on every restart.
pub fn boot(registry: &mut TextureRegistry) {
    let before = registry.texture_count();
    generate_hussar_frames(registry);
    info!(
        "boot: {} textures ({} new), {} animations",
        registry.texture_count(),
        registry.texture_count() - before,
        registry.anim_count()
    );
}
