use std::rc::Rc;

use log::info;

use crate::config::GameConfig;
use crate::data::BattleEntry;
use crate::input::Pointer;
use crate::scene::{boot, MenuScene};
use crate::text::TextMetrics;
use crate::textures::TextureRegistry;

/// Owns what outlives a single screen (config, battle data, textures) and
/// the currently running menu.
pub struct Game {
    config: GameConfig,
    battles: Vec<BattleEntry>,
    metrics: Rc<dyn TextMetrics>,
    registry: TextureRegistry,
    menu: Option<MenuScene>,
    menu_starts: u32,
}

impl Game {
    pub fn new(config: GameConfig, battles: Vec<BattleEntry>, metrics: Rc<dyn TextMetrics>) -> Game {
        Game {
            config,
            battles,
            metrics,
            registry: TextureRegistry::new(),
            menu: None,
            menu_starts: 0,
        }
    }

    /// Boot scene, then straight into the menu.
    pub fn boot(&mut self) {
        boot(&mut self.registry);
        self.start_menu();
    }

    /// (Re)enter the menu, tearing the previous instance down first.
    pub fn start_menu(&mut self) {
        if let Some(mut old) = self.menu.take() {
            old.shutdown();
        }
        // Textures survive reloads; this only fills gaps
        boot(&mut self.registry);
        self.menu = Some(MenuScene::create(&self.config, &self.battles, self.metrics.clone()));
        self.menu_starts += 1;
        info!("menu started (#{})", self.menu_starts);
    }

    pub fn update(&mut self, dt_ms: f64) {
        if let Some(menu) = self.menu.as_mut() {
            menu.update(dt_ms, &self.registry);
        }
    }

    pub fn pointer_move(&mut self, pointer: Pointer) {
        if let Some(menu) = self.menu.as_mut() {
            menu.pointer_move(pointer);
        }
    }

    pub fn pointer_down(&mut self, pointer: Pointer) {
        if let Some(menu) = self.menu.as_mut() {
            menu.pointer_down(pointer);
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.pointer_leave();
        }
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(menu) = self.menu.as_mut() {
            menu.key_down(key);
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(mut menu) = self.menu.take() {
            menu.shutdown();
        }
    }

    pub fn menu(&self) -> Option<&MenuScene> {
        self.menu.as_ref()
    }

    pub fn menu_mut(&mut self) -> Option<&mut MenuScene> {
        self.menu.as_mut()
    }

    pub fn registry(&self) -> &TextureRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn battles(&self) -> &[BattleEntry] {
        &self.battles
    }

    pub fn menu_starts(&self) -> u32 {
        self.menu_starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_battles;
    use crate::text::MonospaceMetrics;

    fn game() -> Game {
        Game::new(GameConfig::default(), default_battles().unwrap(), Rc::new(MonospaceMetrics::default()))
    }

    #[test]
    fn input_before_boot_is_ignored() {
        let mut g = game();
        g.pointer_move(Pointer::new(640.0, 450.0, 0.0));
        g.key_down("Escape");
        assert!(g.menu().is_none());
    }

    #[test]
    fn restart_rebuilds_an_equal_menu() {
        let mut g = game();
        g.boot();
        let objects = g.menu().unwrap().stage().len();
        let textures = g.registry().texture_count();

        g.start_menu();
        g.start_menu();
        assert_eq!(g.menu_starts(), 3);
        assert_eq!(g.menu().unwrap().stage().len(), objects);
        assert_eq!(g.registry().texture_count(), textures);
        assert_eq!(g.menu().unwrap().timeline().subscription_count(), 3);
    }

    #[test]
    fn shutdown_drops_the_menu() {
        let mut g = game();
        g.boot();
        g.shutdown();
        assert!(g.menu().is_none());
        g.update(16.0);
    }
}
