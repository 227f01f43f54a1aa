use std::cell::RefCell;
use std::rc::Rc;

use husaria_menu::data::default_battles;
use husaria_menu::input::Pointer;
use husaria_menu::text::MonospaceMetrics;
use husaria_menu::timeline::{NodeEvent, NodeEventKind};
use husaria_menu::{Game, GameConfig};

fn booted() -> Game {
    let mut game = Game::new(GameConfig::default(), default_battles().unwrap(), Rc::new(MonospaceMetrics::default()));
    game.boot();
    game
}

fn at(x: f32, y: f32) -> Pointer {
    Pointer::new(x, y, 0.0)
}

type Log = Rc<RefCell<Vec<(NodeEventKind, i32)>>>;

fn record_all(game: &mut Game) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let menu = game.menu_mut().unwrap();
    for node in menu.timeline_mut().nodes_mut() {
        for kind in [NodeEventKind::HoverEnter, NodeEventKind::HoverExit, NodeEventKind::Click] {
            let log = log.clone();
            node.on(kind, move |e: &NodeEvent| log.borrow_mut().push((kind, e.entry().year)));
        }
    }
    log
}

#[test]
fn three_battles_span_the_screen() {
    let game = booted();
    let menu = game.menu().unwrap();
    let xs: Vec<f32> = menu.timeline().nodes().iter().map(|n| n.position().0).collect();
    assert_eq!(xs, vec![120.0, 640.0, 1160.0]);
    let years: Vec<i32> = menu.timeline().entries().iter().map(|e| e.year).collect();
    assert_eq!(years, vec![1410, 1655, 1683]);
}

#[test]
fn hover_then_click_czestochowa() {
    let mut game = booted();
    let log = record_all(&mut game);

    game.pointer_move(at(300.0, 600.0));
    game.pointer_move(at(640.0, 450.0));
    {
        let menu = game.menu().unwrap();
        assert!(menu.timeline().tooltip().is_visible());
        assert!(menu.timeline().tooltip().content().contains("Jasnej Góry"));
    }
    game.pointer_down(at(640.0, 450.0));

    let events = log.borrow().clone();
    assert_eq!(events[0], (NodeEventKind::HoverEnter, 1655));
    assert_eq!(events[1], (NodeEventKind::Click, 1655));
    assert!(events.iter().all(|(_, year)| *year == 1655));

    let menu = game.menu().unwrap();
    assert_eq!(menu.modal().map(|m| m.entry().name.clone()), Some("Częstochowa".to_string()));
    assert_eq!(menu.selected_text(), "Wybrana bitwa: Częstochowa (1655)");
}

#[test]
fn moving_across_the_track_enters_and_leaves_in_order() {
    let mut game = booted();
    let log = record_all(&mut game);

    game.pointer_move(at(120.0, 450.0));
    game.pointer_move(at(640.0, 450.0));
    game.pointer_move(at(1160.0, 450.0));
    game.pointer_leave();

    assert_eq!(
        *log.borrow(),
        vec![
            (NodeEventKind::HoverEnter, 1410),
            (NodeEventKind::HoverExit, 1410),
            (NodeEventKind::HoverEnter, 1655),
            (NodeEventKind::HoverExit, 1655),
            (NodeEventKind::HoverEnter, 1683),
            (NodeEventKind::HoverExit, 1683),
        ]
    );
    assert!(!game.menu().unwrap().timeline().tooltip().is_visible());
}

#[test]
fn no_events_after_teardown() {
    let mut game = booted();
    let log = record_all(&mut game);
    game.menu_mut().unwrap().shutdown();

    game.pointer_move(at(640.0, 450.0));
    game.pointer_down(at(640.0, 450.0));
    game.key_down("Escape");

    assert!(log.borrow().is_empty());
    assert!(game.menu().unwrap().stage().is_empty());
}

#[test]
fn reload_does_not_leak_or_regenerate() {
    let mut game = booted();
    let objects = game.menu().unwrap().stage().len();
    assert_eq!(game.registry().texture_count(), 8);

    game.pointer_down(at(120.0, 450.0));
    assert!(game.menu().unwrap().modal().is_some());

    for _ in 0..5 {
        game.start_menu();
    }
    let menu = game.menu().unwrap();
    assert!(menu.modal().is_none());
    assert_eq!(menu.stage().len(), objects);
    assert_eq!(menu.timeline().subscription_count(), 3);
    assert_eq!(game.registry().texture_count(), 8);
    assert_eq!(game.registry().anim_count(), 1);
}

#[test]
fn gallop_keeps_running_across_frames() {
    let mut game = booted();
    let mut seen = Vec::new();
    for _ in 0..8 {
        game.update(1000.0 / 12.0 + 1.0);
        seen.push(game.menu().unwrap().hussar_texture());
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 8);
}
