//! Integration test: driving the engine through the fixed-timestep loop.
//!
//! Covers the full active-play flow: a fresh game, clicks repairing the
//! first car, workers automating repairs over simulated minutes, the
//! queue keeping the lift busy, and play time accumulation.

use chopshop::core::events::{EventKind, GameEvent};
use chopshop::Game;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(1234)
}

/// Drive the game forward `ms` milliseconds in frame-sized chunks.
fn advance(game: &mut Game, rng: &mut ChaCha8Rng, start_ms: i64, ms: i64) -> i64 {
    let mut now = start_ms;
    let end = start_ms + ms;
    while now < end {
        now = (now + 100).min(end);
        game.update(now, rng);
    }
    now
}

#[test]
fn test_clicking_through_the_first_car() {
    let mut rng = test_rng();
    let mut game = Game::new(0, &mut rng);
    game.update(0, &mut rng);

    // Fresh run: hatchback on the lift, 50 repair cost, click power 1.
    // Rapid clicks build combo, so it takes fewer than 50 clicks.
    let mut clicks = 0;
    let mut now = 0;
    while game.state().cars_repaired == 0 {
        now += 50;
        game.update(now, &mut rng);
        game.click_at(1.0, 2.0).expect("a car should be on the lift");
        clicks += 1;
        assert!(clicks <= 50, "combo should finish the car within 50 clicks");
    }

    assert_eq!(game.state().cars_repaired, 1);
    assert!(game.state().currency >= 25);
    assert!(game.state().garage_xp >= 25);
    assert_eq!(game.state().total_clicks, clicks);

    // The achievement sweep runs on the next tick.
    game.update(now + 100, &mut rng);
    assert!(game.state().achievements.contains_key("first-repair"));
}

#[test]
fn test_workers_automate_while_idle() {
    let mut rng = test_rng();
    let mut game = Game::new(0, &mut rng);
    game.update(0, &mut rng);

    game.state_mut().currency = 5_000;
    assert!(game.hire_worker("mechanic"));
    assert!(game.hire_worker("mechanic"));

    // Two mechanics at 2/s chew through the starter cars: ten simulated
    // minutes is 2400 repair points against ~50-80 point cars.
    advance(&mut game, &mut rng, 0, 10 * 60 * 1_000);

    assert!(
        game.state().cars_repaired >= 5,
        "expected several automated repairs, got {}",
        game.state().cars_repaired
    );
    assert!(game.state().workers.iter().all(|w| w.total_repairs > 0.0));
    assert!(game.state().play_time_seconds >= 599);
}

#[test]
fn test_queue_refills_the_lift_over_time() {
    let mut rng = test_rng();
    let mut game = Game::new(0, &mut rng);
    game.update(0, &mut rng);

    // No clicks, no workers: cars pile up but the queue stays bounded.
    advance(&mut game, &mut rng, 0, 20 * 60 * 1_000);

    assert!(game.state().current_car.is_some());
    assert!(game.state().car_queue.len() <= 5);
}

#[test]
fn test_upgrades_compound_through_the_loop() {
    let mut rng = test_rng();
    let mut game = Game::new(0, &mut rng);
    game.update(0, &mut rng);
    game.state_mut().currency = 10_000;

    assert!(game.purchase_upgrade("better-wrench"));
    assert!(game.purchase_upgrade("power-tools"));

    // Click power is now (1 + 1) * 1.2 = 2.4; one click applies 2.
    let outcome = game.click_at(0.0, 0.0).unwrap();
    assert_eq!(outcome.repair_applied, 2);

    // Marketing scales income: the next repair pays more than base.
    assert!(game.purchase_upgrade("marketing"));
    let mut now = 0;
    let before = game.state().currency;
    while game.state().cars_repaired == 0 {
        now += 50;
        game.update(now, &mut rng);
        game.click_at(0.0, 0.0);
    }
    assert!(game.state().currency > before);
}

#[test]
fn test_event_stream_reports_the_session() {
    let mut rng = test_rng();
    let mut game = Game::new(0, &mut rng);

    use std::cell::RefCell;
    use std::rc::Rc;
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = kinds.clone();
    game.subscribe(Box::new(move |event: &GameEvent| {
        sink.borrow_mut().push(event.kind());
    }));

    game.update(0, &mut rng);
    let mut now = 0;
    while game.state().cars_repaired == 0 {
        now += 50;
        game.update(now, &mut rng);
        game.click_at(0.0, 0.0);
    }

    let seen = kinds.borrow();
    for expected in [
        EventKind::ClickPerformed,
        EventKind::CarProgressed,
        EventKind::CarRepaired,
        EventKind::CurrencyEarned,
        EventKind::CurrencyChanged,
        EventKind::XpEarned,
    ] {
        assert!(seen.contains(&expected), "missing {expected:?}");
    }
}
