//! Property tests for camera layouts and contact routing.

use proptest::prelude::*;
use tilebounce_engine::prelude::*;

const SCREEN: Vec2 = Vec2::new(1920.0, 1080.0);
const MAP: Vec2 = Vec2::new(6000.0, 2000.0);
const FOLLOW: Vec2 = Vec2::new(960.0, 540.0);

fn coord(max: i32) -> impl Strategy<Value = f32> {
    (-max..max * 2).prop_map(|v| v as f32 * 0.5)
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn quadrant_split_selects_one_of_four_centers(x in coord(4000), y in coord(2000)) {
        let view = compute_view(LayoutMode::QuadrantSplit, Vec2::new(x, y), SCREEN, MAP, FOLLOW);
        let expected_x = if x < SCREEN.x / 2.0 { 480.0 } else { 1440.0 };
        let expected_y = if y < SCREEN.y / 2.0 { 270.0 } else { 810.0 };
        prop_assert_eq!(view.center, Vec2::new(expected_x, expected_y));
        prop_assert_eq!(view.size, Vec2::new(960.0, 540.0));
    }

    #[test]
    fn vertical_split_selects_a_half(x in coord(4000), y in coord(2000)) {
        let view = compute_view(LayoutMode::VerticalSplit, Vec2::new(x, y), SCREEN, MAP, FOLLOW);
        let halves = [Vec2::new(480.0, 540.0), Vec2::new(1440.0, 540.0)];
        prop_assert!(halves.contains(&view.center));
        prop_assert_eq!(view.center.x < SCREEN.x / 2.0, x < SCREEN.x / 2.0);
    }

    #[test]
    fn full_map_ignores_the_player(x in coord(4000), y in coord(2000)) {
        let a = compute_view(LayoutMode::FullMap, Vec2::new(x, y), SCREEN, MAP, FOLLOW);
        let b = compute_view(LayoutMode::FullMap, Vec2::ZERO, SCREEN, MAP, FOLLOW);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn unknown_mode_index_is_rejected(index in any::<i32>()) {
        let result = LayoutMode::from_index(index);
        prop_assert_eq!(result.is_ok(), (0..=3).contains(&index));
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

fn ball_ref(level: &Level) -> BodyRef {
    BodyRef {
        handle: level.ball.body,
        owner: BodyOwner::Ball,
        fixed: false,
    }
}

proptest! {
    /// However many times pickups are touched within one step, each is
    /// destroyed once and counted once.
    #[test]
    fn pickups_are_removed_exactly_once(touches in prop::collection::vec(0..5usize, 0..40)) {
        let config = GameConfig::default();
        let mut physics = PhysicsWorld::new(config.gravity, config.scale());
        let grid = Grid::parse("YEEE6U").unwrap();
        let mut level = Level::spawn(&grid, &config, &mut physics).unwrap();

        let mut targets: Vec<BodyRef> = level
            .collectibles
            .values()
            .map(|c| BodyRef {
                handle: c.body,
                owner: BodyOwner::Collectible(c.id),
                fixed: true,
            })
            .collect();
        targets.extend(level.power_ups.values().map(|p| BodyRef {
            handle: p.body,
            owner: BodyOwner::PowerUp(p.kind, p.id),
            fixed: true,
        }));
        let ball = ball_ref(&level);
        let contacts: Vec<ContactEvent> = touches
            .iter()
            .map(|&i| ContactEvent {
                phase: ContactPhase::Begin,
                a: ball,
                b: targets[i],
            })
            .collect();

        let bodies_before = physics.body_count();
        let mut distinct = touches.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let mut router = CollisionRouter::new();
        let mut queues = RemovalQueues::new();
        router.dispatch(&contacts, &mut physics, &mut level, &mut queues, &config);
        let events = queues.sweep(&mut physics, &mut level, &config);

        prop_assert_eq!(events.len(), distinct.len());
        prop_assert_eq!(physics.body_count(), bodies_before - distinct.len());
        let coins = distinct.iter().filter(|&&i| i < 3).count() as u32;
        prop_assert_eq!(level.ball.score(), coins * CollectibleKind::Coin.points());
        prop_assert!(queues.is_empty());
    }

    /// Any sequence of spike steps loses one life per step, stops at zero and
    /// reports game over once.
    #[test]
    fn spike_steps_never_underflow_lives(per_step in prop::collection::vec(1..4usize, 1..12)) {
        let config = GameConfig::default();
        let mut physics = PhysicsWorld::new(config.gravity, config.scale());
        let grid = Grid::parse("Y777").unwrap();
        let mut level = Level::spawn(&grid, &config, &mut physics).unwrap();
        let spikes: Vec<BodyRef> = level
            .spikes
            .values()
            .map(|s| BodyRef {
                handle: s.body,
                owner: BodyOwner::Spike(s.id),
                fixed: true,
            })
            .collect();
        let ball = ball_ref(&level);

        let mut router = CollisionRouter::new();
        let mut queues = RemovalQueues::new();
        let mut game_overs = 0;
        for &n in &per_step {
            let contacts: Vec<ContactEvent> = spikes[..n]
                .iter()
                .map(|&s| ContactEvent {
                    phase: ContactPhase::Begin,
                    a: s,
                    b: ball,
                })
                .collect();
            let events = router.dispatch(&contacts, &mut physics, &mut level, &mut queues, &config);
            game_overs += events.iter().filter(|e| **e == GameEvent::GameOver).count();
        }

        let steps = per_step.len() as u32;
        prop_assert_eq!(level.ball.lives(), config.starting_lives.saturating_sub(steps));
        prop_assert_eq!(game_overs, usize::from(steps >= config.starting_lives));
    }
}
