use std::time::Duration;

use waypoint_defence_core::{Command, Health, SimulationConfig, Waypoint};
use waypoint_defence_system_spawning::{Config, Spawning};
use waypoint_defence_world::{self as world, query, World};

fn healths(commands: &[Command]) -> Vec<f32> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnEnemy { max_health } => max_health.get(),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn emits_multiple_spawn_commands_for_large_dt() {
    let config = Config::new(Duration::from_millis(500), 0x1234_5678, 100.0).expect("config");
    let mut spawning = Spawning::new(config);
    let mut commands = Vec::new();

    spawning.handle(Duration::from_secs(2), &mut commands);

    assert_eq!(commands.len(), 4, "expected one spawn per interval");
    assert_eq!(healths(&commands), vec![100.0; 4]);
    assert_eq!(spawning.spawned(), 4);
}

#[test]
fn partial_intervals_carry_over_between_calls() {
    let config = Config::new(Duration::from_secs(1), 9, 50.0).expect("config");
    let mut spawning = Spawning::new(config);
    let mut commands = Vec::new();

    spawning.handle(Duration::from_millis(600), &mut commands);
    assert!(commands.is_empty(), "no spawn before full interval");

    spawning.handle(Duration::from_millis(600), &mut commands);
    assert_eq!(commands.len(), 1);

    spawning.handle(Duration::from_millis(600), &mut commands);
    assert_eq!(commands.len(), 1, "only 0.8s accumulated since the spawn");
}

#[test]
fn zero_interval_disables_spawning() {
    let config = Config::new(Duration::ZERO, 3, 100.0).expect("config");
    let mut spawning = Spawning::new(config);
    let mut commands = Vec::new();

    for _ in 0..10 {
        spawning.handle(Duration::from_secs(5), &mut commands);
    }

    assert!(commands.is_empty());
}

#[test]
fn identical_seeds_replay_identical_health_rolls() {
    let config = Config::new(Duration::from_millis(250), 0x4d59_5df4_d0f3_3173, 100.0)
        .expect("config")
        .with_health_range(60.0, 140.0)
        .expect("range");
    let mut first = Spawning::new(config);
    let mut second = Spawning::new(config);
    let mut a = Vec::new();
    let mut b = Vec::new();

    first.handle(Duration::from_secs(3), &mut a);
    for _ in 0..12 {
        second.handle(Duration::from_millis(250), &mut b);
    }

    assert_eq!(a.len(), 12);
    assert_eq!(a, b);
    for health in healths(&a) {
        assert!((60.0..=140.0).contains(&health), "health {health} out of range");
    }
}

#[test]
fn different_seeds_diverge() {
    let base = Config::new(Duration::from_millis(100), 1, 100.0)
        .expect("config")
        .with_health_range(1.0, 1_000.0)
        .expect("range");
    let other = Config::new(Duration::from_millis(100), 2, 100.0)
        .expect("config")
        .with_health_range(1.0, 1_000.0)
        .expect("range");
    let mut a = Vec::new();
    let mut b = Vec::new();

    Spawning::new(base).handle(Duration::from_secs(1), &mut a);
    Spawning::new(other).handle(Duration::from_secs(1), &mut b);

    assert_ne!(healths(&a), healths(&b));
}

#[test]
fn spawn_commands_create_enemies_at_the_path_start() {
    let mut world = World::new(
        SimulationConfig::default(),
        vec![Waypoint::new(0, 4), Waypoint::new(4, 4)],
    )
    .expect("world");
    let config = Config::new(Duration::from_secs(1), 5, 80.0).expect("config");
    let mut spawning = Spawning::new(config);
    let mut commands = Vec::new();
    let mut events = Vec::new();

    spawning.handle(Duration::from_secs(2), &mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let enemies = query::enemies(&world);
    assert_eq!(enemies.len(), 2);
    for enemy in enemies.iter() {
        assert_eq!(enemy.position(), query::path(&world).spawn_point());
        assert_eq!(enemy.health(), Health::new(80.0));
        assert_eq!(enemy.target_waypoint(), 1);
    }
}
