use std::time::Duration;

use waypoint_defence_core::{Command, Event, Health, SimulationConfig, Waypoint, WorldPoint};
use waypoint_defence_simulation::Simulation;
use waypoint_defence_system_spawning::{Config as SpawnConfig, Spawning};
use waypoint_defence_system_tower_targeting::NearestInRange;
use waypoint_defence_world::query;

const TICK: Duration = Duration::from_millis(100);

fn default_level() -> Vec<Waypoint> {
    vec![
        Waypoint::new(0, 4),
        Waypoint::new(4, 4),
        Waypoint::new(4, 2),
        Waypoint::new(9, 2),
        Waypoint::new(9, 6),
        Waypoint::new(14, 6),
    ]
}

fn count(events: &[Event], matches: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| matches(event)).count()
}

#[test]
fn undefended_enemy_walks_to_the_base() {
    let mut simulation =
        Simulation::new(SimulationConfig::default(), default_level()).expect("simulation");
    let spawned = simulation.apply(Command::SpawnEnemy {
        max_health: Health::new(100.0),
    });
    assert_eq!(spawned.len(), 1);

    let mut events = Vec::new();
    for _ in 0..400 {
        events.extend(simulation.step(TICK));
    }

    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemyReachedBase { .. })),
        1
    );
    assert_eq!(
        count(&events, |event| matches!(event, Event::WaypointReached { .. })),
        5
    );
    assert!(query::enemies(simulation.world()).is_empty());
}

#[test]
fn tower_kills_an_enemy_before_it_escapes() {
    let mut simulation =
        Simulation::new(SimulationConfig::default(), default_level()).expect("simulation");
    let placed = simulation.apply(Command::PlaceTower {
        position: WorldPoint::new(160.0, 200.0),
    });
    assert!(matches!(placed.as_slice(), [Event::TowerPlaced { .. }]));
    let _ = simulation.apply(Command::SpawnEnemy {
        max_health: Health::new(50.0),
    });

    let mut events = Vec::new();
    for _ in 0..400 {
        events.extend(simulation.step(TICK));
    }

    let fired = count(&events, |event| matches!(event, Event::ProjectileFired { .. }));
    let damaged = count(&events, |event| matches!(event, Event::EnemyDamaged { .. }));
    assert!(fired >= 2, "expected at least two shots, got {fired}");
    assert_eq!(damaged, 2, "two 25 damage hits deplete 50 hp");
    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemyKilled { .. })),
        1
    );
    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemyReachedBase { .. })),
        0
    );
    assert!(query::enemies(simulation.world()).is_empty());
    assert!(simulation.combat().is_empty());
}

#[test]
fn step_events_follow_system_order() {
    let mut simulation =
        Simulation::new(SimulationConfig::default(), default_level()).expect("simulation");
    let _ = simulation.apply(Command::PlaceTower {
        position: WorldPoint::new(32.0, 288.0),
    });
    let spawn_config =
        SpawnConfig::new(Duration::from_millis(100), 11, 100.0).expect("spawn config");
    simulation = simulation.with_spawning(Spawning::new(spawn_config));

    let events = simulation.step(TICK);

    assert!(matches!(events[0], Event::TimeAdvanced { .. }));
    assert!(matches!(events[1], Event::EnemySpawned { .. }));
    assert!(matches!(events[2], Event::ProjectileFired { .. }));
    assert!(matches!(events[3], Event::EnemyDamaged { .. }));
    assert_eq!(events.len(), 4);
}

#[test]
fn indexed_and_linear_targeting_produce_identical_runs() {
    let config = SimulationConfig::default();
    let spawner = || {
        Spawning::new(
            SpawnConfig::new(Duration::from_millis(700), 0xfeed, 100.0)
                .expect("spawn config")
                .with_health_range(40.0, 160.0)
                .expect("range"),
        )
    };
    let towers = [
        WorldPoint::new(300.5, 200.25),
        WorldPoint::new(610.75, 250.5),
        WorldPoint::new(420.25, 330.75),
    ];

    let run = |use_index: bool| {
        let mut simulation = Simulation::with_selector(config, default_level(), NearestInRange)
            .expect("simulation")
            .with_spawning(spawner());
        simulation.use_spatial_index(use_index);
        for position in towers {
            let _ = simulation.apply(Command::PlaceTower { position });
        }
        let mut events = Vec::new();
        for _ in 0..600 {
            events.extend(simulation.step(TICK));
        }
        events
    };

    let indexed = run(true);
    let linear = run(false);

    assert!(count(&indexed, |event| matches!(event, Event::ProjectileFired { .. })) > 0);
    assert_eq!(indexed, linear);
}

#[test]
fn hit_points_stay_within_bounds_for_the_whole_run() {
    let spawn_config =
        SpawnConfig::new(Duration::from_millis(500), 3, 60.0).expect("spawn config");
    let mut simulation = Simulation::new(SimulationConfig::default(), default_level())
        .expect("simulation")
        .with_spawning(Spawning::new(spawn_config));
    for position in [WorldPoint::new(256.0, 200.0), WorldPoint::new(600.0, 300.0)] {
        let _ = simulation.apply(Command::PlaceTower { position });
    }

    for _ in 0..300 {
        let _ = simulation.step(TICK);
        for enemy in query::enemies(simulation.world()).iter() {
            let health = enemy.health().get();
            assert!(health > 0.0, "dead enemies are removed within the step");
            assert!(health <= enemy.max_health().get());
            assert!(enemy.target_waypoint() >= 1);
        }
    }
    assert_eq!(simulation.spawning().map(Spawning::spawned), Some(60));
}

#[test]
fn spawns_without_hit_points_never_linger() {
    let mut simulation =
        Simulation::new(SimulationConfig::default(), default_level()).expect("simulation");
    for max_health in [Health::ZERO, Health::new(f32::NAN), Health::new(-1.0)] {
        assert!(simulation.apply(Command::SpawnEnemy { max_health }).is_empty());
    }

    for _ in 0..10 {
        let _ = simulation.step(TICK);
    }

    assert!(query::enemies(simulation.world()).is_empty());
}
