//! Combat flow through the full frame driver

use rising_combat::HitTier;
use rising_core::{AgentId, AgentKind};
use rising_math::Vec3;
use rising_sim::prelude::*;

const DT: f32 = 1.0 / 60.0;

/// Swings land on the frame they start
fn instant_swing_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.player.combo.hit_delay = 0.0;
    config.player.attack_range = 2.5;
    config
}

fn open_sim(config: SimConfig) -> Simulation {
    Simulation::new(config, &OpenField::default()).unwrap()
}

fn swing_at(point: Vec3) -> InputSnapshot {
    InputSnapshot::idle().with_attack().with_cursor(point)
}

fn hits_on(events: &[SimEvent], target: AgentId) -> Vec<(i32, HitTier, i32)> {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::Hit {
                target: t,
                damage,
                tier,
                remaining,
                ..
            } if *t == target => Some((*damage, *tier, *remaining)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_backstab_from_behind_is_critical() {
    let mut sim = open_sim(instant_swing_config());
    let spot = Vec3::ground(0.0, 2.0);
    let enemy = sim.spawn_enemy("warrior", spot);
    // Back turned to the player
    assert!(sim.set_facing(enemy, Vec3::Z));

    let report = sim.tick(DT, &swing_at(spot));
    assert_eq!(hits_on(&report.events, enemy), vec![(2, HitTier::Critical, 4)]);
    assert_eq!(sim.enemy(enemy).unwrap().agent.health.current(), 4);
}

#[test]
fn test_swing_at_facing_enemy_is_base() {
    let mut sim = open_sim(instant_swing_config());
    let spot = Vec3::ground(0.0, 2.0);
    let enemy = sim.spawn_enemy("warrior", spot);
    sim.set_facing(enemy, Vec3::NEG_Z);

    let report = sim.tick(DT, &swing_at(spot));
    assert_eq!(hits_on(&report.events, enemy), vec![(1, HitTier::Base, 5)]);
}

#[test]
fn test_swing_misses_out_of_reach() {
    let mut sim = open_sim(instant_swing_config());
    let enemy = sim.spawn_enemy("warrior", Vec3::ground(0.0, 4.0));
    let report = sim.tick(DT, &swing_at(Vec3::ground(0.0, 4.0)));
    assert!(hits_on(&report.events, enemy).is_empty());
    assert!(report
        .events
        .iter()
        .any(|event| matches!(event, SimEvent::AttackStarted { agent, .. } if *agent == PLAYER_ID)));
}

#[test]
fn test_block_halves_enemy_hit() {
    let health = HealthRecorder::new();
    let mut sim = open_sim(SimConfig::default()).with_health_observer(health.clone());
    let spot = Vec3::ground(0.0, 1.5);
    let enemy = sim.spawn_enemy("warrior", spot);

    let guard = InputSnapshot::idle().with_block().with_cursor(spot);
    let mut blocked = Vec::new();
    for _ in 0..120 {
        let report = sim.tick(DT, &guard);
        for event in report.events {
            if let SimEvent::Blocked { attacker, damage, remaining, .. } = event {
                blocked.push((attacker, damage, remaining));
            }
        }
        if !blocked.is_empty() {
            break;
        }
    }

    assert_eq!(blocked, vec![(enemy, 1, 9)]);
    assert_eq!(sim.player().state(), PlayerState::Block);
    assert_eq!(health.changes(), vec![(PLAYER_ID, 9, 10)]);
    // A blocked hit does not flash
    assert!(health.flashes().is_empty());
}

#[test]
fn test_dodge_evades_enemy_hit() {
    let mut sim = open_sim(SimConfig::default());
    let enemy = sim.spawn_enemy("warrior", Vec3::ground(0.0, 1.5));

    let mut attack_frame = None;
    let mut evaded = false;
    for _ in 0..150 {
        let input = match attack_frame {
            Some(started) if sim.frame() == started + 30 => InputSnapshot::moving(1.0, 0.0).with_dodge(),
            _ => InputSnapshot::idle(),
        };
        let report = sim.tick(DT, &input);
        for event in &report.events {
            match event {
                SimEvent::AttackStarted { agent, .. } if *agent == enemy && attack_frame.is_none() => {
                    attack_frame = Some(report.frame);
                }
                SimEvent::Evaded { target, .. } if *target == PLAYER_ID => evaded = true,
                _ => {}
            }
        }
        if evaded {
            break;
        }
    }

    assert!(attack_frame.is_some());
    assert!(evaded);
    assert_eq!(sim.player().agent().health.current(), 10);
}

#[test]
fn test_enemy_dies_once_and_corpse_is_removed() {
    let mut config = instant_swing_config();
    config.player.attack_damage = 100;
    let mut sim = open_sim(config);
    let spot = Vec3::ground(0.0, 1.5);
    let enemy = sim.spawn_enemy("minion", spot);

    let mut died = Vec::new();
    let mut removed = Vec::new();
    let mut hits = 0;
    for _ in 0..180 {
        let report = sim.tick(DT, &swing_at(spot));
        hits += hits_on(&report.events, enemy).len();
        for event in &report.events {
            match event {
                SimEvent::Died { agent, kind } if *agent == enemy => {
                    assert_eq!(*kind, AgentKind::Enemy);
                    died.push(report.frame);
                }
                SimEvent::Removed { agent } if *agent == enemy => removed.push(report.frame),
                _ => {}
            }
        }
    }

    assert_eq!(hits, 1);
    assert_eq!(died.len(), 1);
    assert_eq!(removed.len(), 1);
    // Corpses linger for two seconds
    let lingered = removed[0] - died[0];
    assert!((118..=122).contains(&lingered), "lingered {} frames", lingered);

    assert!(sim.enemy(enemy).is_none());
    assert_eq!(sim.enemy_count(), 0);
    assert!(!sim.notify_animation_finished(enemy));
}

#[test]
fn test_player_death_stops_the_fight() {
    let mut config = SimConfig::default();
    config.player.health = 1;
    let mut sim = open_sim(config);
    let enemy = sim.spawn_enemy("warrior", Vec3::ground(0.0, 1.5));

    let mut player_deaths = 0;
    let mut hits_after_death = 0;
    for _ in 0..400 {
        let report = sim.tick(DT, &InputSnapshot::idle());
        let dead_before = player_deaths > 0;
        for event in &report.events {
            match event {
                SimEvent::Died { agent, .. } if *agent == PLAYER_ID => player_deaths += 1,
                SimEvent::Hit { target, .. } if *target == PLAYER_ID && dead_before => hits_after_death += 1,
                _ => {}
            }
        }
    }

    assert_eq!(player_deaths, 1);
    assert_eq!(hits_after_death, 0);
    assert_eq!(sim.player().state(), PlayerState::Dead);
    assert_eq!(sim.player().agent().health.current(), 0);

    // Input is ignored once dead
    let position = sim.player().agent().position;
    sim.tick(DT, &InputSnapshot::moving(1.0, 0.0).with_attack());
    assert_eq!(sim.player().agent().position, position);

    // With no player to chase the enemy goes back to patrolling
    assert_eq!(
        sim.enemy(enemy).unwrap().brain.state(),
        rising_ai::EnemyState::Patrol
    );
}
