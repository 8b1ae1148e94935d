//! Integration tests using the BattleTest harness

mod common;

use std::time::Duration;

use common::{random_state, standard_state, BattleTest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skirmish::combat::{
    AttackRange, BattleState, Combatant, ConstantRng, ScriptedRng, SeededRng, Side, StatusSet,
};
use skirmish::{
    Arena, ChannelRenderer, Config, ControlError, Interrupted, RenderCall, ViewHandle,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

const WARRIOR: ViewHandle = ViewHandle(0);
const MAGE: ViewHandle = ViewHandle(1);
const GOBLIN: ViewHandle = ViewHandle(2);
const ORC: ViewHandle = ViewHandle(3);

fn is_hit(call: &RenderCall) -> bool {
    matches!(call, RenderCall::Log { text } if text.contains(" hits "))
}

#[tokio::test(start_paused = true)]
async fn test_opening_round_with_minimum_draws() {
    // action (attack), first target, minimum damage, no crit, no poison
    let rng = ScriptedRng::cycle([0.5, 0.0, 0.0, 0.99, 0.99]);
    let mut battle = BattleTest::start(standard_state(), rng, 1.0);

    // Round 1 takes four attack turns of 1.4s each
    tokio::time::sleep(Duration::from_secs(6)).await;
    battle.surface.bump_generation();
    assert_eq!(battle.finish().await, Err(Interrupted::Superseded));

    let updates = battle.hp_updates();
    assert_eq!(
        updates[..4].to_vec(),
        vec![(GOBLIN, 11), (GOBLIN, 6), (WARRIOR, 27), (WARRIOR, 25)]
    );

    let logs = battle.logs();
    assert_eq!(logs[0], "Warrior hits Goblin for 4 dmg. Goblin 11/15");
    assert_eq!(logs[1], "Mage hits Goblin for 5 dmg. Goblin 6/15");
    assert_eq!(logs[2], "Goblin hits Warrior for 3 dmg. Warrior 27/30");
    assert_eq!(logs[3], "Orc hits Warrior for 2 dmg. Warrior 25/30");

    // Round 2 is announced only after all four actors went
    let calls = battle.calls().to_vec();
    let round_two = calls
        .iter()
        .position(|c| *c == RenderCall::RoundLabel { round: 2 })
        .expect("second round");
    let hits_before = calls[..round_two].iter().filter(|c| is_hit(c)).count();
    assert_eq!(hits_before, 4);
}

#[tokio::test(start_paused = true)]
async fn test_battles_terminate_with_a_side_wiped_out() {
    for seed in 0..25u64 {
        let mut roster_rng = StdRng::seed_from_u64(seed);
        let heroes = roster_rng.random_range(1..=4);
        let monsters = roster_rng.random_range(1..=4);
        let state = random_state(&mut roster_rng, heroes, monsters);

        let mut battle = BattleTest::start(state, SeededRng::from_seed(seed), 10.0);
        let outcome = battle.finish().await.expect("battle completes");

        let loser = outcome.winner.opponent();
        assert_eq!(
            outcome.state.roster(loser).living_count(),
            0,
            "seed {} ended with {} standing",
            seed,
            loser
        );
        assert!(outcome.rounds >= 1);

        for call in battle.calls() {
            match call {
                RenderCall::CreateView { hp, max_hp, .. } => assert_eq!(hp, max_hp),
                RenderCall::UpdateView { hp, max_hp, .. } => assert!(hp <= max_hp),
                _ => {}
            }
        }
        for combatant in outcome.state.roster(Side::Heroes).iter() {
            assert!(combatant.hp() <= combatant.max_hp());
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_speed_changes_pacing_not_outcomes() {
    let mut runs = Vec::new();
    for speed in [0.5, 1.0, 4.0] {
        let start = Instant::now();
        let mut battle = BattleTest::start(standard_state(), ConstantRng(0.5), speed);
        let outcome = battle.finish().await.expect("battle completes");
        runs.push((outcome, battle.hp_updates(), start.elapsed()));
    }

    let (first_outcome, first_updates, _) = &runs[0];
    for (outcome, updates, _) in &runs[1..] {
        assert_eq!(outcome, first_outcome);
        assert_eq!(updates, first_updates);
    }

    let (slow, normal, fast) = (runs[0].2, runs[1].2, runs[2].2);
    assert!(slow > normal);
    assert!(fast * 2 < normal);
}

#[tokio::test(start_paused = true)]
async fn test_taunt_binds_monsters_until_round_end() {
    let script = [
        0.1, // Warrior taunts
        0.5, 0.0, 0.0, 0.99, 0.99, // Mage attacks Goblin
        0.5, 0.0, 0.99, 0.99, // Goblin attacks, target forced
        0.5, 0.0, 0.99, 0.99, // Orc attacks, target forced
    ];
    let mut battle = BattleTest::start(standard_state(), ScriptedRng::new(script, 0.5), 1.0);
    let outcome = battle.finish().await.expect("battle completes");
    assert_eq!(outcome.state.taunt_target(), None);

    let logs = battle.logs();
    assert_eq!(logs[0], "Warrior uses Taunt!");

    // Monster attack lines, tagged with the round they happened in
    let mut round = 1;
    let mut monster_targets = Vec::new();
    for call in battle.calls() {
        match call {
            RenderCall::RoundLabel { round: r } => round = *r,
            RenderCall::AttackLine { source, target } if *source == GOBLIN || *source == ORC => {
                monster_targets.push((round, *target))
            }
            _ => {}
        }
    }
    assert_eq!(monster_targets[..2].to_vec(), vec![(1, WARRIOR), (1, WARRIOR)]);
    // Taunt expired: the 0.5 pick among two heroes lands on the Mage
    assert_eq!(monster_targets[2], (2, MAGE));
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_state_between_actors() {
    let mut battle = BattleTest::start_paused(standard_state(), ConstantRng(0.5));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(battle.hp_updates().is_empty());
    assert_eq!(battle.count(|c| matches!(c, RenderCall::RoundLabel { round: 1 })), 1);

    // Resume, then pause in the middle of the Warrior's attack
    battle.surface.set_running(true);
    tokio::time::sleep(Duration::from_millis(400)).await;
    battle.surface.set_running(false);
    tokio::time::sleep(Duration::from_secs(10)).await;

    // The attack in flight finished; nobody else moved
    assert_eq!(battle.count(is_hit), 1);
    assert_eq!(battle.hp_updates(), vec![(ORC, 19)]);
    assert!(battle
        .calls()
        .contains(&RenderCall::Advance { handle: WARRIOR, distance_sign: 0 }));
    assert_eq!(
        battle.count(|c| matches!(c, RenderCall::Advance { handle, .. } if *handle == MAGE)),
        0
    );

    battle.surface.set_running(true);
    let outcome = battle.finish().await.expect("battle completes");
    assert!(outcome.rounds > 1);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_speed_is_rejected() {
    let mut battle = BattleTest::start(standard_state(), ConstantRng(0.5), 2.0);
    for speed in [0.0, -2.0, 0.009, 1e-300, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            battle.surface.set_speed(speed),
            Err(ControlError::InvalidSpeed(_))
        ));
    }
    assert_eq!(battle.surface.speed(), 2.0);
    battle.finish().await.expect("battle completes");
}

#[tokio::test(start_paused = true)]
async fn test_arena_restart_rebuilds_fresh_combatants() {
    let (tx, mut receivers) = mpsc::unbounded_channel();
    let factory = move || {
        let (renderer, calls) = ChannelRenderer::pair();
        let _ = tx.send(calls);
        renderer
    };
    let config = Config {
        seed: Some(99),
        tier: Some(4),
        ..Config::default()
    };
    let mut arena = Arena::new(config, factory).expect("valid config");

    let first = arena.launch().expect("launch");
    tokio::time::sleep(Duration::from_secs(8)).await;
    let second = arena.restart(first).await.expect("restart");

    let mut first_calls = receivers.try_recv().expect("first renderer");
    let mut damaged = false;
    while let Ok(call) = first_calls.try_recv() {
        if let RenderCall::UpdateView { hp, max_hp, .. } = call {
            damaged |= hp < max_hp;
        }
    }
    assert!(damaged);

    arena.set_speed(20.0).expect("valid speed");
    let outcome = second.await.expect("join").expect("battle completes");
    assert!(outcome.rounds >= 1);

    let mut second_calls = receivers.try_recv().expect("second renderer");
    let mut views = Vec::new();
    while let Ok(call) = second_calls.try_recv() {
        if let RenderCall::CreateView { name, hp, max_hp, .. } = call {
            views.push((name, hp, max_hp));
        }
    }
    assert_eq!(
        views,
        vec![
            ("Warrior".to_string(), 30, 30),
            ("Mage".to_string(), 20, 20),
            ("Goblin".to_string(), 17, 17),
            ("Orc".to_string(), 28, 28),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_mutual_defeat_goes_to_heroes() {
    let mut poison = StatusSet::default();
    poison.apply_poison();
    let state = BattleState::new(
        vec![Combatant::new("Knight", "K", Side::Heroes, 3, AttackRange::new(1, 1))],
        vec![
            Combatant::new("Brute", "B", Side::Monsters, 20, AttackRange::new(5, 5)),
            Combatant::new("Slime", "S", Side::Monsters, 3, AttackRange::new(1, 1))
                .with_status(poison),
        ],
    );

    // Knight nicks the Slime, Brute kills the Knight, Slime dies to poison
    let mut battle = BattleTest::start(state, ConstantRng(0.5), 1.0);
    let outcome = battle.finish().await.expect("battle completes");

    assert_eq!(outcome.winner, Side::Heroes);
    assert_eq!(outcome.rounds, 1);
    for side in Side::PHASES {
        assert_eq!(outcome.state.roster(side).living_count(), 0);
    }

    let logs = battle.logs();
    assert_eq!(logs[0], "Knight hits Slime for 1 dmg. Slime 2/3");
    assert_eq!(logs[1], "Brute hits Knight for 5 dmg. Knight 0/3");
    assert_eq!(logs[2], "Slime suffers 2 poison. 0/3");
    assert_eq!(
        battle.count(|c| matches!(c, RenderCall::RoundLabel { .. })),
        1
    );
    assert_eq!(
        battle.calls().last(),
        Some(&RenderCall::WinnerBanner {
            text: "Heroes win!".into()
        })
    );
}
