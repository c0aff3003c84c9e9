//! Bullet Storm headless runner
//!
//! Drives one run at the fixed timestep with a simple autopilot, then records
//! the result in the high-score table.
//!
//! Usage: `bullet-storm [name] [seed]`

use anyhow::Context;

use bullet_storm::consts::*;
use bullet_storm::highscores::{HIGH_SCORES_PATH, HighScores};
use bullet_storm::sim::{Entity, GameEvent, GameState, Tags, TickInput, tick};
use bullet_storm::snapshot::build_snapshot;
use bullet_storm::tuning::{TUNING_PATH, Tuning};

/// Give up after ten minutes of sim time
const MAX_TICKS: u64 = 60 * 60 * 10;
/// Hostile projectiles closer than this are dodged
const DODGE_RADIUS: f32 = 140.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let name = args
        .next()
        .or_else(|| std::env::var("BULLET_STORM_NAME").ok())
        .unwrap_or_default();
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed {raw:?}"))?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    };

    let tuning = Tuning::load(TUNING_PATH);
    let mut high_scores = HighScores::load(HIGH_SCORES_PATH);
    log::info!("Bullet Storm starting (seed {seed})");

    let mut state = GameState::with_tuning(seed, tuning);
    let mut bosses_defeated = 0u32;
    let mut final_score = None;

    while state.time_ticks < MAX_TICKS && final_score.is_none() {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::BossSpawned { phase, wave } => {
                    log::debug!("Boss for phase {phase} arrived at wave {wave}");
                }
                GameEvent::BossDefeated { .. } => bosses_defeated += 1,
                GameEvent::PlayerDied { score, .. } => final_score = Some(score),
                _ => {}
            }
        }
    }

    let hud = build_snapshot(&state).hud;
    let score = final_score.unwrap_or(hud.score);
    if final_score.is_none() {
        log::info!("Tick limit reached, ending run");
    }

    let rank = high_scores.add_score(&name, score);
    if let Err(e) = high_scores.save(HIGH_SCORES_PATH) {
        log::error!("Failed to save high scores: {e}");
    }

    println!("Run over at wave {} after {:.1}s", hud.wave, state.time);
    println!("Kills: {}  Bosses defeated: {}", state.player.kills, bosses_defeated);
    println!("Score: {score}");
    println!("{}", rank_message(rank));
    if let Some(best) = high_scores.top_score() {
        println!("Best: {best}");
    }

    Ok(())
}

/// Summary line for the rank returned by `HighScores::add_score` (1-indexed)
fn rank_message(rank: Option<usize>) -> String {
    match rank {
        Some(r) => format!("New high score, rank #{r}"),
        None => "Did not place on the high-score table".to_string(),
    }
}

/// Dodge the nearest hostile projectile, otherwise line up under the
/// lowest enemy. Always firing.
fn autopilot(state: &GameState) -> TickInput {
    if !state.player.is_alive() {
        return TickInput::default();
    }
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };
    let me = state.player.body.pos;

    let threat = state
        .projectiles
        .alive()
        .filter(|p| p.tags.contains(Tags::HOSTILE))
        .map(|p| p.body.pos)
        .filter(|pos| pos.distance(me) < DODGE_RADIUS)
        .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)));

    let desired_x = if let Some(threat) = threat {
        let away = me.x - threat.x;
        if away.abs() < 1.0 {
            // Head for the roomier side
            if me.x < FIELD_WIDTH * 0.5 { me.x + 100.0 } else { me.x - 100.0 }
        } else {
            me.x + away.signum() * 100.0
        }
    } else {
        state
            .enemies
            .alive()
            .filter(|e| e.body.pos.y > 0.0)
            .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
            .map_or(FIELD_WIDTH * 0.5, |e| e.body.pos.x)
    };

    let dx = desired_x - me.x;
    input.left = dx < -4.0;
    input.right = dx > 4.0;
    // Drift back to the home row
    let home_y = FIELD_HEIGHT - PLAYER_START_Y_OFFSET;
    input.down = me.y < home_y - 4.0 && threat.is_none();
    input.up = threat.is_some_and(|t| t.y > me.y) && me.y > FIELD_HEIGHT * 0.5;
    input
}
