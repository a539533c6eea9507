//! Headless Encounter Runner
//!
//! Runs a scripted player against the boss and prints a summary for tuning.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use nemesis::boss::BossEncounter;
use nemesis::core::types::{direction_from_degrees, Millis, Vec2, WeaponId};
use nemesis::core::{load_config, EncounterConfig, Result};
use nemesis::events::CombatEvent;
use nemesis::history::{load_history, ProgressHistory};
use nemesis::player::{DamageSource, PlayerAccessor};

/// Headless Encounter Runner - scripted player vs boss
#[derive(Parser, Debug)]
#[command(name = "encounter_sim")]
#[command(about = "Simulate a boss encounter and print a summary")]
struct Args {
    /// Encounter config (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Progress history from earlier runs (JSON)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated time before the run ends undecided
    #[arg(long, default_value_t = 180_000)]
    duration_ms: Millis,

    /// Fixed step per tick
    #[arg(long, default_value_t = 16)]
    tick_ms: Millis,

    /// Weapon the scripted player fires; defaults to the history's most used
    /// weapon, then to "laser"
    #[arg(long)]
    weapon: Option<String>,

    /// Raw damage per second the player deals while in range
    #[arg(long, default_value_t = 60.0)]
    dps: f32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Debug logging and a per-event trace on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct EncounterSummary {
    outcome: String,
    weapon: String,
    /// Most resisted weapon and its fraction
    strongest_resistance: Option<(String, f32)>,
    elapsed_ms: Millis,
    final_phase: u8,
    morph_form: String,
    morph_forms: Vec<String>,
    boss_health_fraction: f32,
    player_health_fraction: f32,
    damage_dealt: f32,
    damage_taken: f32,
    patterns_executed: BTreeMap<String, u32>,
    detonations: u32,
    seed: u64,
}

const PLAYER_MAX_HEALTH: f32 = 400.0;
const ORBIT_RADIUS: f32 = 260.0;
/// Degrees per second
const ORBIT_SPEED: f32 = 25.0;

/// Player that circles the boss and fires continuously
struct ScriptedPlayer {
    weapon: WeaponId,
    position: Vec2,
    velocity: Vec2,
    angle_deg: f32,
    health: f32,
    shield: f32,
    damage_taken: f32,
}

impl ScriptedPlayer {
    fn new(weapon: WeaponId, boss_position: Vec2) -> Self {
        let angle_deg = 90.0;
        Self {
            weapon,
            position: boss_position + direction_from_degrees(angle_deg) * ORBIT_RADIUS,
            velocity: Vec2::ZERO,
            angle_deg,
            health: PLAYER_MAX_HEALTH,
            shield: 1.0,
            damage_taken: 0.0,
        }
    }

    fn steer(&mut self, boss_position: Vec2, tick_ms: Millis) {
        let dt = tick_ms as f32 / 1000.0;
        self.angle_deg = (self.angle_deg + ORBIT_SPEED * dt) % 360.0;
        let next = boss_position + direction_from_degrees(self.angle_deg) * ORBIT_RADIUS;
        self.velocity = if dt > 0.0 { (next - self.position) / dt } else { Vec2::ZERO };
        self.position = next;
    }
}

impl PlayerAccessor for ScriptedPlayer {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn current_weapon(&self) -> WeaponId {
        self.weapon.clone()
    }

    fn health_fraction(&self) -> f32 {
        self.health / PLAYER_MAX_HEALTH
    }

    fn shield_fraction(&self) -> f32 {
        self.shield
    }

    fn apply_damage(&mut self, amount: f32, _source: DamageSource) {
        // Shield soaks hits first
        let absorbed = (self.shield * 50.0).min(amount);
        self.shield = (self.shield - absorbed / 50.0).max(0.0);
        let through = amount - absorbed;
        self.health = (self.health - through).max(0.0);
        self.damage_taken += through;
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("encounter_sim: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EncounterConfig::default(),
    };
    let seed = args
        .seed
        .or(config.boss.seed)
        .unwrap_or_else(rand::random);
    config.boss.seed = Some(seed);

    let history = match &args.history {
        Some(path) => load_history(path)?,
        None => ProgressHistory::default(),
    };

    let weapon = match &args.weapon {
        Some(name) => WeaponId::new(name.as_str()),
        None => history
            .favourite_weapon()
            .cloned()
            .unwrap_or_else(|| WeaponId::from("laser")),
    };

    let mut boss = BossEncounter::from_history(config, &history)?;
    let strongest_resistance = boss
        .resistances()
        .strongest()
        .map(|(w, fraction)| (w.to_string(), fraction));
    let mut player = ScriptedPlayer::new(weapon, boss.boss_position());
    tracing::info!(
        "Encounter started: forms [{}], seed {}",
        boss.morph_forms().iter().map(|f| f.name()).collect::<Vec<_>>().join(", "),
        seed
    );

    let tick_ms = args.tick_ms.max(1);
    let damage_per_tick = args.dps.max(0.0) * tick_ms as f32 / 1000.0;
    let mut elapsed: Millis = 0;
    let mut damage_dealt = 0.0;
    let mut patterns_executed: BTreeMap<String, u32> = BTreeMap::new();
    let mut detonations = 0;

    while elapsed < args.duration_ms && !boss.is_defeated() && player.is_alive() {
        player.steer(boss.boss_position(), tick_ms);
        boss.update(tick_ms, Some(&mut player));

        // Cloaked bosses are harder to land hits on
        let hit = damage_per_tick * boss.hit_visibility();
        damage_dealt += boss.take_damage(hit, &player.weapon).effective;
        elapsed += tick_ms;

        for event in boss.drain_events() {
            match &event {
                CombatEvent::PatternExecuted { pattern, .. } => {
                    *patterns_executed.entry(pattern.name().to_string()).or_insert(0) += 1;
                }
                CombatEvent::Detonation { .. } => detonations += 1,
                _ => {}
            }
            if args.verbose && !matches!(event, CombatEvent::DamageTaken { .. }) {
                eprintln!("  [{}] {:?}", elapsed, event);
            }
        }
    }

    let outcome = if boss.is_defeated() {
        "BossDefeated"
    } else if !player.is_alive() {
        "PlayerDefeated"
    } else {
        "Undecided"
    };
    boss.destroy();

    let summary = EncounterSummary {
        outcome: outcome.to_string(),
        weapon: player.weapon.to_string(),
        strongest_resistance,
        elapsed_ms: elapsed,
        final_phase: boss.phase_index(),
        morph_form: boss.current_morph_form().name().to_string(),
        morph_forms: boss.morph_forms().iter().map(|f| f.name().to_string()).collect(),
        boss_health_fraction: boss.health_fraction(),
        player_health_fraction: player.health_fraction(),
        damage_dealt,
        damage_taken: player.damage_taken,
        patterns_executed,
        detonations,
        seed,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_text(&summary),
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn print_text(summary: &EncounterSummary) {
    println!("Encounter Result");
    println!("================");
    println!("Outcome: {}", summary.outcome);
    println!("Weapon: {}", summary.weapon);
    if let Some((weapon, fraction)) = &summary.strongest_resistance {
        println!("Most resisted: {} ({:.0}%)", weapon, fraction * 100.0);
    }
    println!("Elapsed: {:.1}s", summary.elapsed_ms as f32 / 1000.0);
    println!("Final phase: {}", summary.final_phase);
    println!("Morph form: {} (of {})", summary.morph_form, summary.morph_forms.join(", "));
    println!("Boss health: {:.1}%", summary.boss_health_fraction * 100.0);
    println!("Player health: {:.1}%", summary.player_health_fraction * 100.0);
    println!("Damage dealt: {:.0}", summary.damage_dealt);
    println!("Damage taken: {:.0}", summary.damage_taken);
    println!("Detonations: {}", summary.detonations);
    println!();
    println!("Patterns executed:");
    for (name, count) in &summary.patterns_executed {
        println!("  {:<12} {}", name, count);
    }
    println!("Seed: {}", summary.seed);
}
