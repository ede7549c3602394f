//! match-runner: headless runner for the arcade soccer engine.
//!
//! Usage:
//!   match-runner --seed 12345 --frames 600 --dt 0.016 --hold KeyD,KeyF
//!   match-runner --seed 12345 --config data/rules.json --ipc-mode

use anyhow::Result;
use chrono::Utc;
use kickoff_core::{
    command::MatchCommand,
    config::SimConfig,
    engine::SimEngine,
    event::SimEvent,
    input::HeldKeys,
    snapshot::{HudView, SimSnapshot},
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

/// What the IPC loop should do after one input line.
#[derive(Debug, PartialEq)]
enum LineOutcome {
    Reply(String),
    Skip,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    snapshot: SimSnapshot,
    hud: HudView,
    events: Vec<SimEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let frames = parse_arg(&args, "--frames", 600u64);
    let dt = parse_arg(&args, "--dt", 1.0 / 60.0);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let held: HeldKeys = flag_value(&args, "--hold")
        .map(|list| list.split(',').filter(|k| !k.is_empty()).collect())
        .unwrap_or_default();
    let match_id = flag_value(&args, "--match-id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("match-{}", uuid::Uuid::new_v4()));

    let config = match flag_value(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let started_at = Utc::now();
    let mut engine = SimEngine::build(match_id.clone(), seed, config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        println!("Kickoff: match-runner");
        println!("  match_id:  {match_id}");
        println!("  seed:      {seed}");
        println!("  frames:    {frames}");
        println!("  dt:        {dt}");
        println!();

        engine.start()?;
        engine.run_ticks(frames, dt, &held)?;
        print_summary(&engine, started_at.to_rfc3339());
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        match handle_line(engine, &buffer)? {
            LineOutcome::Quit => break,
            LineOutcome::Skip => continue,
            LineOutcome::Reply(line) => {
                writeln!(stdout, "{line}")?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}

/// Apply one IPC line to the engine and build the reply line.
///
/// Malformed lines and rejected commands answer `{"error": ...}` and
/// leave the loop running.
fn handle_line(engine: &mut SimEngine, line: &str) -> Result<LineOutcome> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineOutcome::Skip);
    }

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Ok(error_reply(&e.to_string())),
    };
    if value["type"] == "quit" {
        return Ok(LineOutcome::Quit);
    }
    let cmd: MatchCommand = match serde_json::from_value(value) {
        Ok(c) => c,
        Err(e) => return Ok(error_reply(&e.to_string())),
    };

    match engine.submit_command(cmd) {
        Ok(events) => {
            let state = build_ui_state(engine, events);
            Ok(LineOutcome::Reply(serde_json::to_string(&state)?))
        }
        Err(e) => {
            log::warn!("match-runner: command rejected: {e}");
            Ok(error_reply(&e.to_string()))
        }
    }
}

fn error_reply(message: &str) -> LineOutcome {
    LineOutcome::Reply(serde_json::json!({ "error": message }).to_string())
}

fn build_ui_state(engine: &SimEngine, events: Vec<SimEvent>) -> UiState {
    UiState {
        snapshot: engine.snapshot(),
        hud: engine.hud(),
        events,
    }
}

fn print_summary(engine: &SimEngine, started_at: String) {
    let state = engine.state();
    let hud = engine.hud();

    println!("=== MATCH SUMMARY ===");
    println!("  match_id:    {}", engine.match_id);
    println!("  seed:        {}", engine.rng_bank.master_seed());
    println!("  started_at:  {started_at}");
    println!("  ticks run:   {}", engine.clock.current_tick);
    println!("  elapsed:     {:.2}s", state.elapsed);
    println!("  phase:       {}", hud.phase);
    println!("  clock:       {}", hud.clock);
    println!("  score:       {}-{}", hud.p1_score, hud.p2_score);
    match &state.winner {
        Some(outcome) => println!("  outcome:     {outcome}"),
        None => println!("  outcome:     (in progress)"),
    }
    if let Some(status) = &hud.status {
        println!("  status:      {status}");
    }

    println!();
    println!("=== EVENTS ===");
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in engine.event_log().entries() {
        *counts.entry(entry.event_type.as_str()).or_default() += 1;
    }
    if counts.is_empty() {
        println!("  (no events recorded)");
    }
    for (event_type, count) in counts {
        println!("  {event_type:<18} {count}");
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
