use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase_core::constants::PELLET_SCORE;
use maze_chase_core::engine::{GameEngine, GameEngineOptions, PlayerSpeed};
use maze_chase_core::types::{ActorKind, GameStatus, RuntimeEvent, Snapshot, Vec2};
use maze_chase_core::world::Grid;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    /// Upper bound on ticks per session; 15000 ticks is five minutes of play.
    #[arg(long, default_value_t = 15_000)]
    ticks: u64,
    #[arg(long, overrides_with = "no_autopilot")]
    autopilot: bool,
    #[arg(long, overrides_with = "autopilot")]
    no_autopilot: bool,
    #[arg(long)]
    speed_min: Option<f32>,
    #[arg(long)]
    speed_max: Option<f32>,
    #[arg(long, default_value_t = 1)]
    sessions: u32,
    #[arg(long)]
    session_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long)]
    print_board: bool,
}

#[derive(Clone, Debug)]
struct Session {
    name: String,
    seed: u32,
    max_ticks: u64,
    autopilot: bool,
    player_speed: PlayerSpeed,
}

#[derive(Clone, Debug, Serialize)]
struct SessionResultLine {
    session: String,
    seed: u32,
    status: GameStatus,
    ticks: u64,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    score: u32,
    #[serde(rename = "pelletsEaten")]
    pellets_eaten: u32,
    #[serde(rename = "pelletsLeft")]
    pellets_left: usize,
    #[serde(rename = "ghostsReleased")]
    ghosts_released: usize,
    #[serde(rename = "playerSpeed")]
    player_speed: f32,
    #[serde(rename = "modeChanges")]
    mode_changes: u32,
    #[serde(rename = "portalTrips")]
    portal_trips: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct SessionRunResult {
    result: SessionResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    board: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "sessionCount")]
    session_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "statusCounts")]
    status_counts: BTreeMap<String, usize>,
    sessions: Vec<SessionResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: i64,
    level: String,
    event: String,
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let sessions = resolve_sessions(&cli);
    let seed_hint = sessions.first().map(|session| session.seed).unwrap_or(0);
    let session_id = cli
        .session_id
        .clone()
        .unwrap_or_else(|| default_session_id(seed_hint, Utc::now().timestamp_millis()));
    let mut has_anomaly = false;
    let mut results = Vec::new();
    let mut total_anomalies = 0usize;

    for session in sessions {
        emit_log(
            "info",
            "session_started",
            &session_id,
            Some(session.seed),
            None,
            json!({
                "session": session.name,
                "maxTicks": session.max_ticks,
                "autopilot": session.autopilot,
            }),
        );
        let run = run_session(&session);

        for anomaly in &run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &session_id,
                Some(session.seed),
                Some(anomaly.tick),
                json!({
                    "session": session.name,
                    "message": anomaly.message,
                }),
            );
        }
        if !run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += run.anomaly_records.len();

        emit_log(
            "info",
            "session_finished",
            &session_id,
            Some(session.seed),
            Some(run.result.ticks),
            json!({
                "session": session.name,
                "status": run.result.status,
                "score": run.result.score,
                "anomalyCount": run.anomaly_records.len(),
            }),
        );

        if cli.print_board {
            for line in &run.board {
                println!("{line}");
            }
        }
        println!(
            "{}",
            serde_json::to_string(&run.result).expect("session result should serialize")
        );
        results.push(run.result);
    }

    let summary = build_run_summary(
        session_id.clone(),
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        results,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &session_id,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &session_id,
        None,
        None,
        json!({
            "sessionCount": summary.session_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "statusCounts": summary.status_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_session(session: &Session) -> SessionRunResult {
    let mut engine = GameEngine::new(GameEngineOptions {
        seed: session.seed,
        autopilot: session.autopilot,
        player_speed: session.player_speed,
    });

    let mut mode_changes = 0;
    let mut portal_trips = 0;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();

    for _ in 0..session.max_ticks {
        if engine.is_ended() {
            break;
        }
        engine.update();
        let snapshot = engine.build_snapshot(true);
        for message in collect_snapshot_anomalies(&snapshot, engine.grid()) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        for event in &snapshot.events {
            match event {
                RuntimeEvent::ModeChanged { .. } => mode_changes += 1,
                RuntimeEvent::PortalUsed {
                    actor: ActorKind::Player,
                    ..
                } => portal_trips += 1,
                _ => {}
            }
        }
    }

    let board = render_board(&engine.build_snapshot(false), engine.tiles());
    let summary = engine.build_summary();
    SessionRunResult {
        result: SessionResultLine {
            session: session.name.clone(),
            seed: session.seed,
            status: summary.status,
            ticks: summary.ticks,
            duration_ms: summary.duration_ms,
            score: summary.score,
            pellets_eaten: summary.pellets_eaten,
            pellets_left: summary.pellets_left,
            ghosts_released: summary.ghosts_released,
            player_speed: summary.player_speed,
            mode_changes,
            portal_trips,
            anomalies,
        },
        anomaly_records,
        board,
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot, grid: &Grid) -> Vec<String> {
    let mut anomalies = Vec::new();
    let player = Vec2::new(snapshot.player.x, snapshot.player.y);
    match grid.cell(player) {
        None => anomalies.push(format!("player off board at ({},{})", player.x, player.y)),
        Some(cell) if cell.is_wall() => {
            anomalies.push(format!("player inside wall at ({},{})", player.x, player.y))
        }
        Some(_) => {}
    }

    if snapshot.score % PELLET_SCORE != 0 {
        anomalies.push(format!("score not a multiple of {PELLET_SCORE}: {}", snapshot.score));
    }

    for ghost in &snapshot.ghosts {
        if !grid.in_bounds(Vec2::new(ghost.x, ghost.y)) {
            anomalies.push(format!(
                "ghost off board: {} at ({},{})",
                ghost.ghost_type.as_str(),
                ghost.x,
                ghost.y
            ));
        }
    }
    anomalies
}

/// Draws actors over the tile rows: `@` for the player, the ghost initial in
/// upper case for each ghost.
fn render_board(snapshot: &Snapshot, tiles: Vec<String>) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = tiles.iter().map(|row| row.chars().collect()).collect();
    let mut put = |x: i32, y: i32, symbol: char| {
        if let Some(slot) = usize::try_from(y)
            .ok()
            .and_then(|y| rows.get_mut(y))
            .and_then(|row| usize::try_from(x).ok().and_then(|x| row.get_mut(x)))
        {
            *slot = symbol;
        }
    };
    for ghost in &snapshot.ghosts {
        let initial = ghost
            .ghost_type
            .as_str()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('G');
        put(ghost.x, ghost.y, initial);
    }
    put(snapshot.player.x, snapshot.player.y, '@');

    let mut board = vec![snapshot.message.clone()];
    board.extend(rows.into_iter().map(|row| row.into_iter().collect::<String>()));
    board
}

fn resolve_sessions(cli: &Cli) -> Vec<Session> {
    let seed = cli.seed.unwrap_or_else(rand::random::<u32>);
    let player_speed = resolve_player_speed(cli.speed_min, cli.speed_max);
    let count = cli.sessions.clamp(1, 1_000);

    (0..count)
        .map(|index| Session {
            name: format!("session-{}", index + 1),
            seed: seed.wrapping_add(index),
            max_ticks: cli.ticks.max(1),
            autopilot: cli.autopilot || !cli.no_autopilot,
            player_speed,
        })
        .collect()
}

fn resolve_player_speed(min: Option<f32>, max: Option<f32>) -> PlayerSpeed {
    match (min, max) {
        (Some(min), Some(max)) if min <= max => PlayerSpeed::Range { min, max },
        (Some(min), Some(max)) => PlayerSpeed::Range { min: max, max: min },
        (Some(speed), None) | (None, Some(speed)) => PlayerSpeed::Fixed(speed),
        (None, None) => GameEngineOptions::default().player_speed,
    }
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_session_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn status_key(status: GameStatus) -> String {
    match status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    }
    .to_string()
}

fn build_run_summary(
    session_id: String,
    generated_at_iso: String,
    sessions: Vec<SessionResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let session_count = sessions.len();
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    for session in &sessions {
        *status_counts.entry(status_key(session.status)).or_insert(0) += 1;
    }
    let total_score: u64 = sessions.iter().map(|session| session.score as u64).sum();
    let average_score = if session_count == 0 {
        0
    } else {
        (total_score / session_count as u64) as u32
    };
    RunSummary {
        session_id,
        generated_at_iso,
        session_count,
        anomaly_count,
        average_score,
        status_counts,
        sessions,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    session_id: &str,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: Utc::now().timestamp_millis(),
        level: level.to_string(),
        event: event.to_string(),
        session_id: session_id.to_string(),
        seed,
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
