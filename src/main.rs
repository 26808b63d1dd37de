mod collide;
mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use arcade_combat::entities::{ObstacleKind, PowerUpKind};
use arcade_combat::weapons::{FireOutcome, PurchaseOutcome};
use arcade_combat::{GameConfig, GameEvent, World};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use glam::Vec2;
use rand::{thread_rng, Rng};
use tracing::{info, warn};

use display::{GameStatus, View};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS
const FRAME_MS: u64 = 33;

/// World units per second while a direction key is held.
const PLAYER_SPEED: f32 = 360.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// A crate or barrel rolls in roughly this often.
const OBSTACLE_EVERY_MS: u64 = 7_000;

/// How long a status message stays on the bottom row.
const MESSAGE_FRAMES: u32 = 60;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".arcade_combat_score")
}

fn load_high_score() -> u64 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u64) {
    if let Err(err) = std::fs::write(high_score_path(), score.to_string()) {
        warn!(%err, "could not save high score");
    }
}

// ── Difficulty ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Scale spawn pace and score on top of the loaded config.
    fn apply(self, config: &mut GameConfig) {
        let (pace, score) = match self {
            Difficulty::Easy => (1.5, 0.8),
            Difficulty::Medium => (1.0, 1.0),
            Difficulty::Hard => (0.6, 1.5),
        };
        let level = &mut config.level;
        level.spawn_interval_ms = ((level.spawn_interval_ms as f32 * pace) as u64).max(1);
        level.score_multiplier *= score;
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Difficulty),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    high_score: u64,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let left = cx.saturating_sub(18);

    let title = format!("★  ARCADE  COMBAT  ·  {}  ★", config.level.name.to_uppercase());
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(9),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(&title))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(8),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    out.queue(cursor::MoveTo(left, cy.saturating_sub(6)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green, "Sparse waves, reduced score"),
        ("2", "Medium", Color::Yellow, "Balanced challenge"),
        ("3", "Hard  ", Color::Red, "Dense waves, score x1.5"),
    ];
    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(5) + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", desc)))?;
    }

    out.queue(cursor::MoveTo(left, cy.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups (fly into them):"))?;
    for (i, kind) in PowerUpKind::ALL.iter().enumerate() {
        let row = cy + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(display::power_up_color(*kind)))?;
        out.queue(Print(kind.symbol()))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", kind.name())))?;
    }

    out.queue(cursor::MoveTo(left, cy + 7))?;
    out.queue(Print("Arrows/WASD: Move  SPACE: Fire  1-9: Weapon  B: Buy ammo  Q: Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        if let Ok(Event::Key(KeyEvent { code, .. })) = rx.recv() {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Difficulty::Easy)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Difficulty::Medium)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Difficulty::Hard)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// One-shot key actions that don't depend on holding.
fn on_press(world: &mut World, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            let kind = world.arsenal().kinds().nth(index)?;
            world.select_weapon(kind);
            Some(format!("{} selected", kind.label()))
        }
        KeyCode::Char('b') | KeyCode::Char('B') => {
            let kind = world.arsenal().selected();
            let text = match world.purchase_ammo(kind) {
                PurchaseOutcome::Bought { added, ammo, price } => {
                    format!("+{added} {} ammo ({ammo}) for {price}", kind.label())
                }
                PurchaseOutcome::InsufficientCredits { price, credits } => {
                    format!("Need {price} credits, have {credits}")
                }
                PurchaseOutcome::NotForSale => format!("{} ammo is not for sale", kind.label()),
            };
            Some(text)
        }
        _ => None,
    }
}

fn status_of(world: &World) -> GameStatus {
    if world.player().is_some_and(|p| p.defeated) {
        GameStatus::GameOver
    } else if world.progress().is_complete() {
        GameStatus::Cleared
    } else {
        GameStatus::Playing
    }
}

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input uses the same hold model for every key: `key_frame` records the
/// frame of the last press/repeat, and a key counts as held while that frame
/// is within `HOLD_WINDOW`.  Release events remove keys immediately on
/// terminals that report them.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
    high_score: u64,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let bounds = world.bounds();
    let mut pos = Vec2::new(bounds.width * 0.12, bounds.height * 0.5);
    world.set_player(pos, Vec2::ZERO, true);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut next_obstacle_at = OBSTACLE_EVERY_MS;
    let mut message: Option<(String, u32)> = None;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let status = status_of(world);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if status != GameStatus::Playing =>
                        {
                            return Ok(false);
                        }
                        _ => {
                            if let Some(text) = on_press(world, code) {
                                message = Some((text, MESSAGE_FRAMES));
                            }
                        }
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if status == GameStatus::Playing {
            // ── Held-key movement and fire ───────────────────────────────────
            let held = |keys: &[KeyCode]| any_held(&key_frame, keys, frame);
            let mut dir = Vec2::ZERO;
            if held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]) {
                dir.x -= 1.0;
            }
            if held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]) {
                dir.x += 1.0;
            }
            if held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]) {
                dir.y -= 1.0;
            }
            if held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]) {
                dir.y += 1.0;
            }
            let vel = dir.normalize_or_zero() * PLAYER_SPEED;
            pos += vel * (FRAME_MS as f32 / 1_000.0);
            pos = pos.clamp(Vec2::ZERO, Vec2::new(bounds.width, bounds.height));
            world.set_player(pos, vel, true);

            if is_held(&key_frame, &KeyCode::Char(' '), frame) {
                if let FireOutcome::OutOfAmmo { message: text, .. } = world.fire(Vec2::X) {
                    message = Some((text, MESSAGE_FRAMES));
                }
            }

            // ── Scripted obstacles ───────────────────────────────────────────
            if world.now() >= next_obstacle_at {
                let kind =
                    if rng.gen_bool(0.3) { ObstacleKind::Barrel } else { ObstacleKind::Crate };
                let y = rng.gen_range(bounds.height * 0.1..bounds.height * 0.9);
                world.spawn_obstacle(kind, Vec2::new(bounds.width, y));
                next_obstacle_at = world.now() + OBSTACLE_EVERY_MS;
            }

            // ── Simulation ───────────────────────────────────────────────────
            // Overlaps are detected on the positions this tick produced.
            world.tick(FRAME_MS, &mut rng, collide::detect);

            for event in world.drain_events() {
                match &event {
                    GameEvent::LevelComplete { reason } => {
                        message = Some((format!("Level complete: {reason}"), u32::MAX));
                    }
                    GameEvent::PlayerDefeated => {
                        info!(score = world.ledger().score, "player defeated")
                    }
                    _ => {}
                }
                tracing::debug!(%event);
            }
        }

        let status = status_of(world);
        let view = View {
            world,
            status,
            high_score,
            message: message.as_ref().map(|(text, _)| text.as_str()),
        };
        display::render(out, &view)?;

        if let Some((_, frames)) = message.as_mut() {
            *frames = frames.saturating_sub(1);
            if *frames == 0 {
                message = None;
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging() -> Result<()> {
    let file = File::create("arcade_combat.log").context("failed to create arcade_combat.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config() -> Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("failed to load config {path}")),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let config = load_config()?;
    info!(level = %config.level.name, enemy_types = config.level.enemy_types.len(), "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Blocking event reads live on their own thread so the game loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal session failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let mut high_score = load_high_score();

    loop {
        match show_menu(out, rx, config, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Start(difficulty) => {
                let mut config = config.clone();
                difficulty.apply(&mut config);
                info!(?difficulty, "run started");
                let mut world = World::new(config);
                let quit = game_loop(out, &mut world, rx, high_score)?;

                let score = world.ledger().score;
                info!(score, kills = world.ledger().kills, "run finished");
                if score > high_score {
                    high_score = score;
                    save_high_score(high_score);
                }

                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
