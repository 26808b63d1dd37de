/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No game logic is performed; this module only maps world
/// coordinates onto terminal cells and prints.

use std::io::Write;

use arcade_combat::behavior::Behavior;
use arcade_combat::entities::{
    Enemy, Obstacle, ObstacleKind, PowerUpDrop, PowerUpKind, Projectile, ProjectileOwner,
};
use arcade_combat::weapons::{Special, WeaponKind};
use arcade_combat::World;
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_WEAPON: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_ELITE: Color = Color::Red;
const C_ENEMY_FLASH: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_OBSTACLE: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;
const C_MESSAGE: Color = Color::Yellow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
    Cleared,
}

pub struct View<'a> {
    pub world: &'a World,
    pub status: GameStatus,
    pub high_score: u64,
    pub message: Option<&'a str>,
}

/// World → cell mapping for the play area between the two border rows.
struct Screen {
    width: u16,
    height: u16,
    scale: Vec2,
}

impl Screen {
    fn new(world: &World, (width, height): (u16, u16)) -> Self {
        let bounds = world.bounds();
        let cols = width.saturating_sub(2).max(1) as f32;
        let rows = height.saturating_sub(4).max(1) as f32;
        Self { width, height, scale: Vec2::new(cols / bounds.width, rows / bounds.height) }
    }

    /// Cell for a world position, or `None` outside the play area.
    fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        let p = pos * self.scale;
        let (x, y) = (p.x.floor() as i32 + 1, p.y.floor() as i32 + 2);
        let inside = x >= 1
            && x < self.width as i32 - 1
            && y >= 2
            && y < self.height as i32 - 2;
        inside.then_some((x as u16, y as u16))
    }
}

pub fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Heal => Color::Magenta,
        PowerUpKind::DamageBoost => Color::Red,
        PowerUpKind::RapidFire => Color::Cyan,
        PowerUpKind::Overdrive => Color::Yellow,
        PowerUpKind::FreeAmmo => Color::Green,
        PowerUpKind::Shield => Color::Blue,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let screen = Screen::new(view.world, terminal::size()?);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &screen)?;
    draw_hud(out, view, &screen)?;

    for (_, obstacle) in view.world.obstacles().iter() {
        draw_obstacle(out, &screen, obstacle)?;
    }
    for (_, enemy) in view.world.enemies().iter() {
        draw_enemy(out, &screen, enemy)?;
    }
    for (_, drop) in view.world.drops().iter() {
        draw_drop(out, &screen, drop, view.world.now())?;
    }
    for (_, projectile) in view.world.projectiles().iter() {
        draw_projectile(out, &screen, projectile)?;
    }

    draw_player(out, view, &screen)?;
    draw_footer(out, view, &screen)?;

    match view.status {
        GameStatus::Playing => {}
        GameStatus::GameOver => draw_overlay(out, view, &screen, "GAME  OVER", Color::Red)?,
        GameStatus::Cleared => draw_overlay(out, view, &screen, "LEVEL CLEAR", Color::Green)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let w = screen.width as usize;
    let h = screen.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &View, screen: &Screen) -> std::io::Result<()> {
    let hud = view.world.hud();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if view.high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>7}  Hi:{:>7}  Kills:{:>4}  Cr:{:>5}",
            hud.score, view.high_score, hud.kills, hud.credits
        )))?;
    } else {
        out.queue(Print(format!(
            "Score:{:>7}  Kills:{:>4}  Cr:{:>5}",
            hud.score, hud.kills, hud.credits
        )))?;
    }

    // Active bonuses with remaining seconds, then weapon and health.
    let bonuses: String = hud
        .bonuses
        .iter()
        .map(|b| format!("[{} {:>2}s] ", b.symbol, b.remaining_ms / 1_000 + 1))
        .collect();
    let ammo = match hud.ammo {
        Some(n) => n.to_string(),
        None => "∞".to_string(),
    };
    let weapon = format!("{} {}  ", hud.weapon.label(), ammo);
    let filled = ((hud.health / hud.max_health.max(1.0)) * 10.0).ceil().clamp(0.0, 10.0) as usize;
    let health = format!("HP {}{}", "█".repeat(filled), "░".repeat(10 - filled));

    let right_len = bonuses.chars().count() + weapon.chars().count() + health.chars().count();
    let rx = screen.width.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_MESSAGE))?;
    out.queue(Print(&bonuses))?;
    out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
    out.queue(Print(&weapon))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &View, screen: &Screen) -> std::io::Result<()> {
    let Some(player) = view.world.player() else {
        return Ok(());
    };
    let Some((x, y)) = screen.cell(player.pos) else {
        return Ok(());
    };
    let color = if view.world.aggregate().invulnerable { Color::Blue } else { C_PLAYER };
    out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print("=▶"))?;
    Ok(())
}

fn enemy_glyph(behavior: Behavior) -> &'static str {
    match behavior {
        Behavior::Straight | Behavior::Curve => "◀",
        Behavior::Zigzag | Behavior::Buzz => "≶",
        Behavior::Chase | Behavior::FastChase | Behavior::Honor => "◄",
        Behavior::Aerial => "▼",
        Behavior::LightningHunt => "ϟ",
        Behavior::Tactical | Behavior::Sniper => "¤",
        Behavior::Smart => "◆",
        Behavior::Boss => "◉",
        Behavior::Swarm => "·",
        Behavior::Ambush => "▪",
        Behavior::Deceive => "?",
        Behavior::Root => "¥",
        Behavior::Phase => "◌",
    }
}

fn draw_enemy<W: Write>(out: &mut W, screen: &Screen, enemy: &Enemy) -> std::io::Result<()> {
    if enemy.dead {
        return Ok(());
    }
    let Some((x, y)) = screen.cell(enemy.pos) else {
        return Ok(());
    };
    let color = if enemy.hit_flash {
        C_ENEMY_FLASH
    } else if enemy.enraged || matches!(enemy.behavior, Behavior::Smart | Behavior::Boss) {
        C_ENEMY_ELITE
    } else if enemy.is_intangible() {
        Color::DarkGrey
    } else {
        C_ENEMY
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(enemy_glyph(enemy.behavior)))?;
    Ok(())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    screen: &Screen,
    shot: &Projectile,
) -> std::io::Result<()> {
    if shot.spent {
        return Ok(());
    }
    let Some((x, y)) = screen.cell(shot.pos) else {
        return Ok(());
    };
    let (glyph, color) = match (shot.owner, shot.weapon, shot.special) {
        (ProjectileOwner::Enemy, _, _) => ("•", C_BULLET_ENEMY),
        (_, _, Special::Beam) => ("═", C_BULLET_PLAYER),
        (_, _, Special::Homing { .. }) => ("»", C_BULLET_PLAYER),
        (_, Some(WeaponKind::Nuke), _) => ("☢", Color::Yellow),
        (_, _, Special::Area(_)) => ("●", Color::Yellow),
        _ => ("-", C_BULLET_PLAYER),
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Draw a drifting power-up.  Blinking drops skip every other 250 ms.
fn draw_drop<W: Write>(
    out: &mut W,
    screen: &Screen,
    drop: &PowerUpDrop,
    now: u64,
) -> std::io::Result<()> {
    if drop.collected || (drop.blinking && (now / 250) % 2 == 1) {
        return Ok(());
    }
    let Some((x, y)) = screen.cell(drop.pos) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(power_up_color(drop.kind)))?;
    out.queue(Print(drop.kind.symbol()))?;
    Ok(())
}

fn draw_obstacle<W: Write>(
    out: &mut W,
    screen: &Screen,
    obstacle: &Obstacle,
) -> std::io::Result<()> {
    if obstacle.destroyed {
        return Ok(());
    }
    let Some((x, y)) = screen.cell(obstacle.pos) else {
        return Ok(());
    };
    let glyph = match obstacle.kind {
        ObstacleKind::Crate => "▣",
        ObstacleKind::Barrel => "◘",
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(C_OBSTACLE))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Footer (last row) ─────────────────────────────────────────────────────────

fn draw_footer<W: Write>(out: &mut W, view: &View, screen: &Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.height.saturating_sub(1)))?;
    match view.message {
        Some(text) => {
            out.queue(style::SetForegroundColor(C_MESSAGE))?;
            out.queue(Print(text))?;
        }
        None => {
            out.queue(style::SetForegroundColor(C_HINT))?;
            out.queue(Print("Arrows/WASD: Move  SPACE: Fire  1-9: Weapon  B: Buy  Q: Quit"))?;
        }
    }
    Ok(())
}

// ── Game-over / level-clear overlay ───────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    view: &View,
    screen: &Screen,
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let score = view.world.ledger().score;
    let score_line = format!("Final Score: {:>7}", score);
    let new_best = score >= view.high_score && score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>7} ★", score)
    } else {
        format!("Best Score:  {:>7}", view.high_score)
    };
    let title_line = format!("║    {:<16}║", title);

    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", color),
        (&title_line, color),
        ("╚════════════════════╝", color),
    ];
    let cx = screen.width / 2;
    let start_row = (screen.height / 2).saturating_sub(3);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let rows: [(&str, Color); 3] = [
        (&score_line, Color::Yellow),
        (&best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Menu  Q - Quit", Color::White),
    ];
    for (i, (msg, color)) in rows.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + 3 + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
