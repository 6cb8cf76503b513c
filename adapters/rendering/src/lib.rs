#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Fish Hunt adapters.

use anyhow::Result as AnyResult;
use fish_hunt_core::{
    config::Playfield, CannonSnapshot, Command, Cue, EffectKind, EffectSnapshot, Event, FireMode,
    FishSnapshot, HudSnapshot, Notice, Point, ProjectileSnapshot, Rgb, Species,
};
use glam::Vec2;
use std::time::Duration;

/// Frames a notice stays on screen.
const NOTICE_FRAMES: u32 = 60;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided opacity.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn vec2(point: Point) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units.
    pub cursor: Option<Vec2>,
    /// Whether the fire button is held this frame.
    pub fire: bool,
    /// Whether an upgrade was requested this frame.
    pub upgrade: bool,
    /// Whether the fire mode should advance to the next mode.
    pub cycle_fire_mode: bool,
    /// Whether auto-aim should be toggled.
    pub toggle_auto_aim: bool,
    /// Whether pause should be toggled.
    pub toggle_pause: bool,
    /// Whether the bet should step up.
    pub raise_bet: bool,
    /// Whether the bet should step down.
    pub lower_bet: bool,
    /// Whether the session should restart.
    pub restart: bool,
}

impl FrameInput {
    /// Translates the captured input into session commands.
    ///
    /// Aiming comes first so a shot fired on the same frame uses the new aim.
    pub fn commands(&self, mode: FireMode, out: &mut Vec<Command>) {
        if let Some(cursor) = self.cursor {
            out.push(Command::AimAt {
                point: Point::new(cursor.x, cursor.y),
            });
        }
        if self.cycle_fire_mode {
            out.push(Command::SetFireMode {
                mode: next_fire_mode(mode),
            });
        }
        if self.toggle_auto_aim {
            out.push(Command::ToggleAutoAim);
        }
        if self.raise_bet {
            out.push(Command::RaiseBet);
        }
        if self.lower_bet {
            out.push(Command::LowerBet);
        }
        if self.upgrade {
            out.push(Command::UpgradeCannon);
        }
        if self.fire {
            out.push(Command::Fire);
        }
        if self.toggle_pause {
            out.push(Command::TogglePause);
        }
        if self.restart {
            out.push(Command::Restart);
        }
    }
}

fn next_fire_mode(mode: FireMode) -> FireMode {
    match mode {
        FireMode::Projectile => FireMode::Lightning,
        FireMode::Lightning => FireMode::ContinuousLightning,
        FireMode::ContinuousLightning => FireMode::Projectile,
    }
}

/// Human readable label of a fire mode.
#[must_use]
pub const fn fire_mode_label(mode: FireMode) -> &'static str {
    match mode {
        FireMode::Projectile => "cannon",
        FireMode::Lightning => "lightning",
        FireMode::ContinuousLightning => "continuous lightning",
    }
}

/// Formats an integer with comma thousands separators.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Fish drawn in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct FishPresentation {
    /// Species, used by backends to pick a body shape.
    pub species: Species,
    /// Centre of the body.
    pub position: Vec2,
    /// Body radius.
    pub radius: f32,
    /// Heading in radians derived from the last displacement.
    pub facing: f32,
    /// Body color, lightened while the fish is invulnerable.
    pub color: Color,
    /// Remaining health as a fraction of the spawn health.
    pub health_fraction: f32,
    /// Whether a crown should be drawn.
    pub boss: bool,
}

impl From<&FishSnapshot> for FishPresentation {
    fn from(fish: &FishSnapshot) -> Self {
        let base = Color::from(fish.color);
        let moving = fish.velocity.dx != 0.0 || fish.velocity.dy != 0.0;
        Self {
            species: fish.species,
            position: vec2(fish.position),
            radius: fish.radius,
            facing: if moving {
                fish.velocity.dy.atan2(fish.velocity.dx)
            } else {
                0.0
            },
            color: if fish.invulnerable {
                base.lighten(0.5)
            } else {
                base
            },
            health_fraction: if fish.max_health > 0.0 {
                (fish.health / fish.max_health).clamp(0.0, 1.0)
            } else {
                0.0
            },
            boss: fish.boss,
        }
    }
}

/// Projectile drawn in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the body or the blast.
    pub position: Vec2,
    /// Body radius, or blast radius once exploded.
    pub radius: f32,
    /// Tint, faded while the blast plays out.
    pub color: Color,
    /// Whether the blast is drawn instead of the body.
    pub exploded: bool,
    /// Recent positions, oldest first.
    pub trail: Vec<Vec2>,
}

impl From<&ProjectileSnapshot> for ProjectilePresentation {
    fn from(projectile: &ProjectileSnapshot) -> Self {
        let color = Color::from(projectile.color);
        Self {
            position: vec2(projectile.position),
            radius: projectile.radius,
            color: if projectile.exploded {
                color.with_alpha(1.0 - projectile.explosion_progress)
            } else {
                color
            },
            exploded: projectile.exploded,
            trail: projectile.trail.iter().copied().map(vec2).collect(),
        }
    }
}

/// Cannon drawn at the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct CannonPresentation {
    /// Pivot of the barrel.
    pub pivot: Vec2,
    /// End of the barrel.
    pub barrel_tip: Vec2,
    /// Aim angle in radians.
    pub angle: f32,
    /// Barrel color, dimmed while reloading.
    pub color: Color,
    /// Crosshair at the point the cannon turns toward.
    pub crosshair: Vec2,
}

impl CannonPresentation {
    fn new(cannon: &CannonSnapshot, barrel_length: f32) -> Self {
        let color = Color::from(cannon.color);
        Self {
            pivot: vec2(cannon.position),
            barrel_tip: vec2(cannon.position.offset(cannon.angle, barrel_length)),
            angle: cannon.angle,
            color: if cannon.reloading {
                color.with_alpha(0.6)
            } else {
                color
            },
            crosshair: vec2(cannon.target_point),
        }
    }
}

/// Transient effect drawn over the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectPresentation {
    /// Visual category.
    pub kind: EffectKind,
    /// Anchor position.
    pub position: Vec2,
    /// Size of the effect.
    pub radius: f32,
    /// Tint including the fade.
    pub color: Color,
}

impl From<&EffectSnapshot> for EffectPresentation {
    fn from(effect: &EffectSnapshot) -> Self {
        Self {
            kind: effect.kind,
            position: vec2(effect.position),
            radius: effect.radius,
            color: Color::from(effect.color).with_alpha(effect.alpha),
        }
    }
}

/// Floating text raised by a world notice.
#[derive(Clone, Debug, PartialEq)]
pub struct NoticePresentation {
    /// Text to display.
    pub text: String,
    /// Anchor position, rising as the notice ages.
    pub position: Vec2,
    /// Frames left before the notice disappears.
    pub frames_left: u32,
}

impl NoticePresentation {
    /// Builds the notice carried by `event`, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        let Event::Notice { at, notice } = event else {
            return None;
        };
        Some(Self {
            text: notice_text(*notice),
            position: vec2(*at),
            frames_left: NOTICE_FRAMES,
        })
    }
}

/// Text shown for a notice.
#[must_use]
pub fn notice_text(notice: Notice) -> String {
    match notice {
        Notice::Score(score) => format!("+{}", format_thousands(score)),
        Notice::Coins(coins) => format!("+{} coins", format_thousands(coins)),
        Notice::InsufficientFunds => "Insufficient funds".to_owned(),
    }
}

/// Heads-up display text and flags.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Formatted score balance.
    pub score: String,
    /// Formatted coin balance.
    pub coins: String,
    /// Formatted bet.
    pub bet: String,
    /// Cannon tier label, counting from one.
    pub tier: String,
    /// Upgrade price label, or `MAX` at the top tier.
    pub upgrade: String,
    /// Whether the upgrade button is enabled.
    pub can_upgrade: bool,
    /// Whether the attack button is enabled.
    pub can_attack: bool,
    /// Combo counter label, empty below two kills.
    pub combo: String,
    /// Accuracy label.
    pub accuracy: String,
    /// Active fire mode label.
    pub fire_mode: &'static str,
    /// Whether the pause overlay is shown.
    pub paused: bool,
    /// Whether the game-over overlay is shown.
    pub game_over: bool,
}

impl From<&HudSnapshot> for HudPresentation {
    fn from(hud: &HudSnapshot) -> Self {
        Self {
            score: format_thousands(hud.score),
            coins: format_thousands(hud.coins),
            bet: format_thousands(hud.bet),
            tier: format!("Lv.{}", u32::from(hud.tier) + 1),
            upgrade: hud
                .upgrade_cost
                .map_or_else(|| "MAX".to_owned(), format_thousands),
            can_upgrade: hud.can_upgrade,
            can_attack: hud.can_attack,
            combo: if hud.combo >= 2 {
                format!("{} combo", hud.combo)
            } else {
                String::new()
            },
            accuracy: format!("{:.1}%", hud.accuracy),
            fire_mode: fire_mode_label(hud.fire_mode),
            paused: hud.paused,
            game_over: hud.game_over,
        }
    }
}

/// Scene description combining the playfield and everything drawn on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the playfield in world units.
    pub size: Vec2,
    /// Fish ordered by identifier.
    pub fish: Vec<FishPresentation>,
    /// Projectiles ordered by identifier.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Cannon at the bottom edge.
    pub cannon: CannonPresentation,
    /// Transient effects, oldest first.
    pub effects: Vec<EffectPresentation>,
    /// Notices still on screen.
    pub notices: Vec<NoticePresentation>,
    /// Heads-up display.
    pub hud: HudPresentation,
}

impl Scene {
    /// Builds a scene from world snapshots.
    #[must_use]
    pub fn compose(
        playfield: &Playfield,
        barrel_length: f32,
        hud: &HudSnapshot,
        cannon: &CannonSnapshot,
        fish: &[FishSnapshot],
        projectiles: &[ProjectileSnapshot],
        effects: &[EffectSnapshot],
    ) -> Self {
        Self {
            size: Vec2::new(playfield.width, playfield.height),
            fish: fish.iter().map(FishPresentation::from).collect(),
            projectiles: projectiles
                .iter()
                .map(ProjectilePresentation::from)
                .collect(),
            cannon: CannonPresentation::new(cannon, barrel_length),
            effects: effects.iter().map(EffectPresentation::from).collect(),
            notices: Vec::new(),
            hud: HudPresentation::from(hud),
        }
    }

    /// Replaces the world-derived channels while keeping notices alive.
    pub fn refresh(&mut self, next: Scene) {
        let notices = std::mem::take(&mut self.notices);
        *self = next;
        self.notices = notices;
    }

    /// Adds notices carried by `events` and ages the existing ones by a frame.
    pub fn absorb_notices(&mut self, events: &[Event]) {
        for notice in &mut self.notices {
            notice.frames_left = notice.frames_left.saturating_sub(1);
            notice.position.y -= 1.0;
        }
        self.notices.retain(|notice| notice.frames_left > 0);
        self.notices
            .extend(events.iter().filter_map(NoticePresentation::from_event));
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Fish Hunt scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Receiver of named audio cues.
pub trait CueSink {
    /// Plays or records a single cue.
    fn play(&mut self, cue: Cue);
}

impl CueSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Forwards every cue carried by `events` to `sink`, in order.
pub fn forward_cues<S: CueSink + ?Sized>(events: &[Event], sink: &mut S) {
    for event in events {
        if let Event::Cue { cue } = event {
            sink.play(*cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_hunt_core::{FishId, ProjectileId, Velocity};

    #[test]
    fn thousands_are_separated_with_commas() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(10_000), "10,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn colors_convert_from_byte_triples() {
        let color = Color::from(Rgb::from_rgb(255, 0, 51));
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
        assert_eq!(color.with_alpha(2.0).alpha, 1.0);
        assert_eq!(Color::new(0.0, 0.5, 1.0, 1.0).lighten(0.5).green, 0.75);
    }

    #[test]
    fn hud_labels_follow_the_snapshot() {
        let mut snapshot = hud();
        snapshot.combo = 6;
        snapshot.accuracy = 62.5;
        let presentation = HudPresentation::from(&snapshot);

        assert_eq!(presentation.score, "10,000");
        assert_eq!(presentation.tier, "Lv.1");
        assert_eq!(presentation.upgrade, "2,000");
        assert_eq!(presentation.combo, "6 combo");
        assert_eq!(presentation.accuracy, "62.5%");
        assert_eq!(presentation.fire_mode, "cannon");

        snapshot.upgrade_cost = None;
        snapshot.combo = 1;
        let presentation = HudPresentation::from(&snapshot);
        assert_eq!(presentation.upgrade, "MAX");
        assert!(presentation.combo.is_empty());
    }

    #[test]
    fn input_aims_before_firing() {
        let input = FrameInput {
            cursor: Some(Vec2::new(10.0, 20.0)),
            fire: true,
            cycle_fire_mode: true,
            ..FrameInput::default()
        };
        let mut out = Vec::new();
        input.commands(FireMode::ContinuousLightning, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AimAt {
                    point: Point::new(10.0, 20.0)
                },
                Command::SetFireMode {
                    mode: FireMode::Projectile
                },
                Command::Fire,
            ]
        );
    }

    #[test]
    fn scene_mirrors_snapshots() {
        let fish = vec![FishSnapshot {
            id: FishId::new(3),
            species: Species::Gold,
            position: Point::new(100.0, 50.0),
            velocity: Velocity::new(0.0, 1.0),
            radius: 35.0,
            health: 10.0,
            max_health: 40.0,
            score: 20,
            boss: false,
            invulnerable: true,
            group: None,
            color: Rgb::from_rgb(0, 0, 0),
        }];
        let projectiles = vec![ProjectileSnapshot {
            id: ProjectileId::new(1),
            position: Point::new(5.0, 5.0),
            heading: 0.0,
            radius: 30.0,
            tier: 0,
            color: Rgb::from_rgb(255, 255, 255),
            exploded: true,
            explosion_progress: 0.25,
            trail: vec![Point::new(1.0, 1.0)],
            homing_target: None,
            chain_capable: false,
        }];
        let scene = Scene::compose(
            &Playfield::default(),
            60.0,
            &hud(),
            &cannon(),
            &fish,
            &projectiles,
            &[],
        );

        assert_eq!(scene.size, Vec2::new(980.0, 600.0));
        assert_eq!(scene.fish[0].health_fraction, 0.25);
        assert_eq!(scene.fish[0].color, Color::new(0.5, 0.5, 0.5, 1.0));
        assert!((scene.fish[0].facing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(scene.projectiles[0].color.alpha, 0.75);
        assert_eq!(scene.projectiles[0].trail, vec![Vec2::new(1.0, 1.0)]);
        assert!((scene.cannon.barrel_tip - Vec2::new(490.0, 460.0)).length() < 1e-3);
    }

    #[test]
    fn notices_age_and_expire() {
        let mut scene = Scene::compose(
            &Playfield::default(),
            60.0,
            &hud(),
            &cannon(),
            &[],
            &[],
            &[],
        );
        let events = vec![
            Event::Notice {
                at: Point::new(0.0, 100.0),
                notice: Notice::Coins(1_500),
            },
            Event::Cue { cue: Cue::Hit },
        ];
        scene.absorb_notices(&events);
        assert_eq!(scene.notices.len(), 1);
        assert_eq!(scene.notices[0].text, "+1,500 coins");

        let next = scene.clone();
        scene.refresh(next);
        for _ in 0..NOTICE_FRAMES - 1 {
            scene.absorb_notices(&[]);
        }
        assert_eq!(scene.notices.len(), 1);
        assert_eq!(scene.notices[0].position.y, 100.0 - (NOTICE_FRAMES - 1) as f32);
        scene.absorb_notices(&[]);
        assert!(scene.notices.is_empty());
    }

    #[test]
    fn cues_are_forwarded_in_order() {
        let events = vec![
            Event::Cue { cue: Cue::Shoot },
            Event::BetChanged { bet: 3 },
            Event::Cue {
                cue: Cue::Explosion,
            },
        ];
        let mut sink: Vec<Cue> = Vec::new();
        forward_cues(&events, &mut sink);
        assert_eq!(sink, vec![Cue::Shoot, Cue::Explosion]);
    }

    fn hud() -> HudSnapshot {
        HudSnapshot {
            score: 10_000,
            coins: 10_000,
            bet: 2,
            tier: 0,
            upgrade_cost: Some(2_000),
            can_upgrade: true,
            can_attack: true,
            combo: 0,
            highest_combo: 0,
            shots: 0,
            hits: 0,
            accuracy: 0.0,
            total_wagered: 0,
            total_won: 0,
            difficulty: 1,
            fire_mode: FireMode::Projectile,
            paused: false,
            game_over: false,
        }
    }

    fn cannon() -> CannonSnapshot {
        CannonSnapshot {
            position: Point::new(490.0, 520.0),
            angle: -std::f32::consts::FRAC_PI_2,
            tier: 0,
            power: 1,
            cost: 1,
            color: Rgb::from_rgb(0xff, 0xd7, 0x00),
            reloading: false,
            target_point: Point::new(490.0, 0.0),
            auto_aim: false,
            auto_aim_target: None,
        }
    }
}
