#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fish Hunt engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing player intent, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing every
//! observable outcome. Systems and adapters read immutable snapshots and never
//! mutate the session directly.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod math;
mod snapshot;

pub use snapshot::{
    CannonSnapshot, EffectKind, EffectSnapshot, FishSnapshot, HudSnapshot, ProjectileSnapshot,
    SchoolStats,
};

/// Nominal duration of a single simulation frame.
pub const FRAME: Duration = Duration::from_millis(16);

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by exactly one logical frame.
    Tick {
        /// Wall-clock duration represented by the frame.
        dt: Duration,
    },
    /// Points the cannon toward the provided playfield location.
    AimAt {
        /// Location the cannon should rotate toward.
        point: Point,
    },
    /// Pulls the trigger using the active fire mode.
    Fire,
    /// Requests an upgrade of the cannon to its next tier.
    UpgradeCannon,
    /// Sets the bet to an explicit amount.
    SetBet {
        /// Requested bet in coins.
        amount: u64,
    },
    /// Steps the bet to the next larger option.
    RaiseBet,
    /// Steps the bet to the next smaller option.
    LowerBet,
    /// Switches the active fire mode.
    SetFireMode {
        /// Mode that should become active.
        mode: FireMode,
    },
    /// Enables or disables autonomous aiming.
    ToggleAutoAim,
    /// Flips the paused flag.
    TogglePause,
    /// Discards all session state and starts a fresh session.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced one frame.
    TimeAdvanced {
        /// Logical tick index reached after advancing.
        tick: u64,
        /// Duration represented by the frame.
        dt: Duration,
    },
    /// Confirms that a fish entered the playfield.
    FishSpawned {
        /// Identifier assigned to the fish.
        fish: FishId,
        /// Species of the fish.
        species: Species,
        /// Whether the fish is a boss.
        boss: bool,
        /// Formation the fish belongs to, if any.
        group: Option<GroupId>,
    },
    /// Confirms that a formation of fish was created.
    FormationSpawned {
        /// Identifier of the formation.
        group: GroupId,
        /// Geometric arrangement of the members.
        shape: FormationShape,
        /// Number of members spawned.
        members: u32,
    },
    /// Announces that the difficulty level increased.
    DifficultyIncreased {
        /// Difficulty level after the increase.
        level: u32,
    },
    /// Confirms that the cannon launched a projectile.
    ProjectileFired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Tier the projectile was fired at.
        tier: u8,
        /// Barrel tip the projectile left from.
        origin: Point,
    },
    /// Reports that a projectile split into a fan of children.
    ProjectileSplit {
        /// Projectile that split.
        parent: ProjectileId,
        /// Children created by the split.
        children: Vec<ProjectileId>,
    },
    /// Reports that a lightning strike was paid for and scheduled.
    LightningCharged {
        /// Fish the strike will hit.
        target: FishId,
        /// Coins deducted for the strike.
        cost: u64,
        /// Damage the strike will deal.
        damage: f32,
    },
    /// Reports that a fish took damage.
    FishDamaged {
        /// Fish that was damaged.
        fish: FishId,
        /// Amount of damage applied.
        damage: f32,
        /// Mechanism that produced the damage.
        source: DamageSource,
    },
    /// Reports that a fish died.
    FishKilled {
        /// Fish that died.
        fish: FishId,
        /// Species of the fish.
        species: Species,
        /// Whether the fish was a boss.
        boss: bool,
        /// Score awarded for the kill.
        score: u64,
        /// Coins awarded for the kill.
        coins: u64,
        /// Mechanism that landed the killing blow.
        source: DamageSource,
    },
    /// Reports that the combo counter crossed a bonus threshold.
    ComboBonus {
        /// Combo count that earned the bonus.
        combo: u32,
        /// Score granted by the bonus.
        bonus: u64,
    },
    /// Reports that the combo counter was reset.
    ComboBroken {
        /// Combo count before the reset.
        previous: u32,
    },
    /// Reports that a chain reaction was rolled and scheduled.
    ChainTriggered {
        /// Identifier of the chain.
        chain: ChainId,
        /// Fish whose death started the chain.
        origin: FishId,
    },
    /// Reports that a chain reaction jumped to a new fish.
    ChainHop {
        /// Chain the hop belongs to.
        chain: ChainId,
        /// Fish the hop struck.
        target: FishId,
        /// Hop depth, starting at one for the first jump.
        depth: u32,
        /// Damage applied by the hop.
        damage: f32,
    },
    /// Reports that a chain reaction has no pending hops left.
    ChainFinished {
        /// Chain that finished.
        chain: ChainId,
        /// Number of hops that landed on a living fish.
        hops: u32,
        /// Number of fish killed by hops.
        kills: u32,
        /// Score awarded by hop kills.
        score: u64,
    },
    /// Confirms that the cannon moved to a new tier.
    CannonUpgraded {
        /// Tier after the upgrade.
        tier: u8,
        /// Score paid for the upgrade.
        cost: u64,
    },
    /// Reports that a player action was refused without changing state.
    ActionRefused {
        /// Action that was attempted.
        action: Action,
        /// Reason the action was refused.
        reason: Refusal,
    },
    /// Confirms that the bet changed.
    BetChanged {
        /// Bet after the change.
        bet: u64,
    },
    /// Confirms that the fire mode changed.
    FireModeChanged {
        /// Mode after the change.
        mode: FireMode,
    },
    /// Confirms that auto-aim was toggled.
    AutoAimChanged {
        /// Whether auto-aim is now enabled.
        enabled: bool,
    },
    /// Confirms that the paused flag changed.
    PauseChanged {
        /// Whether the session is now paused.
        paused: bool,
    },
    /// Transient notification anchored to a playfield position.
    Notice {
        /// Location the notification should appear at.
        at: Point,
        /// Content of the notification.
        notice: Notice,
    },
    /// Fire-and-forget audio or haptic cue.
    Cue {
        /// Cue that should be played.
        cue: Cue,
    },
    /// Announces that the score ran out.
    GameOver {
        /// Score at the moment the session ended.
        final_score: u64,
    },
    /// Confirms that a fresh session replaced the previous one.
    SessionRestarted,
}

/// Player actions that may be refused by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Firing the cannon.
    Fire,
    /// Paying for a lightning strike.
    Strike,
    /// Upgrading the cannon.
    Upgrade,
    /// Changing the bet.
    Bet,
}

/// Reasons a player action may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Refusal {
    /// The cannon is still reloading.
    Reloading,
    /// The session is paused.
    Paused,
    /// The session has ended.
    GameOver,
    /// There is no score left to pay for a shot.
    OutOfScore,
    /// The coin balance cannot cover the bet.
    InsufficientFunds {
        /// Bet that was required.
        bet: u64,
        /// Coins that were available.
        coins: u64,
    },
    /// The score cannot cover the upgrade.
    InsufficientScore {
        /// Score that was required.
        required: u64,
        /// Score that was available.
        available: u64,
    },
    /// The cannon is already at its highest tier.
    MaxTier,
    /// No living fish was available to strike.
    NoTarget,
    /// The requested bet lies outside the accepted range.
    InvalidBet {
        /// Bet that was requested.
        amount: u64,
    },
}

/// Mechanisms that can damage a fish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Direct projectile impact.
    Projectile,
    /// Contact with an exploding projectile.
    Explosion,
    /// Splash damage around a primary hit.
    Area,
    /// Direct lightning strike.
    Lightning,
    /// Splash damage around a lightning strike.
    LightningArea,
    /// Chain reaction hop.
    Chain,
}

/// Ways the cannon can attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireMode {
    /// Physical projectiles paid for with score.
    #[default]
    Projectile,
    /// Single lightning strikes paid for with coins.
    Lightning,
    /// Repeated lightning strikes locked onto the most valuable fish.
    ContinuousLightning,
}

/// Named cues forwarded to the audio or haptic sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// The cannon fired.
    Shoot,
    /// A projectile or strike connected.
    Hit,
    /// A fish died.
    Explosion,
    /// A lightning strike landed.
    Lightning,
    /// The cannon was upgraded.
    Upgrade,
    /// An attack was refused for lack of coins.
    InsufficientFunds,
    /// A combo bonus was granted.
    Combo,
    /// A boss entered the playfield.
    BossSpawned,
    /// The session ended.
    GameOver,
}

impl Cue {
    /// Stable name used by sinks to look up assets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shoot => "shoot",
            Self::Hit => "hit",
            Self::Explosion => "explosion",
            Self::Lightning => "lightning",
            Self::Upgrade => "upgrade",
            Self::InsufficientFunds => "insufficient-funds",
            Self::Combo => "combo",
            Self::BossSpawned => "boss",
            Self::GameOver => "game-over",
        }
    }
}

/// Content of a transient notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    /// Score gained at the location.
    Score(u64),
    /// Coins gained at the location.
    Coins(u64),
    /// An attack could not be paid for.
    InsufficientFunds,
}

/// Geometric arrangement of a fish formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationShape {
    /// Members evenly spaced on a ring around the anchor.
    Circle,
    /// Members in a horizontal row centred on the anchor.
    Line,
    /// Members in two trailing wings.
    Vee,
}

/// Fish species ordered from least to most valuable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Small fish.
    Small,
    /// Medium fish.
    Medium,
    /// Large fish.
    Large,
    /// Goldfish.
    Gold,
    /// Shark; may burst its speed.
    Shark,
    /// Whale; may spawn small escorts.
    Whale,
}

impl Species {
    /// Number of species.
    pub const COUNT: usize = 6;

    /// Every species in ordinal order.
    pub const ALL: [Species; Self::COUNT] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Gold,
        Self::Shark,
        Self::Whale,
    ];

    /// Ordinal of the species within the species table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
            Self::Gold => 3,
            Self::Shark => 4,
            Self::Whale => 5,
        }
    }

    /// Resolves a species from its ordinal.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Unique identifier assigned to each fish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FishId(u32);

impl FishId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to each projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to each formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to each chain reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(u32);

impl ChainId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location on the playfield measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downward.
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f32 {
        math::distance(self, other)
    }

    /// Heading from this point toward another point, in radians.
    #[must_use]
    pub fn angle_to(self, other: Point) -> f32 {
        math::angle_between(self, other)
    }

    /// Point reached by travelling `length` units along `angle`.
    #[must_use]
    pub fn offset(self, angle: f32, length: f32) -> Point {
        Point::new(self.x + angle.cos() * length, self.y + angle.sin() * length)
    }

    /// Point reached by applying one frame of the provided velocity.
    #[must_use]
    pub fn translate(self, velocity: Velocity) -> Point {
        Point::new(self.x + velocity.dx, self.y + velocity.dy)
    }
}

/// Displacement applied per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal displacement per frame.
    pub dx: f32,
    /// Vertical displacement per frame.
    pub dy: f32,
}

impl Velocity {
    /// Velocity at rest.
    pub const ZERO: Velocity = Velocity::new(0.0, 0.0);

    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Velocity travelling `speed` units per frame along `angle`.
    #[must_use]
    pub fn from_polar(angle: f32, speed: f32) -> Self {
        Self::new(angle.cos() * speed, angle.sin() * speed)
    }

    /// Velocity that covers the gap between two points in one frame, scaled.
    #[must_use]
    pub fn toward(from: Point, to: Point, factor: f32) -> Self {
        Self::new((to.x - from.x) * factor, (to.y - from.y) * factor)
    }

    /// Magnitude of the velocity.
    #[must_use]
    pub fn speed(self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Velocity multiplied by a scalar.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }
}

/// Opaque color used for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Error raised when a color string is not of the form `#RRGGBB`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid color `{input}`, expected #RRGGBB")]
pub struct ColorParseError {
    input: String,
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorParseError {
            input: value.to_owned(),
        };
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}
