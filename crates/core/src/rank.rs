//! Ranks derived from cumulative XP.

use serde::{Deserialize, Serialize};

/// XP at which a learner becomes an Engineer.
pub const ENGINEER_XP: u32 = 50;

/// XP at which a learner becomes a Flight Director.
pub const FLIGHT_DIRECTOR_XP: u32 = 150;

/// Learner rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    /// Entry level
    #[default]
    Cadet,
    /// Intermediate level
    Engineer,
    /// Highest rank
    #[serde(rename = "Flight Director")]
    FlightDirector,
}

impl Rank {
    /// Rank for a total XP value.
    pub fn from_xp(xp: u32) -> Self {
        if xp >= FLIGHT_DIRECTOR_XP {
            Rank::FlightDirector
        } else if xp >= ENGINEER_XP {
            Rank::Engineer
        } else {
            Rank::Cadet
        }
    }

    /// Display title, identical to the stored string.
    pub fn title(&self) -> &'static str {
        match self {
            Rank::Cadet => "Cadet",
            Rank::Engineer => "Engineer",
            Rank::FlightDirector => "Flight Director",
        }
    }

    /// One-line description of the rank.
    pub fn subtitle(&self) -> &'static str {
        match self {
            Rank::Cadet => "Entry Level Agent",
            Rank::Engineer => "Intermediate Agent",
            Rank::FlightDirector => "Expert Level Agent",
        }
    }

    /// Badge icon.
    pub fn icon(&self) -> &'static str {
        match self {
            Rank::Cadet => "⭐",
            Rank::Engineer => "⚙️",
            Rank::FlightDirector => "🎖️",
        }
    }

    /// The rank after this one, if any.
    pub fn next(&self) -> Option<Rank> {
        match self {
            Rank::Cadet => Some(Rank::Engineer),
            Rank::Engineer => Some(Rank::FlightDirector),
            Rank::FlightDirector => None,
        }
    }

    /// XP needed to reach this rank.
    pub fn threshold(&self) -> u32 {
        match self {
            Rank::Cadet => 0,
            Rank::Engineer => ENGINEER_XP,
            Rank::FlightDirector => FLIGHT_DIRECTOR_XP,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Everything the dashboard shows about a rank at a given XP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankInfo {
    /// Current rank
    pub rank: Rank,

    /// Rank title
    pub title: &'static str,

    /// Rank subtitle
    pub subtitle: &'static str,

    /// Rank icon
    pub icon: &'static str,

    /// Next rank, `None` at the top
    pub next_rank: Option<Rank>,

    /// XP still missing for the next rank (0 at the top)
    pub xp_to_next: u32,

    /// Progress through the current band, in percent (0-100)
    pub progress: f64,
}

impl RankInfo {
    /// Compute rank information for an XP total.
    pub fn for_xp(xp: u32) -> Self {
        let rank = Rank::from_xp(xp);
        let next_rank = rank.next();

        // Progress is measured within the current band only.
        let (xp_to_next, progress) = match next_rank {
            Some(next) => {
                let floor = rank.threshold();
                let ceiling = next.threshold();
                let band = f64::from(ceiling - floor);
                (ceiling - xp, f64::from(xp - floor) / band * 100.0)
            }
            None => (0, 100.0),
        };

        Self {
            rank,
            title: rank.title(),
            subtitle: rank.subtitle(),
            icon: rank.icon(),
            next_rank,
            xp_to_next,
            progress,
        }
    }
}
