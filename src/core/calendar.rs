//! Campaign calendar
//!
//! One tick is one week. Four weeks make a month, three months make a
//! season phase, and four phases make a season (a campaign year).

use std::fmt;

use serde::{Deserialize, Serialize};

pub const WEEKS_PER_MONTH: u32 = 4;
pub const MONTHS_PER_PHASE: u32 = 3;

/// The four-phase cycle of a campaign season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonPhase {
    SpringThaw,
    SummerCampaign,
    AutumnHarvest,
    WintersEnd,
}

impl SeasonPhase {
    /// Next phase in the cycle, with `true` when the cycle wrapped around
    pub fn next(self) -> (SeasonPhase, bool) {
        match self {
            SeasonPhase::SpringThaw => (SeasonPhase::SummerCampaign, false),
            SeasonPhase::SummerCampaign => (SeasonPhase::AutumnHarvest, false),
            SeasonPhase::AutumnHarvest => (SeasonPhase::WintersEnd, false),
            SeasonPhase::WintersEnd => (SeasonPhase::SpringThaw, true),
        }
    }
}

impl fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeasonPhase::SpringThaw => "Spring Thaw",
            SeasonPhase::SummerCampaign => "Summer Campaign",
            SeasonPhase::AutumnHarvest => "Autumn Harvest",
            SeasonPhase::WintersEnd => "Winter's End",
        };
        f.write_str(name)
    }
}

/// A point in campaign time, used to stamp events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameDate {
    pub season: u32,
    pub phase: SeasonPhase,
    pub month: u32,
    pub week: u32,
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {}, {}, month {}, week {}",
            self.season, self.phase, self.month, self.week
        )
    }
}

/// What changed when the calendar advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarAdvance {
    pub month_rolled: bool,
    pub phase_changed: bool,
    pub season_rolled: bool,
}

/// Calendar tracks campaign time with week granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    current_season: u32,
    season_phase: SeasonPhase,
    month: u32,
    week: u32,
    weeks_elapsed: u64,
}

impl Calendar {
    pub fn new() -> Self {
        Self {
            current_season: 1,
            season_phase: SeasonPhase::SpringThaw,
            month: 1,
            week: 1,
            weeks_elapsed: 0,
        }
    }

    pub fn advance(&mut self) -> CalendarAdvance {
        self.weeks_elapsed += 1;
        let mut change = CalendarAdvance {
            month_rolled: false,
            phase_changed: false,
            season_rolled: false,
        };

        self.week += 1;
        if self.week > WEEKS_PER_MONTH {
            self.week = 1;
            self.month += 1;
            change.month_rolled = true;
        }

        if self.month > MONTHS_PER_PHASE {
            self.month = 1;
            let (phase, wrapped) = self.season_phase.next();
            self.season_phase = phase;
            change.phase_changed = true;
            if wrapped {
                self.current_season += 1;
                change.season_rolled = true;
            }
        }

        change
    }

    pub fn current_season(&self) -> u32 {
        self.current_season
    }

    pub fn season_phase(&self) -> SeasonPhase {
        self.season_phase
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn weeks_elapsed(&self) -> u64 {
        self.weeks_elapsed
    }

    pub fn date(&self) -> GameDate {
        GameDate {
            season: self.current_season,
            phase: self.season_phase,
            month: self.month,
            week: self.week,
        }
    }

    /// Structural sanity check used when restoring a snapshot
    pub fn is_valid(&self) -> bool {
        self.current_season >= 1
            && (1..=MONTHS_PER_PHASE).contains(&self.month)
            && (1..=WEEKS_PER_MONTH).contains(&self.week)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}
