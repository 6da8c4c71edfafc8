//! Kingdom scoring.
//!
//! The base score of a kingdom is the sum, over its regions, of region size
//! times the crowns inside the region. Two bonuses from the published rules
//! can be switched on through `ScoringRules`.

use crate::kingdom::{Kingdom, Region};
use serde::{Deserialize, Serialize};

/// Bonus for a completely filled kingdom
pub const HARMONY_BONUS: u32 = 5;

/// Bonus for a castle in the exact middle of the occupied area
pub const MIDDLE_KINGDOM_BONUS: u32 = 10;

/// Which optional bonuses count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Award `HARMONY_BONUS` for a full `size x size` kingdom
    pub harmony: bool,
    /// Award `MIDDLE_KINGDOM_BONUS` when the castle is centered in the
    /// occupied area
    pub middle_kingdom: bool,
}

impl ScoringRules {
    /// Regions only
    pub const BASE: ScoringRules = ScoringRules {
        harmony: false,
        middle_kingdom: false,
    };

    /// Regions plus both bonuses
    pub const WITH_BONUSES: ScoringRules = ScoringRules {
        harmony: true,
        middle_kingdom: true,
    };
}

/// A kingdom's score split by source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub regions: u32,
    pub harmony: u32,
    pub middle_kingdom: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.regions + self.harmony + self.middle_kingdom
    }
}

/// Score a kingdom under the given rules
pub fn score_kingdom(kingdom: &Kingdom, rules: &ScoringRules) -> ScoreBreakdown {
    let regions = kingdom.connected_regions().iter().map(Region::score).sum();

    let harmony = if rules.harmony && is_harmonious(kingdom) {
        HARMONY_BONUS
    } else {
        0
    };
    let middle_kingdom = if rules.middle_kingdom && is_middle_kingdom(kingdom) {
        MIDDLE_KINGDOM_BONUS
    } else {
        0
    };

    ScoreBreakdown {
        regions,
        harmony,
        middle_kingdom,
    }
}

/// Whether the occupied area spans exactly `size x size` cells
fn spans_full_square(kingdom: &Kingdom) -> bool {
    let (min, max) = kingdom.bounding_box();
    let side = kingdom.size() as i32;
    max.x - min.x + 1 == side && max.y - min.y + 1 == side
}

/// Whether the kingdom is a full `size x size` square with no gaps
pub fn is_harmonious(kingdom: &Kingdom) -> bool {
    let side = kingdom.size() as usize;
    spans_full_square(kingdom) && kingdom.len() == side * side
}

/// Whether the castle sits in the exact middle of the occupied area.
/// A kingdom holding only its castle does not count.
pub fn is_middle_kingdom(kingdom: &Kingdom) -> bool {
    let (min, max) = kingdom.bounding_box();
    !kingdom.is_empty() && min.x == -max.x && min.y == -max.y
}
