//! Buffer Size Constants
//!
//! Fixed capacities for the heapless collections used per cycle. Sized so a
//! worst-case cycle never truncates with the built-in rule tables.

/// Maximum points in one calibration table.
///
/// Temperature, moisture and NPK allow multi-point tables; EC and pH are
/// limited further (see [`sensors`](super::sensors)).
pub const MAX_CALIBRATION_POINTS: usize = 16;

/// Maximum guidance lines per list (interactions or crop recommendations).
///
/// Worst case for crop guidance: 1 capability warning + 11 deviation rules +
/// the longest crop rule list (5) + 3 soil rules.
pub const MAX_GUIDANCE_LINES: usize = 32;

/// Maximum alerts per bundle.
///
/// 7 range alerts + 7 incompatibility alerts + 4 configuration alerts.
pub const MAX_ALERTS: usize = 24;
