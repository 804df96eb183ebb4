//! The monthly net-income goal and its progress arithmetic.

use crate::model::Amount;
use tracing::warn;

/// The goal used when none has been stored, or the stored value is garbage.
pub const DEFAULT_GOAL: Amount = Amount::new(3_000_000);

/// Interprets the stored goal cell. Absent or unparsable values fall back to
/// [`DEFAULT_GOAL`] rather than failing.
pub fn parse_goal(stored: Option<String>) -> Amount {
    match stored {
        None => DEFAULT_GOAL,
        Some(s) => match s.trim().parse::<Amount>() {
            Ok(goal) => goal,
            Err(_) => {
                warn!("Stored goal '{s}' is unparsable, using the default");
                DEFAULT_GOAL
            }
        },
    }
}

/// Fraction of the goal reached by `month_net`, clamped to `[0, 1]`.
/// A non-positive goal yields zero progress rather than dividing by it.
pub fn progress(month_net: Amount, goal: Amount) -> f64 {
    if goal.value() <= 0 {
        return 0.0;
    }
    (month_net.value() as f64 / goal.value() as f64).clamp(0.0, 1.0)
}
