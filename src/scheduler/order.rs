//! Division processing order.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::DivisionCode;

/// Returns the divisions in a uniformly random order.
///
/// # Errors
/// `DivisionOrder` if the list is empty or holds the same code twice.
pub fn randomize_division_order<R: Rng + ?Sized>(
    mut divisions: Vec<DivisionCode>,
    rng: &mut R,
) -> ScheduleResult<Vec<DivisionCode>> {
    if divisions.is_empty() {
        return Err(ScheduleError::DivisionOrder("no divisions to order".into()));
    }

    let mut seen = BTreeSet::new();
    for code in &divisions {
        if !seen.insert(code.as_str()) {
            return Err(ScheduleError::DivisionOrder(format!(
                "duplicate division code: {code}"
            )));
        }
    }

    divisions.shuffle(rng);
    Ok(divisions)
}
