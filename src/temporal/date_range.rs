use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::temporal::Frequency;

/// Generate `periods` timestamps at `freq`
///
/// The first timestamp is `start` when it already sits on the frequency's
/// anchor, otherwise the next anchored timestamp after it.
pub fn date_range(start: NaiveDateTime, periods: usize, freq: Frequency) -> Result<Vec<NaiveDateTime>> {
    let mut dates = Vec::with_capacity(periods);
    if periods == 0 {
        return Ok(dates);
    }

    let mut current = if freq.is_on_anchor(&start) {
        start
    } else {
        freq.next_after(&start)?
    };
    dates.push(current);

    while dates.len() < periods {
        current = freq.next_after(&current)?;
        dates.push(current);
    }

    Ok(dates)
}

/// `periods` timestamps strictly after `last`, stepping at `freq`
pub fn extend_after(last: NaiveDateTime, periods: usize, freq: Frequency) -> Result<Vec<NaiveDateTime>> {
    let mut dates = Vec::with_capacity(periods);
    let mut current = last;
    for _ in 0..periods {
        current = freq.next_after(&current)?;
        dates.push(current);
    }
    Ok(dates)
}

/// Median spacing between consecutive timestamps, in seconds
///
/// Fails when fewer than two timestamps are given.
pub fn infer_spacing(values: &[NaiveDateTime]) -> Result<i64> {
    if values.len() < 2 {
        return Err(Error::InsufficientData {
            needed: 2,
            got: values.len(),
        });
    }

    let mut gaps: Vec<i64> = values
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .collect();
    gaps.sort_unstable();
    Ok(gaps[gaps.len() / 2])
}
