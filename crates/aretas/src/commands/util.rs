//! Shared helpers for command handlers.

use aretas_core::models::now_millis;

use crate::cli::TimeRangeArgs;
use crate::error::CliError;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Unwrap an API result that is absent when the server answered with a
/// non-success status.
pub fn require<T>(value: Option<T>, resource: &str) -> Result<T, CliError> {
    value.ok_or_else(|| CliError::Unavailable {
        resource: resource.into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Resolve `--begin/--end/--hours` into an epoch-millisecond window.
pub fn time_window(range: &TimeRangeArgs) -> Result<(i64, i64), CliError> {
    window_at(range, now_millis())
}

fn window_at(range: &TimeRangeArgs, now_ms: i64) -> Result<(i64, i64), CliError> {
    let end = range.end.unwrap_or(now_ms);
    let begin = range
        .begin
        .unwrap_or_else(|| end - i64::from(range.hours) * HOUR_MS);
    if begin >= end {
        return Err(CliError::Validation {
            field: "begin".into(),
            reason: format!("window start {begin} is not before its end {end}"),
        });
    }
    Ok((begin, end))
}

/// Join a list for a table cell.
pub fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn range(begin: Option<i64>, end: Option<i64>, hours: u32) -> TimeRangeArgs {
        TimeRangeArgs { begin, end, hours }
    }

    #[test]
    fn window_defaults_to_trailing_hours() {
        let (begin, end) = window_at(&range(None, None, 2), 10 * HOUR_MS).unwrap();
        assert_eq!((begin, end), (8 * HOUR_MS, 10 * HOUR_MS));
    }

    #[test]
    fn explicit_bounds_win() {
        assert_eq!(window_at(&range(Some(5), Some(9), 24), 0).unwrap(), (5, 9));
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(matches!(
            window_at(&range(Some(9), Some(5), 24), 0),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn unavailable_names_the_resource() {
        let err = require::<u8>(None, "alert list").unwrap_err();
        assert_eq!(err.to_string(), "The API returned no data for alert list");
    }
}
