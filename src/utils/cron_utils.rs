//! Utility functions for working with cron schedules
//!
//! Schedules are evaluated with seconds resolution. Classic five-field
//! expressions are accepted and fire at second zero. Day-of-week numbers use
//! the classic numbering (0 or 7 is Sunday, 1 is Monday) and are rewritten to
//! the numbering of the `cron` crate (1 is Sunday, 7 is Saturday).

use chrono::{DateTime, TimeZone};
use cron::Schedule;
use std::{collections::BTreeSet, str::FromStr};

/// Position of the day-of-week field once the seconds field is present
const DAY_OF_WEEK_FIELD: usize = 5;

/// Rewrites an expression into the form the `cron` crate parses.
///
/// A five-field expression gets a leading seconds field of `0`. Numeric
/// day-of-week values are translated from classic numbering; names such as
/// `MON-FRI` are left alone.
pub fn normalize_cron_expression(expression: &str) -> String {
	let mut fields: Vec<String> = expression.split_whitespace().map(str::to_string).collect();
	if fields.len() == 5 {
		fields.insert(0, "0".to_string());
	}
	if !(6..=7).contains(&fields.len()) {
		return expression.trim().to_string();
	}

	fields[DAY_OF_WEEK_FIELD] = translate_day_of_week(&fields[DAY_OF_WEEK_FIELD]);
	fields.join(" ")
}

fn translate_day_of_week(field: &str) -> String {
	field
		.split(',')
		.map(translate_day_of_week_item)
		.collect::<Vec<_>>()
		.join(",")
}

/// Expands one list item (`n`, `a-b`, `*/s`, `a-b/s`, `n/s`) into crate day numbers.
///
/// Items the crate should judge on its own (names, `*`, `?`, out-of-range
/// values) are returned unchanged.
fn translate_day_of_week_item(item: &str) -> String {
	if item == "*" || item == "?" || item.chars().any(|c| c.is_ascii_alphabetic()) {
		return item.to_string();
	}

	let (range, step) = match item.split_once('/') {
		Some((range, step)) => match step.parse::<u32>() {
			Ok(step) if step > 0 => (range, Some(step)),
			_ => return item.to_string(),
		},
		None => (item, None),
	};

	let bounds = match range {
		"*" => Some((0, 6)),
		_ => match range.split_once('-') {
			Some((start, end)) => start.parse().ok().zip(end.parse().ok()),
			None => range
				.parse()
				.ok()
				.map(|start| (start, if step.is_some() { 6 } else { start })),
		},
	};

	let Some((start, end)) = bounds.filter(|&(start, end): &(u32, u32)| start <= end && end <= 7)
	else {
		return item.to_string();
	};

	let days: BTreeSet<u32> = (start..=end)
		.step_by(step.unwrap_or(1) as usize)
		.map(|day| day % 7 + 1)
		.collect();

	days.iter()
		.map(u32::to_string)
		.collect::<Vec<_>>()
		.join(",")
}

/// Parses a cron expression into a schedule.
///
/// # Errors
/// Returns the parser error when the expression is not a valid schedule.
pub fn parse_cron_schedule(expression: &str) -> Result<Schedule, cron::error::Error> {
	Schedule::from_str(&normalize_cron_expression(expression))
}

/// Returns the first occurrence of `schedule` strictly after `after`.
///
/// `None` means the schedule has no future occurrence (e.g. a past year).
pub fn next_occurrence<Tz: TimeZone>(schedule: &Schedule, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
	schedule.after(after).next()
}
