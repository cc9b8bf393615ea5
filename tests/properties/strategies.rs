use job_executor::models::Trigger;
use proptest::prelude::*;

/// Six-field cron expressions built from steps, lists and wildcards.
pub fn cron_expression_strategy() -> impl Strategy<Value = String> {
	let seconds = prop_oneof![
		Just("*".to_string()),
		(1u32..30).prop_map(|step| format!("*/{}", step)),
		(0u32..60).prop_map(|s| s.to_string()),
		(0u32..30, 30u32..60).prop_map(|(a, b)| format!("{},{}", a, b)),
	];
	let minutes = prop_oneof![
		Just("*".to_string()),
		(1u32..30).prop_map(|step| format!("*/{}", step)),
		(0u32..60).prop_map(|m| m.to_string()),
	];
	let hours = prop_oneof![
		Just("*".to_string()),
		(0u32..24).prop_map(|h| h.to_string()),
		(0u32..12, 12u32..24).prop_map(|(a, b)| format!("{}-{}", a, b)),
	];

	(seconds, minutes, hours).prop_map(|(s, m, h)| format!("{} {} {} * * *", s, m, h))
}

/// Millisecond offsets of successive filesystem events for one path.
pub fn event_offsets_strategy() -> impl Strategy<Value = Vec<u64>> {
	prop::collection::vec(0u64..2_500, 1..20).prop_map(|mut gaps| {
		let mut elapsed = 0;
		for gap in gaps.iter_mut() {
			elapsed += *gap;
			*gap = elapsed;
		}
		gaps
	})
}

pub fn trigger_strategy() -> impl Strategy<Value = Trigger> {
	let script = "[a-z]{1,8}\\.(ps1|sh|py|js)";
	prop_oneof![
		(script, cron_expression_strategy()).prop_map(|(s, c)| Trigger::cron(s, c)),
		(script, "/[a-z]{1,8}(/[a-z]{1,8}){0,2}").prop_map(|(s, p)| Trigger::file_watch(s, p)),
	]
}
