use crate::properties::strategies::trigger_strategy;

use job_executor::models::{Trigger, TriggerConfigFile, TriggerTypeConfig};
use proptest::{prelude::*, test_runner::Config};
use serde_json::json;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_unrecognized_kind_parses_as_unknown(
		script in "[a-z]{1,8}\\.ps1",
		kind in "[A-Z][a-z]{2,10}",
	) {
		prop_assume!(kind != "Cron" && kind != "FileWatch");

		let trigger: Trigger = serde_json::from_value(json!({
			"script_path": script.clone(),
			"kind": kind,
		})).unwrap();

		prop_assert_eq!(trigger.script_path, script);
		prop_assert_eq!(trigger.config, TriggerTypeConfig::Unknown);
	}

	#[test]
	fn test_malformed_entries_do_not_hide_siblings(
		triggers in prop::collection::vec(trigger_strategy(), 0..8),
		malformed_at in prop::collection::vec(0usize..8, 0..4),
	) {
		let mut entries: Vec<serde_json::Value> = triggers
			.iter()
			.map(|t| serde_json::to_value(t).unwrap())
			.collect();
		for position in malformed_at.iter().rev() {
			let index = (*position).min(entries.len());
			entries.insert(index, json!({"kind": "Cron"}));
		}

		let (parsed, rejected) = TriggerConfigFile { triggers: entries }.into_triggers();

		prop_assert_eq!(parsed, triggers);
		prop_assert_eq!(rejected.len(), malformed_at.len());
	}
}
