use job_executor::{
	services::trigger::{next_fire, CronTriggerHandler},
	utils::{parse_cron_schedule, tests::RecordingLauncher},
};
use chrono::{TimeZone, Utc};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

#[test]
fn test_every_five_seconds_scenario() {
	let schedule = parse_cron_schedule("*/5 * * * * *").unwrap();
	let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

	let (first, delay) = next_fire(&schedule, &start, None).unwrap();
	assert_eq!(first, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 5).unwrap());
	assert_eq!(delay, Duration::from_secs(5));

	let (second, delay) = next_fire(&schedule, &first, Some(&first)).unwrap();
	assert_eq!(second, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 10).unwrap());
	assert_eq!(delay, Duration::from_secs(5));
}

#[test]
fn test_five_field_expression_fires_at_second_zero() {
	let schedule = parse_cron_schedule("*/15 * * * *").unwrap();
	let start = Utc.with_ymd_and_hms(2026, 1, 1, 10, 7, 30).unwrap();

	let (next, _) = next_fire(&schedule, &start, None).unwrap();
	assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 1, 10, 15, 0).unwrap());
}

#[tokio::test]
async fn test_handler_keeps_firing_until_shutdown() {
	let launcher = Arc::new(RecordingLauncher::default());
	let handler = CronTriggerHandler::new("a.ps1", "* * * * * *", launcher.clone()).unwrap();
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let handle = tokio::spawn(handler.run(shutdown_rx));

	tokio::time::sleep(Duration::from_millis(3200)).await;
	shutdown_tx.send(true).unwrap();
	handle.await.unwrap();
	let fired = launcher.calls().len();

	tokio::time::sleep(Duration::from_millis(1200)).await;
	assert_eq!(launcher.calls().len(), fired);
	assert!((2..=4).contains(&fired), "fired {fired} times");
}
