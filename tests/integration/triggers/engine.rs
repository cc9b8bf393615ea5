use crate::integration::mocks::MockScriptLauncher;

use job_executor::{
	models::Trigger,
	services::trigger::{TriggerEngine, TriggerError},
	utils::tests::{RecordingLauncher, TriggerBuilder},
};
use std::{fs, sync::Arc, time::Duration};
use tempfile::tempdir;

#[tokio::test]
async fn test_unknown_kind_is_rejected_and_siblings_are_armed() {
	let mut launcher = MockScriptLauncher::new();
	launcher.expect_launch().never();

	let engine = TriggerEngine::new(Arc::new(launcher));
	let dir = tempdir().unwrap();

	let report = engine
		.reload(vec![
			TriggerBuilder::new().script_path("x.ps1").unknown().build(),
			TriggerBuilder::new().cron("0 0 0 1 1 * 2099").build(),
			Trigger::file_watch("b.sh", dir.path().to_str().unwrap()),
		])
		.await;

	assert_eq!(report.armed, 2);
	assert_eq!(report.errors.len(), 1);
	assert_eq!(report.errors[0].index, 0);
	assert_eq!(report.errors[0].script_path, "x.ps1");
	assert!(matches!(
		report.errors[0].error,
		TriggerError::ConfigurationError(_)
	));

	engine.shutdown().await;
}

#[tokio::test]
async fn test_missing_watched_directory_does_not_stop_the_engine() {
	let launcher = Arc::new(RecordingLauncher::default());
	let engine = TriggerEngine::new(launcher.clone());

	let report = engine
		.reload(vec![
			Trigger::file_watch("a.ps1", "/does/not/exist"),
			TriggerBuilder::new().cron("* * * * * *").build(),
		])
		.await;

	assert_eq!(report.armed, 1);
	assert_eq!(report.errors[0].index, 0);

	tokio::time::sleep(Duration::from_millis(1500)).await;
	engine.shutdown().await;

	assert!(!launcher.calls().is_empty());
}

#[tokio::test]
async fn test_cron_launch_goes_through_launcher_with_no_arguments() {
	let mut launcher = MockScriptLauncher::new();
	launcher
		.expect_launch()
		.withf(|script_path, args| script_path == "a.ps1" && args.is_empty())
		.times(1..)
		.returning(|_, _| Ok(()));

	let engine = TriggerEngine::new(Arc::new(launcher));
	engine
		.reload(vec![Trigger::cron("a.ps1", "* * * * * *")])
		.await;

	tokio::time::sleep(Duration::from_millis(1500)).await;
	engine.shutdown().await;
}

#[tokio::test]
async fn test_reload_with_same_list_twice_fires_once_per_event() {
	let dir = tempdir().unwrap();
	let root = dir.path().canonicalize().unwrap();
	let file = root.join("x.txt");
	fs::write(&file, "initial").unwrap();

	let launcher = Arc::new(RecordingLauncher::default());
	let engine = TriggerEngine::new(launcher.clone());
	let triggers = vec![Trigger::file_watch("a.ps1", root.to_str().unwrap())];

	engine.reload(triggers.clone()).await;
	engine.reload(triggers).await;
	assert_eq!(engine.active_count().await, 1);

	fs::write(&file, "changed").unwrap();
	tokio::time::sleep(Duration::from_millis(700)).await;
	engine.shutdown().await;

	let calls = launcher.calls();
	assert_eq!(calls.len(), 1);
	assert_eq!(
		calls[0].1,
		vec![
			"Changed".to_string(),
			"x.txt".to_string(),
			file.display().to_string()
		]
	);
}
