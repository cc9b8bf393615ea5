use job_executor::{
	models::Trigger,
	services::trigger::TriggerEngine,
	utils::tests::RecordingLauncher,
};
use std::{fs, path::Path, sync::Arc, time::Duration};
use tempfile::tempdir;

async fn wait_for_calls(launcher: &RecordingLauncher, count: usize) {
	for _ in 0..60 {
		if launcher.calls().len() >= count {
			return;
		}
		tokio::time::sleep(Duration::from_millis(50)).await;
	}
}

async fn armed_engine(root: &Path) -> (TriggerEngine, Arc<RecordingLauncher>) {
	let launcher = Arc::new(RecordingLauncher::default());
	let engine = TriggerEngine::new(launcher.clone());
	let report = engine
		.reload(vec![Trigger::file_watch("a.ps1", root.to_str().unwrap())])
		.await;
	assert_eq!(report.armed, 1);
	(engine, launcher)
}

#[tokio::test]
async fn test_modifications_within_window_launch_once() {
	let dir = tempdir().unwrap();
	let root = dir.path().canonicalize().unwrap();
	let file = root.join("x.txt");
	fs::write(&file, "0").unwrap();
	let (engine, launcher) = armed_engine(&root).await;

	fs::write(&file, "1").unwrap();
	tokio::time::sleep(Duration::from_millis(300)).await;
	fs::write(&file, "2").unwrap();
	tokio::time::sleep(Duration::from_millis(400)).await;
	engine.shutdown().await;

	let calls = launcher.calls();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].0, "a.ps1");
	assert_eq!(
		calls[0].1,
		vec![
			"Changed".to_string(),
			"x.txt".to_string(),
			file.display().to_string()
		]
	);
}

#[tokio::test]
async fn test_modifications_past_window_launch_twice() {
	let dir = tempdir().unwrap();
	let root = dir.path().canonicalize().unwrap();
	let file = root.join("x.txt");
	fs::write(&file, "0").unwrap();
	let (engine, launcher) = armed_engine(&root).await;

	fs::write(&file, "1").unwrap();
	tokio::time::sleep(Duration::from_millis(1200)).await;
	fs::write(&file, "2").unwrap();
	wait_for_calls(&launcher, 2).await;
	engine.shutdown().await;

	assert_eq!(launcher.calls().len(), 2);
}

#[tokio::test]
async fn test_nested_file_reports_relative_name() {
	let dir = tempdir().unwrap();
	let root = dir.path().canonicalize().unwrap();
	fs::create_dir(root.join("sub")).unwrap();
	let (engine, launcher) = armed_engine(&root).await;

	let file = root.join("sub").join("y.txt");
	fs::write(&file, "new").unwrap();
	wait_for_calls(&launcher, 1).await;
	engine.shutdown().await;

	let calls = launcher.calls();
	assert!(!calls.is_empty());
	assert_eq!(calls[0].1[0], "Created");
	assert_eq!(calls[0].1[1], Path::new("sub").join("y.txt").display().to_string());
	assert_eq!(calls[0].1[2], file.display().to_string());
}

#[tokio::test]
async fn test_deleted_file_is_reported() {
	let dir = tempdir().unwrap();
	let root = dir.path().canonicalize().unwrap();
	let file = root.join("gone.txt");
	fs::write(&file, "bye").unwrap();
	let (engine, launcher) = armed_engine(&root).await;

	fs::remove_file(&file).unwrap();
	wait_for_calls(&launcher, 1).await;
	engine.shutdown().await;

	let calls = launcher.calls();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].1[0], "Deleted");
}
