use crate::integration::mocks::{MockScriptLauncher, MockTriggerRepository};

use job_executor::{
	bootstrap::{create_engine, reload_from_repository, run_reload_loop},
	models::Trigger,
	repositories::RepositoryError,
	utils::tests::TriggerBuilder,
};
use std::{
	path::PathBuf,
	sync::{Arc, Mutex},
	time::Duration,
};
use tokio::sync::{mpsc, watch};

// Expectations on the static `new` are global to the mock type.
static REPOSITORY_CONTEXT: Mutex<()> = Mutex::new(());

fn idle_engine() -> Arc<job_executor::services::trigger::TriggerEngine> {
	let mut launcher = MockScriptLauncher::new();
	launcher.expect_launch().never();
	create_engine(Arc::new(launcher))
}

fn far_future_triggers() -> Vec<Trigger> {
	vec![
		TriggerBuilder::new().cron("0 0 0 1 1 * 2099").build(),
		TriggerBuilder::new().script_path("b.ps1").unknown().build(),
	]
}

#[tokio::test]
async fn test_reload_from_repository_arms_loaded_triggers() {
	let _guard = REPOSITORY_CONTEXT.lock().unwrap_or_else(|e| e.into_inner());
	let ctx = MockTriggerRepository::new_context();
	ctx.expect().returning(|_| {
		let mut repository = MockTriggerRepository::default();
		repository
			.expect_get_all()
			.returning(far_future_triggers);
		Ok(repository)
	});

	let engine = idle_engine();
	let report = reload_from_repository::<MockTriggerRepository>(
		&engine,
		&PathBuf::from("triggers.json"),
	)
	.await
	.unwrap();

	assert_eq!(report.armed, 1);
	assert_eq!(report.errors.len(), 1);
	assert_eq!(report.errors[0].script_path, "b.ps1");
	engine.shutdown().await;
}

#[tokio::test]
async fn test_reload_loop_keeps_previous_triggers_when_load_fails() {
	let _guard = REPOSITORY_CONTEXT.lock().unwrap_or_else(|e| e.into_inner());
	let ctx = MockTriggerRepository::new_context();
	ctx.expect()
		.returning(|_| Err(RepositoryError::load_error("disk gone", None, None)));

	let engine = idle_engine();
	engine.reload(far_future_triggers()).await;
	assert_eq!(engine.active_count().await, 1);

	let (reload_tx, reload_rx) = mpsc::channel(1);
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let task = tokio::spawn(run_reload_loop::<MockTriggerRepository>(
		engine.clone(),
		PathBuf::from("triggers.json"),
		reload_rx,
		shutdown_rx,
	));

	reload_tx.send(()).await.unwrap();
	tokio::time::sleep(Duration::from_millis(100)).await;
	assert_eq!(engine.active_count().await, 1);

	shutdown_tx.send(true).unwrap();
	tokio::time::timeout(Duration::from_secs(1), task)
		.await
		.unwrap()
		.unwrap();
	engine.shutdown().await;
}

#[tokio::test]
async fn test_reload_loop_ends_when_signals_stop() {
	let engine = idle_engine();
	let (reload_tx, reload_rx) = mpsc::channel::<()>(1);
	let (_shutdown_tx, shutdown_rx) = watch::channel(false);

	drop(reload_tx);
	tokio::time::timeout(
		Duration::from_secs(1),
		run_reload_loop::<MockTriggerRepository>(
			engine,
			PathBuf::from("triggers.json"),
			reload_rx,
			shutdown_rx,
		),
	)
	.await
	.unwrap();
}
