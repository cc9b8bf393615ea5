use job_executor::services::launcher::{ProcessScriptLauncher, ScriptError, ScriptLauncher};
use std::{fs, path::Path, time::Duration};
use tempfile::tempdir;

async fn read_when_written(path: &Path) -> String {
	for _ in 0..100 {
		if let Ok(content) = fs::read_to_string(path) {
			if !content.is_empty() {
				return content;
			}
		}
		tokio::time::sleep(Duration::from_millis(50)).await;
	}
	String::new()
}

#[cfg(unix)]
#[tokio::test]
async fn test_shell_script_gets_positional_arguments() {
	let dir = tempdir().unwrap();
	let out = dir.path().join("args.txt");
	let script = dir.path().join("record.sh");
	fs::write(
		&script,
		format!("echo \"$#:$1:$2:$3\" > '{}'\n", out.display()),
	)
	.unwrap();

	let args = vec![
		"Created".to_string(),
		"report; rm -rf x".to_string(),
		"/watch/report; rm -rf x".to_string(),
	];
	ProcessScriptLauncher::new()
		.launch(script.to_str().unwrap(), &args)
		.unwrap();

	assert_eq!(
		read_when_written(&out).await.trim_end(),
		"3:Created:report; rm -rf x:/watch/report; rm -rf x"
	);
}

#[cfg(unix)]
#[tokio::test]
async fn test_launch_returns_before_script_finishes() {
	let dir = tempdir().unwrap();
	let out = dir.path().join("done.txt");
	let script = dir.path().join("slow.sh");
	fs::write(&script, format!("sleep 1\necho done > '{}'\n", out.display())).unwrap();

	ProcessScriptLauncher::new()
		.launch(script.to_str().unwrap(), &[])
		.unwrap();

	assert!(!out.exists());
	assert_eq!(read_when_written(&out).await.trim_end(), "done");
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_script_is_not_a_launch_error() {
	let dir = tempdir().unwrap();
	let script = dir.path().join("fail.sh");
	fs::write(&script, "exit 3\n").unwrap();

	let result = ProcessScriptLauncher::new().launch(script.to_str().unwrap(), &[]);
	assert!(result.is_ok());
}

#[tokio::test]
async fn test_launch_errors() {
	let dir = tempdir().unwrap();
	let launcher = ProcessScriptLauncher::new();

	let missing = dir.path().join("missing.ps1");
	assert!(matches!(
		launcher.launch(missing.to_str().unwrap(), &[]),
		Err(ScriptError::NotFound(_))
	));

	let unsupported = dir.path().join("job.cmd");
	fs::write(&unsupported, "echo").unwrap();
	assert!(matches!(
		launcher.launch(unsupported.to_str().unwrap(), &[]),
		Err(ScriptError::UnsupportedKind(_))
	));
}
