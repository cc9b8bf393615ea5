#![no_main]

use job_executor::models::TriggerConfigFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(file) = serde_json::from_slice::<TriggerConfigFile>(data) {
        let entries = file.triggers.len();
        let (triggers, rejected) = file.into_triggers();
        assert_eq!(triggers.len() + rejected.len(), entries);
    }
});
