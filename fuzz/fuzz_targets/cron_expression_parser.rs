#![no_main]

use job_executor::utils::{next_occurrence, parse_cron_schedule};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let expression = String::from_utf8_lossy(data);
    if let Ok(schedule) = parse_cron_schedule(&expression) {
        let now = chrono::Utc::now();
        if let Some(next) = next_occurrence(&schedule, &now) {
            assert!(next > now);
        }
    }
});
