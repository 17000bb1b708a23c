#![no_main]

use libfuzzer_sys::fuzz_target;
use rl_compare::comparison::compare;
use rl_compare::metric::ComparisonMetric;
use rl_compare::sample_source::{InMemorySource, SampleFile, SampleSource};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and comparing arbitrary sample files must never panic
        if let Ok(file) = SampleFile::from_json(input) {
            let source = InMemorySource::new(file.algorithms);
            if let Ok(groups) = source.sample_groups(ComparisonMetric::TotalReward) {
                let _ = compare(&groups);
            }
        }
    }
});
