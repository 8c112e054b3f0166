//! Benchmark fixtures - generated at runtime with synthetic unknown owners.
//!
//! Fixtures are generated lazily on first access and cached for the
//! duration of the benchmark run. All generation is deterministic.

use codeowners_annotate_core::generate::{Fixture, GeneratorConfig, generate};
use std::sync::LazyLock;

// Lazily generated fixtures (deterministic via default seed)
static SMALL: LazyLock<Fixture> = LazyLock::new(|| generate(&GeneratorConfig::small()));
static MEDIUM: LazyLock<Fixture> = LazyLock::new(|| generate(&GeneratorConfig::medium()));
static LARGE: LazyLock<Fixture> = LazyLock::new(|| generate(&GeneratorConfig::large()));
static MAX_SIZE: LazyLock<Fixture> =
    LazyLock::new(|| generate(&GeneratorConfig::target_bytes(3_000_000)));

/// Standard fixtures for regular benchmarks.
pub fn fixtures() -> &'static [(&'static str, &'static Fixture)] {
    static FIXTURES: LazyLock<Vec<(&'static str, &'static Fixture)>> = LazyLock::new(|| {
        vec![
            ("small", &*SMALL),
            ("medium", &*MEDIUM),
            ("large", &*LARGE),
        ]
    });
    FIXTURES.as_slice()
}

/// Extended fixtures including a stress test at GitHub's 3MB limit.
pub fn fixtures_extended() -> &'static [(&'static str, &'static Fixture)] {
    static FIXTURES: LazyLock<Vec<(&'static str, &'static Fixture)>> = LazyLock::new(|| {
        vec![
            ("small", &*SMALL),
            ("medium", &*MEDIUM),
            ("large", &*LARGE),
            ("max_size", &*MAX_SIZE),
        ]
    });
    FIXTURES.as_slice()
}
