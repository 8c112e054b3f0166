//! Random CODEOWNERS fixtures for benchmarking and testing.
//!
//! Each fixture pairs generated file content with the validation errors
//! GitHub would report if some of its owners didn't exist. Error positions
//! are computed while the lines are built, so they always point at an owner.

use crate::diagnostics::{ErrorRecord, ErrorSet};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Path recorded on generated errors.
pub const FIXTURE_PATH: &str = ".github/CODEOWNERS";

/// Configuration for generating fixtures.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of rule lines to generate.
    pub num_rules: usize,
    /// Number of comment lines to generate.
    pub num_comments: usize,
    /// Maximum owners per rule (1-4 typical).
    pub max_owners_per_rule: usize,
    /// Percentage of owners reported as unknown (0-100).
    pub unknown_percent: u32,
    /// Seed for deterministic generation.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_rules: 100,
            num_comments: 20,
            max_owners_per_rule: 4,
            unknown_percent: 10,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with specified rules and proportional comments.
    ///
    /// Comments are set to ~20% of rules (minimum 0).
    pub fn new(num_rules: usize) -> Self {
        Self {
            num_rules,
            num_comments: num_rules / 5,
            ..Default::default()
        }
    }

    /// Small fixture (~10 rules).
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Medium fixture (~100 rules).
    pub fn medium() -> Self {
        Self::new(100)
    }

    /// Large fixture (~1000 rules).
    pub fn large() -> Self {
        Self::new(1_000)
    }

    /// Generate a file targeting approximately the given byte size.
    /// GitHub's limit is 3MB (~3_000_000 bytes).
    pub fn target_bytes(bytes: usize) -> Self {
        // Average line is ~50 bytes
        Self::new(bytes.saturating_div(50).max(1))
    }

    /// Set the random seed for deterministic generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum owners per rule.
    pub fn with_max_owners(mut self, max: usize) -> Self {
        self.max_owners_per_rule = max.max(1);
        self
    }

    /// Set the percentage of unknown owners, capped at 100.
    pub fn with_unknown_percent(mut self, percent: u32) -> Self {
        self.unknown_percent = percent.min(100);
        self
    }
}

/// Generated CODEOWNERS content and the errors reported against it.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub content: String,
    pub errors: ErrorSet,
}

mod vocabulary {
    pub const PATTERN_TEMPLATES: &[&str] = &[
        "*.{ext}",
        "**/*.{ext}",
        "/{dir}/",
        "/{dir}/**",
        "/{dir}/*.{ext}",
        "/src/{dir}/",
        "/src/**/*.{ext}",
        "/{dir}/**/test_*.{ext}",
        "docs/**/*.md",
    ];

    pub const EXTENSIONS: &[&str] = &["rs", "py", "js", "ts", "go", "md", "yaml", "json", "toml"];
    pub const DIRECTORIES: &[&str] = &[
        "src", "lib", "tests", "docs", "config", "scripts", "api", "core",
    ];
    pub const USERNAMES: &[&str] = &["alice", "bob", "charlie", "dev", "maintainer", "reviewer"];
    pub const ORGS: &[&str] = &["acme", "github", "myorg"];
    pub const TEAMS: &[&str] = &["core", "platform", "frontend", "backend", "infra", "docs"];
    pub const SECTION_NAMES: &[&str] = &["Frontend", "Backend", "Infrastructure", "Documentation"];
}

/// Owner type distribution weights (must sum to 100).
const WEIGHT_USER: u32 = 50;
const WEIGHT_TEAM: u32 = 30;
// Remaining weight (20) goes to email

/// Probability of inserting a comment section header (percentage).
const COMMENT_PROBABILITY: u32 = 20;

/// Probability of a trailing comment on a rule (percentage).
const TRAILING_COMMENT_PROBABILITY: u32 = 10;

/// Generates CODEOWNERS content along with synthetic unknown-owner errors.
pub fn generate(config: &GeneratorConfig) -> Fixture {
    use vocabulary::*;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut lines: Vec<String> = Vec::with_capacity(config.num_rules + config.num_comments + 2);
    let mut errors = Vec::new();

    lines.push("# Auto-generated CODEOWNERS for benchmarking".to_string());
    lines.push(String::new());

    let mut rules_added = 0;
    let mut comments_added = 0;

    while rules_added < config.num_rules {
        if comments_added < config.num_comments
            && rules_added > 0
            && rng.random_ratio(COMMENT_PROBABILITY, 100)
        {
            let section = SECTION_NAMES[rng.random_range(0..SECTION_NAMES.len())];
            lines.push(String::new());
            lines.push(format!("# {} section", section));
            comments_added += 1;
        }

        let template = PATTERN_TEMPLATES[rng.random_range(0..PATTERN_TEMPLATES.len())];
        let ext = EXTENSIONS[rng.random_range(0..EXTENSIONS.len())];
        let dir = DIRECTORIES[rng.random_range(0..DIRECTORIES.len())];
        let mut line = template.replace("{ext}", ext).replace("{dir}", dir);

        // 1-based columns of the owners flagged as unknown
        let mut unknown_columns = Vec::new();
        let num_owners = rng.random_range(1..=config.max_owners_per_rule);
        for _ in 0..num_owners {
            line.push(' ');
            let column = line.len() + 1;
            line.push_str(&generate_owner(&mut rng));
            if rng.random_ratio(config.unknown_percent, 100) {
                unknown_columns.push(column);
            }
        }

        if rng.random_ratio(TRAILING_COMMENT_PROBABILITY, 100) {
            line.push_str(" # owned by ");
            line.push_str(dir);
        }

        let line_number = lines.len() + 1;
        for column in unknown_columns {
            errors.push(ErrorRecord::unknown_owner_at(
                FIXTURE_PATH,
                line_number as i64,
                column as i64,
                line.as_str(),
            ));
        }

        lines.push(line);
        rules_added += 1;
    }

    let mut content = lines.join("\n");
    content.push('\n');

    Fixture {
        content,
        errors: ErrorSet::new(errors),
    }
}

/// Generate a random owner based on weighted distribution.
fn generate_owner(rng: &mut StdRng) -> String {
    use vocabulary::*;

    let roll = rng.random_range(0..100);

    if roll < WEIGHT_USER {
        format!("@{}", USERNAMES[rng.random_range(0..USERNAMES.len())])
    } else if roll < WEIGHT_USER + WEIGHT_TEAM {
        format!(
            "@{}/{}",
            ORGS[rng.random_range(0..ORGS.len())],
            TEAMS[rng.random_range(0..TEAMS.len())]
        )
    } else {
        format!(
            "{}@example.com",
            USERNAMES[rng.random_range(0..USERNAMES.len())]
        )
    }
}
