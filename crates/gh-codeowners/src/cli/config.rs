//! Configuration handling for the CLI.
//!
//! This module merges CLI arguments with the optional config file at
//! `~/.config/gh-codeowners/config.yml` and handles GitHub authentication
//! setup.

use crate::cli::Args;
use codeowners_annotate_core::remote::{DEFAULT_HOST, Repository, RepositoryParseError};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Default color for comments.
pub const DEFAULT_COLOR_COMMENT: Rgb = Rgb::new(0x6A, 0x99, 0x55);

/// Default color for unknown owners.
pub const DEFAULT_COLOR_ERROR: Rgb = Rgb::new(0xF4, 0x47, 0x47);

/// Errors that can occur during configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration.
    #[error("missing required configuration: {0}")]
    MissingRequired(String),

    /// Invalid repository.
    #[error("invalid repository: {0}")]
    Repository(#[from] RepositoryParseError),

    /// GitHub authentication error.
    #[error("GitHub authentication error: {0}")]
    GitHubAuth(String),

    /// Failed to read the config file.
    #[error("failed to read config file '{}': {message}", path.display())]
    ReadConfig { path: PathBuf, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Application exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The command completed successfully.
    Success = 0,
    /// The command failed (wrong configuration, API or I/O error).
    Failure = 1,
    /// Application terminated by signal (SIGINT/SIGTERM).
    Terminated = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Error from parsing a color that isn't `#RRGGBB`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0:?} is not a valid color matching #RRGGBB")]
pub struct RgbParseError(String);

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RgbParseError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Colors used when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    pub comment: Rgb,
    pub error: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            comment: DEFAULT_COLOR_COMMENT,
            error: DEFAULT_COLOR_ERROR,
        }
    }
}

impl ColorConfig {
    /// Resolves colors from flags, then the config file, then defaults.
    ///
    /// Config file values that aren't valid colors are skipped with a warning.
    pub fn resolve(comment: Option<Rgb>, error: Option<Rgb>, file: Option<&FileConfig>) -> Self {
        let defaults = Self::default();
        let section = file.map(|f| &f.color);

        Self {
            comment: comment
                .or_else(|| section.and_then(|c| from_file("color.comment", c.comment.as_deref())))
                .unwrap_or(defaults.comment),
            error: error
                .or_else(|| section.and_then(|c| from_file("color.error", c.error.as_deref())))
                .unwrap_or(defaults.error),
        }
    }
}

fn from_file(key: &str, value: Option<&str>) -> Option<Rgb> {
    match value?.parse() {
        Ok(rgb) => Some(rgb),
        Err(e) => {
            warn!("config {:?}: {}; skipping...", key, e);
            None
        }
    }
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub color: ColorSection,
}

/// The `color` section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorSection {
    pub comment: Option<String>,
    pub error: Option<String>,
}

impl FileConfig {
    /// Loads the config file, or returns `None` if it doesn't exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::ReadConfig {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        // An empty file is valid YAML for "nothing configured"
        if content.trim().is_empty() {
            return Ok(Some(Self::default()));
        }

        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::ReadConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Returns `~/.config/gh-codeowners/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("gh-codeowners").join("config.yml"))
}

/// Validated and processed configuration for running a command.
#[derive(Debug)]
pub struct AppConfig {
    /// Repository selected with `--repo`, if any.
    pub repo: Option<Repository>,
    /// Token passed with `--token` or `GH_TOKEN`, used for any host.
    pub token: Option<SecretString>,
    /// Rendering colors.
    pub colors: ColorConfig,
    /// Whether color was disabled by flag or environment.
    pub no_color: bool,
}

impl AppConfig {
    /// Creates a validated configuration from CLI arguments and the environment.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::build(args, default_config_path().as_deref(), no_color_env)
    }

    /// Creates a validated configuration from explicit inputs.
    pub fn build(
        args: &Args,
        config_path: Option<&Path>,
        no_color_env: bool,
    ) -> Result<Self, ConfigError> {
        let repo = args
            .repo
            .as_deref()
            .map(|spec| parse_repository(spec, &args.hostname))
            .transpose()?;

        let file = match config_path {
            Some(path) => match FileConfig::load(path) {
                Ok(file) => {
                    debug!("Config file {}: {:?}", path.display(), file);
                    file
                }
                Err(e) => {
                    warn!("{}, skipping...", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            repo,
            token: args
                .token
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| SecretString::from(t.to_string())),
            colors: ColorConfig::resolve(args.color_comment, args.color_error, file.as_ref()),
            no_color: args.no_color || no_color_env,
        })
    }

    /// Returns the token to use for `host`.
    ///
    /// Looks at `--token`/`GH_TOKEN`, then the host's environment variables,
    /// then the token `gh auth login` stored.
    pub fn token_for_host(&self, host: &str) -> Result<SecretString, ConfigError> {
        self.resolve_token(host, |name| env::var(name).ok(), stored_token)
    }

    /// Resolves the token for `host` from the given environment lookup and
    /// stored-token lookup.
    ///
    /// github.com reads `GITHUB_TOKEN`; other hosts read `GH_ENTERPRISE_TOKEN`
    /// then `GITHUB_ENTERPRISE_TOKEN`. The stored token is only asked for when
    /// no other source has one.
    pub fn resolve_token<E, S>(
        &self,
        host: &str,
        env: E,
        stored: S,
    ) -> Result<SecretString, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
        S: FnOnce(&str) -> Option<String>,
    {
        if let Some(token) = &self.token {
            return Ok(SecretString::from(token.expose_secret().to_string()));
        }

        let names: &[&str] = if host.eq_ignore_ascii_case(DEFAULT_HOST) {
            &["GITHUB_TOKEN"]
        } else {
            &["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"]
        };
        let from_env = names.iter().find_map(|name| {
            let token = env(name).filter(|t| !t.trim().is_empty())?;
            debug!("Using token from {}", name);
            Some(token)
        });

        from_env
            .or_else(|| stored(host).filter(|t| !t.trim().is_empty()))
            .map(SecretString::from)
            .ok_or_else(|| {
                ConfigError::MissingRequired(format!(
                    "GitHub token for {}; run `gh auth login`, set GH_TOKEN, or pass --token",
                    host
                ))
            })
    }
}

/// Returns the token `gh auth login` stored for `host`, if any.
fn stored_token(host: &str) -> Option<String> {
    debug!("Running gh auth token --hostname {}", host);
    let output = match Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            debug!("Could not run gh: {}", e);
            return None;
        }
    };

    if !output.status.success() {
        debug!(
            "gh auth token failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Parses `[HOST/]OWNER/REPO`, using `hostname` when no host is given.
pub fn parse_repository(spec: &str, hostname: &str) -> Result<Repository, RepositoryParseError> {
    let repo: Repository = spec.parse()?;
    if spec.matches('/').count() == 1 {
        return Ok(Repository::new(hostname.to_lowercase(), repo.owner(), repo.name()));
    }
    Ok(repo)
}

/// Returns the API base URI for a host, or `None` for github.com.
///
/// GitHub Enterprise Server serves GraphQL at `/api/graphql`.
pub fn api_base_uri(host: &str) -> Option<String> {
    if host.eq_ignore_ascii_case(DEFAULT_HOST) {
        None
    } else {
        Some(format!("https://{}/api", host))
    }
}

/// Creates an authenticated Octocrab client for a host.
pub fn create_octocrab(host: &str, token: &SecretString) -> Result<Octocrab, ConfigError> {
    let mut builder = Octocrab::builder();
    if let Some(url) = api_base_uri(host) {
        builder = builder
            .base_uri(url)
            .map_err(|e| ConfigError::GitHubAuth(format!("invalid base URL: {}", e)))?;
    }

    builder
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| ConfigError::GitHubAuth(format!("failed to build client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["gh-codeowners", "lint"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Failure), 1);
        assert_eq!(i32::from(ExitCode::Terminated), 2);
    }

    #[test]
    fn test_rgb_parse() {
        assert_eq!("#6A9955".parse::<Rgb>(), Ok(DEFAULT_COLOR_COMMENT));
        assert_eq!("#f44747".parse::<Rgb>(), Ok(DEFAULT_COLOR_ERROR));
        assert_eq!(DEFAULT_COLOR_ERROR.to_string(), "#F44747");
    }

    #[test]
    fn test_rgb_parse_invalid() {
        for s in ["", "6A9955", "#6A995", "#6A99550", "#GGGGGG", "green", "#6A995é"] {
            assert!(s.parse::<Rgb>().is_err(), "{s:?}");
        }
    }

    #[test]
    fn test_file_config_missing() {
        let dir = TempDir::new().unwrap();
        let loaded = FileConfig::load(&dir.path().join("config.yml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_file_config_colors() {
        let (_dir, path) = write_config("color:\n  comment: \"#00FF00\"\n  error: \"#0000FF\"\n");
        let file = FileConfig::load(&path).unwrap().unwrap();
        let colors = ColorConfig::resolve(None, None, Some(&file));
        assert_eq!(colors.comment, Rgb::new(0, 0xFF, 0));
        assert_eq!(colors.error, Rgb::new(0, 0, 0xFF));
    }

    #[test]
    fn test_file_config_invalid_color_skipped() {
        let (_dir, path) = write_config("color:\n  comment: green\n");
        let file = FileConfig::load(&path).unwrap().unwrap();
        let colors = ColorConfig::resolve(None, None, Some(&file));
        assert_eq!(colors, ColorConfig::default());
    }

    #[test]
    fn test_file_config_empty() {
        let (_dir, path) = write_config("");
        assert!(FileConfig::load(&path).unwrap().is_some());
    }

    #[test]
    fn test_file_config_malformed() {
        let (_dir, path) = write_config("color: [unclosed\n");
        let err = FileConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadConfig { .. }));
    }

    #[test]
    fn test_flags_override_file() {
        let (_dir, path) = write_config("color:\n  error: \"#0000FF\"\n");
        let file = FileConfig::load(&path).unwrap().unwrap();
        let colors = ColorConfig::resolve(None, Some(Rgb::new(1, 2, 3)), Some(&file));
        assert_eq!(colors.error, Rgb::new(1, 2, 3));
        assert_eq!(colors.comment, DEFAULT_COLOR_COMMENT);
    }

    fn config_with_token(token: Option<&str>) -> AppConfig {
        AppConfig {
            repo: None,
            token: token.map(|t| SecretString::from(t.to_string())),
            colors: ColorConfig::default(),
            no_color: false,
        }
    }

    fn env_of<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    fn no_stored(_host: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_token_flag_wins() {
        let config = config_with_token(Some("flag"));
        let token = config
            .resolve_token(
                "github.com",
                env_of(&[("GITHUB_TOKEN", "env")]),
                |_| panic!("stored token should not be read"),
            )
            .unwrap();
        assert_eq!(token.expose_secret(), "flag");
    }

    #[test]
    fn test_token_github_com_env() {
        let config = config_with_token(None);
        let vars = [("GH_ENTERPRISE_TOKEN", "ghe"), ("GITHUB_TOKEN", "env")];
        let token = config
            .resolve_token("github.com", env_of(&vars), |_| panic!("stored token should not be read"))
            .unwrap();
        assert_eq!(token.expose_secret(), "env");
    }

    #[test]
    fn test_token_enterprise_env() {
        let config = config_with_token(None);
        let vars = [
            ("GITHUB_TOKEN", "dotcom"),
            ("GITHUB_ENTERPRISE_TOKEN", "github-ghe"),
            ("GH_ENTERPRISE_TOKEN", "gh-ghe"),
        ];
        let token = config
            .resolve_token("ghe.example.com", env_of(&vars), no_stored)
            .unwrap();
        assert_eq!(token.expose_secret(), "gh-ghe");

        let token = config
            .resolve_token("ghe.example.com", env_of(&vars[..2]), no_stored)
            .unwrap();
        assert_eq!(token.expose_secret(), "github-ghe");
    }

    #[test]
    fn test_token_falls_back_to_stored_login() {
        let config = config_with_token(None);
        let vars = [("GITHUB_TOKEN", "dotcom"), ("GH_ENTERPRISE_TOKEN", "  ")];
        let token = config
            .resolve_token("ghe.example.com", env_of(&vars), |host| {
                assert_eq!(host, "ghe.example.com");
                Some("stored".to_string())
            })
            .unwrap();
        assert_eq!(token.expose_secret(), "stored");
    }

    #[test]
    fn test_token_missing() {
        let config = config_with_token(None);
        let err = config
            .resolve_token("github.com", env_of(&[]), no_stored)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
        assert!(err.to_string().contains("gh auth login"));
    }

    #[test]
    fn test_app_config_token_flag() {
        let config = AppConfig::build(&args(&["--token", "flag"]), None, false).unwrap();
        assert_eq!(config.token.unwrap().expose_secret(), "flag");
    }

    #[test]
    fn test_app_config_repository() {
        let config = AppConfig::build(
            &args(&["-R", "heaths/gh-codeowners", "--hostname", "GHE.example.com"]),
            None,
            false,
        )
        .unwrap();
        assert_eq!(
            config.repo,
            Some(Repository::new("ghe.example.com", "heaths", "gh-codeowners"))
        );
    }

    #[test]
    fn test_app_config_invalid_repository() {
        let result = AppConfig::build(&args(&["-R", "nope"]), None, false);
        assert!(matches!(result, Err(ConfigError::Repository(_))));
    }

    #[test]
    fn test_app_config_reads_file_and_no_color() {
        let (_dir, path) = write_config("color:\n  comment: \"#010203\"\n");
        let config = AppConfig::build(&args(&[]), Some(&path), true).unwrap();
        assert_eq!(config.colors.comment, Rgb::new(1, 2, 3));
        assert!(config.no_color);
    }

    #[test]
    fn test_parse_repository_explicit_host() {
        let repo = parse_repository("ghe.example.com/org/repo", "github.com").unwrap();
        assert_eq!(repo.host(), "ghe.example.com");
    }

    #[test]
    fn test_api_base_uri() {
        assert_eq!(api_base_uri("github.com"), None);
        assert_eq!(
            api_base_uri("ghe.example.com").as_deref(),
            Some("https://ghe.example.com/api")
        );
    }
}
