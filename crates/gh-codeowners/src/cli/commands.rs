//! The `lint`, `view` and `pr` subcommands.
//!
//! Commands take the API, the repository and an output writer explicitly so
//! they can run against in-memory implementations in tests.

use crate::cli::config::ConfigError;
use crate::cli::git::GitError;
use crate::cli::output::{HumanOutput, write_json};
use crate::cli::{Filter, LintArgs};
use codeowners_annotate_core::remote::{ApiError, ChangedFile, CodeownersApi, Repository};
use codeowners_annotate_core::render::{Decorate, RenderOptions, render_file};
use codeowners_annotate_core::{Error, Ruleset, find_codeowners_file, resolve_codeowners_path};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Codeowners(#[from] Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// How command output is presented.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Whether to color the output.
    pub color: bool,
    /// Whether to pretty-print JSON.
    pub pretty_json: bool,
}

/// Lists the errors GitHub reports for the repository's CODEOWNERS file.
pub async fn lint<W: Write>(
    api: &dyn CodeownersApi,
    repo: &Repository,
    args: &LintArgs,
    output: OutputOptions,
    mut writer: W,
) -> Result<(), CommandError> {
    let errors = api
        .codeowners_errors(repo, args.ref_name.as_deref())
        .await?;
    info!("GitHub reported {} error(s) for {}", errors.len(), repo);

    if args.json {
        write_json(&mut writer, &errors, output.pretty_json)?;
        return Ok(());
    }

    let mut human = HumanOutput::new(&mut writer, output.color);
    match args.filter {
        Some(Filter::Unknown) => human.write_owners(&errors.unique_owners())?,
        None => human.write_errors(&errors)?,
    }
    writer.flush()?;
    Ok(())
}

/// Renders the CODEOWNERS file with the errors for `ref_name` highlighted.
///
/// Returns the number of lines written.
pub async fn view<W: Write>(
    api: &dyn CodeownersApi,
    repo: &Repository,
    root: &Path,
    ref_name: &str,
    decorator: &dyn Decorate,
    options: RenderOptions,
    writer: W,
) -> Result<usize, CommandError> {
    let errors = api.codeowners_errors(repo, Some(ref_name)).await?;
    info!("GitHub reported {} error(s) for {}", errors.len(), ref_name);

    let path = resolve_codeowners_path(root, &errors)?;
    debug!("Resolved CODEOWNERS to {}", path.display());

    Ok(render_file(root, &path, &errors, decorator, options, writer)?)
}

/// Writes the owners of each file changed in a pull request as JSON.
pub async fn pr<W: Write>(
    api: &dyn CodeownersApi,
    repo: &Repository,
    root: &Path,
    number: u64,
    output: OutputOptions,
    writer: W,
) -> Result<(), CommandError> {
    let path = find_codeowners_file(root).ok_or_else(|| Error::NotFound {
        root: root.to_path_buf(),
    })?;
    let rules = Ruleset::from_path(&path).map_err(Error::from)?;
    info!("Loaded {} rule(s) from {}", rules.len(), path.display());

    let files = codeowners_annotate_core::remote::pull_request_files(api, repo, number).await?;
    info!("Pull request #{} changed {} file(s)", number, files.len());

    let changed = ChangedFile::resolve(files, &rules);
    write_json(writer, &changed, output.pretty_json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codeowners_annotate_core::remote::{FilesPage, PullRequestFile};
    use codeowners_annotate_core::render::{Plain, RenderError, Style};
    use codeowners_annotate_core::{ErrorRecord, ErrorSet};
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = "# License\n\n* @default # Default owner(s)\ndocs/** @writers @unknown\n";

    struct MockApi {
        errors: ErrorSet,
        pages: Vec<FilesPage>,
    }

    #[async_trait]
    impl CodeownersApi for MockApi {
        async fn codeowners_errors(
            &self,
            _repo: &Repository,
            _ref_name: Option<&str>,
        ) -> Result<ErrorSet, ApiError> {
            Ok(self.errors.clone())
        }

        async fn pull_request_files_page(
            &self,
            _repo: &Repository,
            _number: u64,
            after: Option<&str>,
        ) -> Result<FilesPage, ApiError> {
            let index = after.map_or(0, |cursor| cursor.parse().unwrap_or(0));
            self.pages
                .get(index)
                .cloned()
                .ok_or_else(|| ApiError::Other(format!("no page {}", index)))
        }
    }

    fn errors_for(path: &str) -> ErrorSet {
        ErrorSet::new(vec![
            ErrorRecord::unknown_owner_at(path, 4, 18, "docs/** @writers @unknown")
                .with_message("Unknown owner on line 4"),
            ErrorRecord::unknown_owner_at(path, 4, 18, "docs/** @writers @unknown"),
        ])
    }

    fn api(errors: ErrorSet) -> MockApi {
        MockApi {
            errors,
            pages: Vec::new(),
        }
    }

    fn repo() -> Repository {
        "heaths/gh-codeowners".parse().unwrap()
    }

    fn tag(text: &str, style: Style) -> String {
        format!("<{style}>{text}</{style}>")
    }

    fn repo_with_codeowners(path: &str, content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
        dir
    }

    fn file(path: &str, change_type: &str) -> PullRequestFile {
        PullRequestFile {
            path: path.to_string(),
            change_type: change_type.to_string(),
        }
    }

    #[tokio::test]
    async fn lint_lists_errors() {
        let mut out = Vec::new();
        lint(
            &api(errors_for("CODEOWNERS")),
            &repo(),
            &LintArgs::default(),
            OutputOptions::default(),
            &mut out,
        )
        .await
        .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("CODEOWNERS:4:18: Unknown owner: Unknown owner on line 4\n"));
        assert!(output.ends_with("✗ Found 2 error(s)\n"));
    }

    #[tokio::test]
    async fn lint_filter_unknown() {
        let args = LintArgs {
            filter: Some(Filter::Unknown),
            ..Default::default()
        };
        let mut out = Vec::new();
        lint(
            &api(errors_for("CODEOWNERS")),
            &repo(),
            &args,
            OutputOptions::default(),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "@unknown\n");
    }

    #[tokio::test]
    async fn lint_filter_unknown_without_errors() {
        let args = LintArgs {
            filter: Some(Filter::Unknown),
            ..Default::default()
        };
        let mut out = Vec::new();
        lint(&api(ErrorSet::default()), &repo(), &args, OutputOptions::default(), &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn lint_json() {
        let args = LintArgs {
            json: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        lint(
            &api(errors_for("CODEOWNERS")),
            &repo(),
            &args,
            OutputOptions::default(),
            &mut out,
        )
        .await
        .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.ends_with('\n'));
        let parsed: ErrorSet = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, errors_for("CODEOWNERS"));
    }

    #[tokio::test]
    async fn view_plain_reproduces_file() {
        let dir = repo_with_codeowners(".github/CODEOWNERS", SOURCE);
        let mut out = Vec::new();
        let lines = view(
            &api(errors_for(".github/CODEOWNERS")),
            &repo(),
            dir.path(),
            "refs/heads/main",
            &Plain,
            RenderOptions::new(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(lines, 4);
        assert_eq!(String::from_utf8(out).unwrap(), SOURCE);
    }

    #[tokio::test]
    async fn view_decorated() {
        let dir = repo_with_codeowners(".github/CODEOWNERS", SOURCE);
        let mut out = Vec::new();
        view(
            &api(errors_for(".github/CODEOWNERS")),
            &repo(),
            dir.path(),
            "refs/heads/main",
            &tag,
            RenderOptions::decorated(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<comment># License</comment>\n\
             \n\
             * @default <comment># Default owner(s)</comment>\n\
             docs/** @writers <error><error>@unknown</error></error>\n"
        );
    }

    #[tokio::test]
    async fn view_without_errors_uses_located_file() {
        let dir = repo_with_codeowners("docs/CODEOWNERS", "* @default\n");
        let mut out = Vec::new();
        view(
            &api(ErrorSet::default()),
            &repo(),
            dir.path(),
            "refs/heads/main",
            &Plain,
            RenderOptions::decorated(),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "* @default\n");
    }

    #[tokio::test]
    async fn view_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = view(
            &api(errors_for(".github/CODEOWNERS")),
            &repo(),
            dir.path(),
            "refs/heads/main",
            &Plain,
            RenderOptions::new(),
            Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Codeowners(Error::Io(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn view_unreadable_file_is_a_read_error() {
        // Opening a directory succeeds on unix but reading it fails
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".github/CODEOWNERS")).unwrap();

        let err = view(
            &api(errors_for(".github/CODEOWNERS")),
            &repo(),
            dir.path(),
            "refs/heads/main",
            &Plain,
            RenderOptions::new(),
            Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, CommandError::Codeowners(Error::Render(RenderError::Read(_)))),
            "{:?}",
            err
        );
        assert!(err.to_string().starts_with("failed to read CODEOWNERS file"));
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn view_closed_output_is_a_write_error() {
        let dir = repo_with_codeowners(".github/CODEOWNERS", SOURCE);
        let err = view(
            &api(errors_for(".github/CODEOWNERS")),
            &repo(),
            dir.path(),
            "refs/heads/main",
            &Plain,
            RenderOptions::new(),
            Closed,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("failed to write output"), "{}", err);
    }

    #[tokio::test]
    async fn pr_resolves_owners() {
        let dir = repo_with_codeowners("CODEOWNERS", "* @heaths\ndocs/ @writers # docs team\n");
        let api = MockApi {
            errors: ErrorSet::default(),
            pages: vec![
                FilesPage {
                    files: vec![file("main.go", "MODIFIED")],
                    has_next_page: true,
                    end_cursor: Some("1".to_string()),
                },
                FilesPage {
                    files: vec![file("docs/README.md", "ADDED")],
                    has_next_page: false,
                    end_cursor: None,
                },
            ],
        };

        let mut out = Vec::new();
        pr(&api, &repo(), dir.path(), 1, OutputOptions::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[{\"path\":\"main.go\",\"changeType\":\"MODIFIED\",\"owners\":[\"@heaths\"]},\
             {\"path\":\"docs/README.md\",\"changeType\":\"ADDED\",\"owners\":[\"@writers\"]}]\n"
        );
    }

    #[tokio::test]
    async fn pr_without_codeowners() {
        let dir = TempDir::new().unwrap();
        let err = pr(
            &api(ErrorSet::default()),
            &repo(),
            dir.path(),
            1,
            OutputOptions::default(),
            Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Codeowners(Error::NotFound { .. })));
        assert!(err.to_string().starts_with("no CODEOWNERS file found"));
    }
}
