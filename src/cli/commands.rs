//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use bhs_syntax::diagnostics::{DiagnosticCategory, render};
use bhs_syntax::{Analysis, DocumentIndex, analyze};

use crate::database;

use super::{CliError, CliResult, ExitCode};

/// Maximum script size accepted by the CLI (10 MB).
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// File extension of BHS scripts.
const SCRIPT_EXTENSION: &str = "bhs";

/// Read a script, refusing files over [`MAX_SOURCE_SIZE`].
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path.display(), e)))
}

/// Counts from checking one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub errors: usize,
    pub warnings: usize,
    /// The document has at least one error.
    pub failed: bool,
    /// Bracket problems stopped the pass before declarations were checked.
    pub structural: bool,
}

/// Render every diagnostic of `source` and count them.
pub fn check_source(file_name: &str, source: &str, color: bool) -> (String, CheckSummary) {
    let analysis = analyze(source);
    let mut report = String::new();
    let mut summary = CheckSummary::default();
    for diagnostic in &analysis.diagnostics {
        if diagnostic.is_error() {
            summary.errors += 1;
        } else {
            summary.warnings += 1;
        }
        if diagnostic.kind.category() == DiagnosticCategory::Structural {
            summary.structural = true;
        }
        report.push_str(&render(file_name, source, diagnostic, color));
    }
    summary.failed = analysis.has_errors();
    (report, summary)
}

/// Check files and directories; fails when any file has errors. Warnings alone pass.
pub fn check_paths(paths: &[PathBuf], color: bool) -> CliResult<ExitCode> {
    let files: Vec<PathBuf> = paths.iter().flat_map(|p| collect_script_files(p)).collect();
    if files.is_empty() {
        return Err(CliError::failure("No .bhs files found"));
    }

    let mut total = CheckSummary::default();
    let mut failed_files = 0;
    let mut unanalyzed_files = 0;
    for file in &files {
        let source = read_source(file)?;
        let name = file.display().to_string();
        let (report, summary) = check_source(&name, &source, color);
        tracing::debug!(file = %name, errors = summary.errors, warnings = summary.warnings, "checked");
        if !report.is_empty() {
            eprint!("{}", report);
        }
        total.errors += summary.errors;
        total.warnings += summary.warnings;
        failed_files += usize::from(summary.failed);
        unanalyzed_files += usize::from(summary.structural);
    }

    if unanalyzed_files > 0 {
        eprintln!(
            "note: {} file(s) stopped at bracket problems; fix those to see declaration checks",
            unanalyzed_files
        );
    }

    if failed_files > 0 {
        return Err(CliError::failure(format!(
            "\n{} error(s), {} warning(s); {} of {} file(s) failed",
            total.errors,
            total.warnings,
            failed_files,
            files.len()
        )));
    }

    println!("✓ {} file(s) checked, {} warning(s)", files.len(), total.warnings);
    Ok(ExitCode::SUCCESS)
}

/// Analyze a file whose bracket structure must be sound.
fn index_file(file_path: &Path) -> CliResult<(String, DocumentIndex)> {
    let source = read_source(file_path)?;
    let Analysis { diagnostics, index } = analyze(&source);
    match index {
        Some(index) => Ok((source, index)),
        None => {
            let name = file_path.display().to_string();
            let mut msg = String::new();
            for diagnostic in &diagnostics {
                msg.push_str(&render(&name, &source, diagnostic, false));
            }
            Err(CliError::failure(msg.trim_end()))
        }
    }
}

/// Print the scope tree, then document functions and labels.
pub fn print_scopes(file_path: &Path) -> CliResult<ExitCode> {
    let (_, index) = index_file(file_path)?;
    print!("{}", index.scopes.render());

    let functions = index.functions.iter().map(|f| f.to_symbol());
    for symbol in functions.chain(index.labels.iter().cloned()) {
        println!("({}) {} @{}..{}", symbol.kind, symbol.name, symbol.span.start, symbol.span.end);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the symbols visible at `offset`, outermost scope first.
pub fn print_visible(file_path: &Path, offset: usize) -> CliResult<ExitCode> {
    let (source, index) = index_file(file_path)?;
    if offset > source.len() {
        return Err(CliError::failure(format!(
            "Offset {} is past the end of '{}' ({} bytes)",
            offset,
            file_path.display(),
            source.len()
        )));
    }

    if let Some(scope) = index.scopes.innermost_at(offset) {
        let span = index.scopes.node(scope).span;
        println!("scope {}..{}", span.start, span.end);
    }
    for symbol in index.visible_at(offset) {
        println!("({}) {}", symbol.kind, symbol.name);
    }
    Ok(ExitCode::SUCCESS)
}

/// List database functions with their details.
pub fn list_functions(path: Option<&Path>, filter: Option<&str>) -> CliResult<ExitCode> {
    let Some(path) = database::resolve_path(path) else {
        return Err(CliError::failure(format!(
            "No function database: pass --functions or set {}",
            database::FUNCTIONS_ENV
        )));
    };
    let signatures = database::load(&path).map_err(|e| CliError::failure(e.to_string()))?;

    let filter = filter.unwrap_or("");
    let mut shown = 0;
    for signature in signatures.iter().filter(|s| s.label().contains(filter)) {
        println!("{}", signature.detail());
        shown += 1;
    }
    println!("\n{} of {} function(s)", shown, signatures.len());
    Ok(ExitCode::SUCCESS)
}

fn collect_script_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            let mut entries: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
            entries.sort();
            for entry_path in entries {
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') {
                        files.extend(collect_script_files(&entry_path));
                    }
                } else if entry_path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION) {
                    files.push(entry_path);
                }
            }
        }
    }

    files
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bhs_cli_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_check_source_counts_by_severity() {
        let (report, summary) = check_source("a.bhs", "{ int a; int a; }", false);
        assert_eq!(
            summary,
            CheckSummary {
                errors: 1,
                warnings: 0,
                failed: true,
                structural: false,
            }
        );
        assert!(report.contains("a is already declared"));

        let (_, summary) = check_source("b.bhs", "{ { } ", false);
        assert_eq!(
            summary,
            CheckSummary {
                errors: 0,
                warnings: 1,
                failed: false,
                structural: true,
            }
        );
    }

    #[test]
    fn test_check_paths_walks_directories() {
        let dir = scratch_dir("walk");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("ok.bhs"), "int a;").unwrap();
        fs::write(dir.join("nested").join("bad.bhs"), "int string;").unwrap();
        fs::write(dir.join("notes.txt"), "int int;").unwrap();

        let files = collect_script_files(&dir);
        assert_eq!(files.len(), 2);

        let err = check_paths(&[dir.clone()], false).unwrap_err();
        assert!(err.message.contains("1 error(s)"));
        assert!(err.message.contains("1 of 2 file(s) failed"));
        assert!(check_paths(&[dir.join("ok.bhs")], false).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_check_paths_without_scripts_fails() {
        let dir = scratch_dir("empty");
        let err = check_paths(&[dir.clone()], false).unwrap_err();
        assert_eq!(err.message, "No .bhs files found");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_visible_rejects_offsets_past_end() {
        let dir = scratch_dir("visible");
        let file = dir.join("a.bhs");
        fs::write(&file, "int a;").unwrap();
        assert!(print_visible(&file, 6).is_ok());
        assert!(print_visible(&file, 7).unwrap_err().message.contains("past the end"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_scopes_fail_on_broken_brackets() {
        let dir = scratch_dir("scopes");
        let file = dir.join("a.bhs");
        fs::write(&file, "{ int a; ").unwrap();
        assert!(print_scopes(&file).is_err());
        fs::write(&file, "{ int a; }").unwrap();
        assert!(print_scopes(&file).is_ok());
        let _ = fs::remove_dir_all(&dir);
    }
}
