//! Store operation handlers for eza-history CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::error::{Error, Result};
use crate::history::HistoryEntry;
use crate::search::HistoryQuery;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Read a file, or `stdin` when the path is "-"
fn read_source(path: &Path, stdin: &mut dyn Read) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        stdin.read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn format_entry_line(entry: &HistoryEntry<Value>) -> String {
    let mut line = format!(
        "{}  {}  {}",
        entry.id,
        entry.created_at.format("%Y-%m-%d %H:%M"),
        entry.title
    );
    if !entry.tags.is_empty() {
        line.push_str(&format!("  [{}]", entry.tags.join(", ")));
    }
    line
}

/// Gather the result and analyzed text named by `args` and store them
///
/// Blank text is accepted; the entry then gets the configured default title.
fn save_from_sources(
    app: &mut CliApp,
    args: &SaveArgs,
    stdin: &mut dyn Read,
) -> Result<Option<HistoryEntry<Value>>> {
    let stdin_path = Path::new("-");
    let result_from_stdin = args.result == stdin_path;

    if result_from_stdin && args.input.as_deref() == Some(stdin_path) {
        return Err(Error::invalid_arguments(
            "input text and result cannot both come from stdin",
        ));
    }

    let result: Value = serde_json::from_str(&read_source(&args.result, stdin)?)?;

    let input_text = match (&args.text, &args.input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_source(path, stdin)?,
        (None, None) if !result_from_stdin => read_source(stdin_path, stdin)?,
        (None, None) => {
            return Err(Error::invalid_arguments(
                "provide the analyzed text with --text or --input",
            ));
        }
    };

    app.verbose_println(&format!(
        "Saving analysis of {} characters",
        input_text.chars().count()
    ));

    Ok(app.store.save_analysis(&result, &input_text))
}

pub fn handle_save(app: &mut CliApp, args: &SaveArgs) -> Result<()> {
    match save_from_sources(app, args, &mut io::stdin().lock())? {
        Some(entry) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else if !app.quiet {
                println!("{}", format_entry_line(&entry));
            }
        }
        None => {
            eprintln!("Warning: analysis was not saved to history");
        }
    }

    Ok(())
}

fn list_query(args: &ListArgs) -> HistoryQuery {
    let mut query = HistoryQuery::new();
    if let Some(term) = &args.search {
        query = query.with_term(term.clone());
    }
    if let Some(tag) = &args.tag {
        query = query.with_tag(tag.clone());
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    query
}

pub fn handle_list(app: &mut CliApp, args: &ListArgs) -> Result<()> {
    let entries = list_query(args).apply(&app.store.get_history());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        if !app.quiet {
            println!("No saved analyses");
        }
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_entry_line(entry));
    }

    if !app.quiet {
        println!("\n{} of {} entries", entries.len(), app.config.max_entries);
    }

    Ok(())
}

pub fn handle_show(app: &mut CliApp, args: &ShowArgs) -> Result<()> {
    let entry = app
        .store
        .get_history_entry(&args.id)
        .ok_or_else(|| Error::entry_not_found(args.id.as_str()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else if args.result_only {
        println!("{}", serde_json::to_string_pretty(&entry.analysis_result)?);
    } else {
        println!("Id:      {}", entry.id);
        println!("Saved:   {}", entry.created_at.format("%Y-%m-%d %H:%M:%S"));
        println!("Title:   {}", entry.title);
        println!("Tags:    {}", entry.tags.join(", "));
        println!("\n{}\n", entry.input_text);
        println!("{}", serde_json::to_string_pretty(&entry.analysis_result)?);
    }

    Ok(())
}

pub fn handle_delete(app: &mut CliApp, args: &DeleteArgs) -> Result<()> {
    let deleted = app.store.delete_history_entry(&args.id);

    if !app.quiet {
        if deleted {
            println!("Deleted {}", args.id);
        } else {
            println!("No saved analysis with id {}", args.id);
        }
    }

    Ok(())
}

pub fn handle_clear(app: &mut CliApp, args: &ClearArgs) -> Result<()> {
    if !args.force {
        print!("Are you sure you want to clear the history? (y/N): ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    app.store.clear_history();

    if !app.quiet {
        println!("History cleared");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::{BackendKind, Config, DEFAULT_TITLE};
    use clap::Parser;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn memory_app() -> CliApp {
        let cli = Cli::try_parse_from(["eza-history", "--backend", "memory", "status"]).unwrap();
        let mut config = Config::default();
        config.backend = BackendKind::Memory;
        CliApp::with_config(&cli, config).unwrap()
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn save_args(result: PathBuf, input: Option<PathBuf>, text: Option<&str>) -> SaveArgs {
        SaveArgs {
            result,
            input,
            text: text.map(String::from),
            json: false,
        }
    }

    fn list_args() -> ListArgs {
        ListArgs {
            limit: None,
            tag: None,
            search: None,
            json: false,
        }
    }

    fn no_stdin() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    #[test]
    fn test_save_with_inline_text() {
        let dir = TempDir::new().unwrap();
        let result = write_file(&dir, "result.json", r#"{"issues": ["health_risk"]}"#);
        let mut app = memory_app();

        let args = save_args(result, None, Some("Bu çay kanseri tedavi eder"));
        let entry = save_from_sources(&mut app, &args, &mut no_stdin())
            .unwrap()
            .unwrap();

        assert_eq!(entry.title, "Bu çay kanseri tedavi eder");
        assert_eq!(entry.tags, vec!["health".to_string()]);
        assert_eq!(app.store.get_history(), vec![entry]);
    }

    #[test]
    fn test_save_with_input_file() {
        let dir = TempDir::new().unwrap();
        let result = write_file(&dir, "result.json", r#"{"score": 0.4}"#);
        let input = write_file(&dir, "input.txt", "First line\nsecond line");
        let mut app = memory_app();

        let args = save_args(result, Some(input), None);
        let entry = save_from_sources(&mut app, &args, &mut no_stdin())
            .unwrap()
            .unwrap();

        assert_eq!(entry.title, "First line");
        assert_eq!(entry.input_text, "First line\nsecond line");
    }

    #[test]
    fn test_save_reads_text_from_stdin_by_default() {
        let dir = TempDir::new().unwrap();
        let result = write_file(&dir, "result.json", r#"{"score": 1}"#);
        let mut app = memory_app();

        let args = save_args(result, None, None);
        let mut stdin = Cursor::new(b"Detox tea melts fat\nBuy now".to_vec());
        let entry = save_from_sources(&mut app, &args, &mut stdin)
            .unwrap()
            .unwrap();

        assert_eq!(entry.title, "Detox tea melts fat");
        assert_eq!(entry.input_text, "Detox tea melts fat\nBuy now");
    }

    #[test]
    fn test_save_reads_result_from_stdin() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "input.txt", "hello");
        let mut app = memory_app();

        let args = save_args(PathBuf::from("-"), Some(input), None);
        let mut stdin = Cursor::new(br#"{"score": 2}"#.to_vec());
        let entry = save_from_sources(&mut app, &args, &mut stdin)
            .unwrap()
            .unwrap();

        assert_eq!(entry.analysis_result["score"], 2);
    }

    #[test]
    fn test_save_rejects_both_from_stdin() {
        let mut app = memory_app();
        let args = save_args(PathBuf::from("-"), Some(PathBuf::from("-")), None);

        let result = save_from_sources(&mut app, &args, &mut no_stdin());
        assert!(matches!(result, Err(Error::InvalidArguments { .. })));
        assert!(app.store.get_history().is_empty());
    }

    #[test]
    fn test_save_needs_text_when_result_is_on_stdin() {
        let mut app = memory_app();
        let args = save_args(PathBuf::from("-"), None, None);

        let mut stdin = Cursor::new(br#"{"score": 2}"#.to_vec());
        let result = save_from_sources(&mut app, &args, &mut stdin);
        assert!(matches!(result, Err(Error::InvalidArguments { .. })));
    }

    #[test]
    fn test_save_rejects_malformed_result() {
        let dir = TempDir::new().unwrap();
        let result = write_file(&dir, "result.json", "{not json");
        let mut app = memory_app();

        let args = save_args(result, None, Some("text"));
        let outcome = save_from_sources(&mut app, &args, &mut no_stdin());
        assert!(matches!(outcome, Err(Error::Json(_))));
    }

    #[test]
    fn test_null_result_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let result = write_file(&dir, "result.json", "null");
        let mut app = memory_app();

        let args = save_args(result, None, Some("text"));
        let saved = save_from_sources(&mut app, &args, &mut no_stdin()).unwrap();
        assert!(saved.is_none());

        // The handler reports it and still succeeds
        handle_save(&mut app, &args).unwrap();
        assert!(app.store.get_history().is_empty());
    }

    #[test]
    fn test_blank_text_gets_default_title() {
        let dir = TempDir::new().unwrap();
        let result = write_file(&dir, "result.json", r#"{"score": 1}"#);
        let mut app = memory_app();

        let args = save_args(result, None, Some("   "));
        let entry = save_from_sources(&mut app, &args, &mut no_stdin())
            .unwrap()
            .unwrap();
        assert_eq!(entry.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_list_filters_by_tag_and_limit() {
        let mut app = memory_app();
        let result = serde_json::json!({ "score": 1 });
        app.store.save_analysis(&result, "Bitcoin yatırım fırsatı").unwrap();
        app.store.save_analysis(&result, "Hafta sonu tatil planı").unwrap();
        app.store.save_analysis(&result, "Kripto para borsası").unwrap();

        let mut args = list_args();
        args.tag = Some("finance".to_string());
        let entries = list_query(&args).apply(&app.store.get_history());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input_text, "Kripto para borsası");

        args.limit = Some(1);
        assert_eq!(list_query(&args).apply(&app.store.get_history()).len(), 1);

        handle_list(&mut app, &args).unwrap();
        args.json = true;
        handle_list(&mut app, &args).unwrap();
    }

    #[test]
    fn test_show_entry() {
        let mut app = memory_app();
        let entry = app
            .store
            .save_analysis(&serde_json::json!({ "score": 1 }), "shown")
            .unwrap();

        let args = ShowArgs {
            id: entry.id.to_string(),
            json: false,
            result_only: true,
        };
        handle_show(&mut app, &args).unwrap();

        let missing = ShowArgs {
            id: "no-such-id".to_string(),
            json: false,
            result_only: false,
        };
        let result = handle_show(&mut app, &missing);
        assert!(matches!(result, Err(Error::EntryNotFound { .. })));
    }

    #[test]
    fn test_delete_entry() {
        let mut app = memory_app();
        let result = serde_json::json!({ "score": 1 });
        let kept = app.store.save_analysis(&result, "kept").unwrap();
        let gone = app.store.save_analysis(&result, "gone").unwrap();

        let args = DeleteArgs {
            id: gone.id.to_string(),
        };
        handle_delete(&mut app, &args).unwrap();
        assert_eq!(app.store.get_history(), vec![kept]);

        // Unknown ids are reported, not treated as failures
        handle_delete(&mut app, &args).unwrap();
        assert_eq!(app.store.get_history().len(), 1);
    }
}
