//! Interactive history browser handler

use crate::browse_tui::{self, BrowseOutcome};
use crate::cli::args::BrowseArgs;
use crate::cli::CliApp;
use crate::error::Result;
use crate::history::HistoryEntry;
use crate::search::HistoryQuery;
use serde_json::Value;

pub fn handle_browse(app: &mut CliApp, args: &BrowseArgs) -> Result<()> {
    let mut query = HistoryQuery::new();
    if let Some(tag) = &args.tag {
        query = query.with_tag(tag.clone());
    }
    let entries = query.apply(&app.store.get_history());

    if entries.is_empty() {
        println!("No saved analyses to browse");
        return Ok(());
    }

    let outcome = browse_tui::run_history_browser(entries)?;
    let (restored, deleted) = apply_outcome(app, &outcome);

    if deleted > 0 && !app.quiet {
        eprintln!("Deleted {} entries", deleted);
    }

    // The restored entry goes to stdout so callers can pipe it
    if let Some(entry) = restored {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    }

    Ok(())
}

/// Apply the browser's choices to the store
///
/// The restored entry is looked up before deletions run, so an entry that
/// was both marked and restored is still returned.
fn apply_outcome(
    app: &mut CliApp,
    outcome: &BrowseOutcome,
) -> (Option<HistoryEntry<Value>>, usize) {
    let restored = outcome
        .restore
        .as_ref()
        .and_then(|id| app.store.get_history_entry(id));

    let mut deleted = 0;
    for id in &outcome.delete {
        if app.store.delete_history_entry(id) {
            deleted += 1;
        }
    }

    (restored, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::{BackendKind, Config};
    use clap::Parser;
    use serde_json::json;

    fn memory_app() -> CliApp {
        let cli = Cli::try_parse_from(["eza-history", "--backend", "memory", "browse"]).unwrap();
        let mut config = Config::default();
        config.backend = BackendKind::Memory;
        CliApp::with_config(&cli, config).unwrap()
    }

    #[test]
    fn test_restore_survives_deleting_same_entry() {
        let mut app = memory_app();
        let a = app.store.save_analysis(&json!({ "score": 1 }), "a").unwrap();
        let b = app.store.save_analysis(&json!({ "score": 2 }), "b").unwrap();

        let outcome = BrowseOutcome {
            restore: Some(a.id.clone()),
            delete: vec![a.id.clone()],
        };
        let (restored, deleted) = apply_outcome(&mut app, &outcome);

        assert_eq!(restored, Some(a));
        assert_eq!(deleted, 1);
        assert_eq!(app.store.get_history(), vec![b]);
    }

    #[test]
    fn test_delete_counts_only_existing_entries() {
        let mut app = memory_app();
        let a = app.store.save_analysis(&json!({ "score": 1 }), "a").unwrap();

        let outcome = BrowseOutcome {
            restore: None,
            delete: vec![a.id.clone(), "unknown".into()],
        };
        let (restored, deleted) = apply_outcome(&mut app, &outcome);

        assert!(restored.is_none());
        assert_eq!(deleted, 1);
        assert!(app.store.get_history().is_empty());
    }
}
