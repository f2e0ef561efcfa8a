//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notepad_core` linkage without the Flutter runtime.
//! - Drive the list screen against a store file for quick local checks.
//!
//! Usage: `notepad_cli [list | add <title> [description]]`
//! The store file comes from `NOTEPAD_DB_PATH`, or the temp dir. Logs go to
//! `<temp dir>/notepad_logs` at the configured level.

use notepad_core::{
    NoteGateway, NoteListScreen, NotepadConfig, SqliteKeyValueStore, StoreQueue,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notepad_core ping={}", notepad_core::ping());
    println!("notepad_core version={}", notepad_core::core_version());

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let config = NotepadConfig::default();
    let log_dir = std::env::temp_dir().join("notepad_logs");
    if let Err(err) = config.init_logging(&log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    let db_path = config.resolve_db_path(std::env::temp_dir());
    let store = SqliteKeyValueStore::open(&db_path).map_err(|err| err.to_string())?;
    let queue = StoreQueue::start(store).map_err(|err| err.to_string())?;
    let mut screen = NoteListScreen::open(NoteGateway::with_config(queue, &config));
    println!("store={}", db_path.display());

    match args.first().map(String::as_str) {
        None | Some("list") => {}
        Some("add") => {
            let title = args.get(1).ok_or("add requires a title")?;
            let description = args.get(2).cloned().unwrap_or_default();
            let mut note = screen
                .start_note_creation()
                .map_err(|err| err.to_string())?;
            note.title = title.clone();
            note.description = description;
            screen
                .apply_edited_note(note)
                .map_err(|err| err.to_string())?
                .wait()
                .map_err(|err| err.to_string())?;
        }
        Some(other) => return Err(format!("unknown command `{other}`")),
    }

    screen.flush();
    for note in screen.notes() {
        println!("#{} {} | {}", note.id, note.title, note.description);
    }
    Ok(())
}
