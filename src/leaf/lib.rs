pub mod app;
pub mod args;
pub mod errors;
pub mod lineformat;
pub mod logging;
pub mod note;
pub mod shell;
pub mod storage;
pub mod theme;
pub mod utils;
pub mod views;

use std::io::{self, Write};

use clap::Parser;
use log::info;

use app::App;
use args::{Cli, Commands};
use errors::Result;
use note::NotePatch;
use shell::Session;
use storage::{FileStorage, Storage};
use utils::{drop_to_editor, find_store_folder, get_yn_input, stdin_is_tty, stdout_is_tty, termsize};
use views::{render_note, render_overview, render_stats, ListFlags, Screen};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(cli.verbose)?;

    let store_path = find_store_folder(&cli.dir)?;
    info!("event=store_open path={}", store_path.display());
    let mut app = App::load(FileStorage::new(&store_path))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let screen = Screen {
        theme: app.theme(),
        tty: stdout_is_tty(),
        console_width: termsize(),
    };

    match cli.command {
        Some(Commands::New { title, content, summary, editor }) => {
            let id = app.create_note()?;
            let content = if editor && interactive() {
                Some(drop_to_editor(content.as_deref().unwrap_or(""))?)
            } else {
                content
            };
            let patch = NotePatch {
                title,
                content,
                summary: summary.map(Some),
            };
            if !patch.is_empty() {
                app.update_note(&id, patch)?;
            }
            writeln!(out, "created note {}", id)?;
        }
        Some(Commands::Edit { note, title, content, summary, clear_summary, editor }) => {
            let (id, old_content) = match app.resolve(&note) {
                Some(n) => (n.id.clone(), n.content.clone()),
                None => return specific_fail!(format!("note {} doesn't exist", note)),
            };
            let content = if editor && interactive() {
                Some(drop_to_editor(content.as_deref().unwrap_or(&old_content))?)
            } else {
                content
            };
            let summary = if clear_summary { Some(None) } else { summary.map(Some) };
            app.update_note(&id, NotePatch { title, content, summary })?;
            writeln!(out, "edited note {}", id)?;
        }
        Some(Commands::Del { notes }) => {
            // resolve everything first; positions shift as notes go
            let targets: Vec<(String, Option<String>)> = notes.into_iter()
                .map(|r| {
                    let id = app.resolve(&r).map(|n| n.id.clone());
                    (r, id)
                })
                .collect();
            for (reference, id) in targets {
                let deleted = match id {
                    Some(ref id) => app.delete_note(id)?,
                    None => false,
                };
                match id {
                    Some(id) if deleted => writeln!(out, "deleted note {}", id)?,
                    _ => writeln!(out, "note {} doesn't exist", reference)?,
                }
            }
        }
        Some(Commands::View { note, yaml, condensed }) => {
            view_note(&app, &note, yaml, condensed, &mut out, screen)?;
        }
        Some(Commands::List { limit, updated, reverse, yaml, condensed }) => {
            let flags = ListFlags {
                limit: limit.unwrap_or(0),
                updated,
                reverse,
                condensed,
                yaml,
            };
            render_overview(&mut out, app.notes(), flags, screen)?;
        }
        Some(Commands::Theme { theme }) => {
            let theme = match theme {
                Some(t) => {
                    app.set_theme(t.into())?;
                    app.theme()
                }
                None => app.toggle_theme()?,
            };
            writeln!(out, "theme: {}", theme)?;
        }
        Some(Commands::Info) => {
            let store = app.storage().root().display().to_string();
            render_stats(&mut out, &app.stats(), &store, screen)?;
        }
        Some(Commands::Clear) => {
            if !cli.yes {
                let stdin = io::stdin();
                let message = "are you sure you want to delete all notes?\n";
                if !get_yn_input(message, &mut stdin.lock(), &mut out)? {
                    return specific_fail_str!("ok, nothing deleted");
                }
            }
            let removed = app.clear()?;
            writeln!(out, "deleted {} notes", removed)?;
        }
        Some(Commands::Shell) => {
            let stdin = io::stdin();
            Session::new(&mut app, stdin.lock(), &mut out, drop_to_editor)
                .styled(screen.tty, screen.console_width)
                .run()?;
        }
        None => match cli.note {
            Some(note) => view_note(&app, &note, false, false, &mut out, screen)?,
            None => render_overview(&mut out, app.notes(), ListFlags::default(), screen)?,
        },
    }

    out.flush()?;
    Ok(())
}

fn interactive() -> bool {
    stdout_is_tty() && stdin_is_tty()
}

fn view_note<S: Storage, W: Write>(app: &App<S>,
                                   reference: &str,
                                   yaml: bool,
                                   condensed: bool,
                                   out: &mut W,
                                   screen: Screen)
                                   -> Result<()> {
    match app.resolve(reference) {
        Some(n) => render_note(out, n, yaml, condensed, screen),
        None => specific_fail!(format!("note {} doesn't exist", reference)),
    }
}
