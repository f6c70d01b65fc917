use std::env::var;
use std::fs::{self, File};
use std::io::{stdin, stdout, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use chrono::{DateTime, Local, Utc};
use crossterm::{
    queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    tty::IsTty,
};
use log::debug;
use tempfile::Builder;

use crate::errors::{Error, ErrorKind, Result};
use crate::specific_fail_str;

/// datetime formating string for printing
pub static DATEFMT_SHORT: &str = "%F %T";

pub fn stdout_is_tty() -> bool {
    stdout().is_tty()
}

pub fn stdin_is_tty() -> bool {
    stdin().is_tty()
}

pub fn termsize() -> usize {
    if let Ok((cols, _rows)) = crossterm::terminal::size() {
        cols as usize
    } else {
        0
    }
}

/// Open `contents` in `$VISUAL`/`$EDITOR` and return what was saved.
pub fn drop_to_editor(contents: &str) -> Result<String> {
    let tmpfile = Builder::new()
        .prefix("leaf")
        .suffix(".txt")
        .rand_bytes(5)
        .tempfile()?;
    let tmppath = tmpfile.path().to_owned();

    {
        let mut file = File::create(&tmppath)?;
        file.write_all(contents.as_bytes())?;
    }

    let editor = var("VISUAL").or_else(|_| var("EDITOR"))
        .unwrap_or_else(|_| "nano".to_string());
    debug!("event=editor_start editor={} path={}", editor, tmppath.display());

    let mut editor_command = Command::new(&editor);
    editor_command.arg(tmppath.display().to_string());
    editor_command.stdin(Stdio::inherit());
    editor_command.stdout(Stdio::inherit());
    editor_command.stderr(Stdio::inherit());

    let mut editor_proc = editor_command.spawn().map_err(|e| Error {
        kind: ErrorKind::Generic,
        desc: format!("Failed to start editor '{}': {}", editor, e),
        detail: None,
    })?;

    match editor_proc.wait() {
        Ok(status) if status.success() => {
            let mut file = File::open(&tmppath)?;
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            Ok(content)
        }
        _ => specific_fail_str!("The editor process failed."),
    }
}

/// Ask a yes/no question on `output`, reading answers from `input` until
/// one of them is recognized.
pub fn get_yn_input<R: BufRead, W: Write>(message: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{}", message)?;
    let yes = ["y", "Y", "yes", "YES", "Yes"];
    let no = ["n", "N", "no", "NO", "No"];

    loop {
        write!(output, "[y/n]# ")?;
        output.flush()?;
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        let answer = answer.trim();
        if yes.contains(&answer) {
            return Ok(true);
        } else if no.contains(&answer) {
            return Ok(false);
        }
        writeln!(output, "invalid input.")?;
    }
}

/// Write `label` emphasized (bold, in `color`) when `tty`, then `plain`.
pub fn pretty_line<W: Write>(output: &mut W,
                             label: &str,
                             plain: &str,
                             color: Color,
                             tty: bool)
                             -> Result<()> {
    if tty {
        queue!(output, SetForegroundColor(color), SetAttribute(Attribute::Bold))?;
    }
    write!(output, "{}", label)?;
    if tty {
        queue!(output, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    write!(output, "{}", plain)?;
    Ok(())
}

pub fn format_field(value: &str, width: usize, truncate: bool) -> String {
    if value.chars().count() > width && width > 3 && truncate {
        format!("{: <1$.1$}...", value, width - 3)
    } else {
        format!("{: <1$.1$}", value, width)
    }
}

/// first non-blank line of `text`
pub fn preview(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}

pub fn localize_timestamp(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format(DATEFMT_SHORT).to_string()
}

/// Pick the store directory: an explicit path wins, otherwise `~/.leaf`.
/// If `~/.leaf` is a file, its contents name the directory to use.
pub fn find_store_folder(store_folder: &Option<String>) -> Result<PathBuf> {
    if let Some(sf) = store_folder {
        return Ok(PathBuf::from(sf));
    }
    match dirs::home_dir() {
        Some(p) => {
            let default_path = p.join(".leaf");
            if default_path.is_file() {
                let contents = fs::read_to_string(&default_path)?;
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    return specific_fail_str!("~/.leaf is a file but is empty. It should contain a path to the store directory.");
                }
                Ok(PathBuf::from(trimmed))
            } else {
                Ok(default_path)
            }
        }
        None => specific_fail_str!("failed to find your home directory"),
    }
}
