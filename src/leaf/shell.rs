//! Interactive session.
//!
//! The session shows exactly one view at a time: the editor while the app
//! has a current note, the overview otherwise. Each input line is one
//! command; every change goes through `App`, which saves after each one.

use std::io::{BufRead, Write};

use log::debug;

use crate::app::App;
use crate::errors::Result;
use crate::note::NotePatch;
use crate::storage::Storage;
use crate::views::{render_note, render_overview, ListFlags, Screen};

/// produces new content from the old, e.g. by opening an editor
pub type EditFn = fn(&str) -> Result<String>;

static OVERVIEW_HELP: &str = "\
commands:
    new             create a note and open it
    open <ref>      open a note by id or list position
    list            show the notes again
    theme           switch between light and dark
    help            show this help
    quit            leave
";

static EDITOR_HELP: &str = "\
commands:
    title <text>    rename the note
    summary [text]  set the summary, or clear it without text
    content [text]  replace the content, or edit it in $EDITOR without text
    append <text>   add a line to the content
    delete          delete the note
    close           back to the overview
    theme           switch between light and dark
    help            show this help
    quit            leave
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    Open(String),
    List,
    Title(String),
    Summary(Option<String>),
    Content(Option<String>),
    Append(String),
    Delete,
    Close,
    Theme,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (word, rest) = match line.find(char::is_whitespace) {
            Some(i) => (&line[..i], line[i..].trim()),
            None => (line, ""),
        };
        let rest_opt = if rest.is_empty() { None } else { Some(rest.to_string()) };
        match word {
            "" => Command::Empty,
            "new" | "n" => Command::New,
            "open" | "o" => Command::Open(rest.to_string()),
            "list" | "ls" => Command::List,
            "title" | "t" => Command::Title(rest.to_string()),
            "summary" | "s" => Command::Summary(rest_opt),
            "content" | "c" => Command::Content(rest_opt),
            "append" | "a" => Command::Append(rest.to_string()),
            "delete" | "del" => Command::Delete,
            "close" | "back" => Command::Close,
            "theme" => Command::Theme,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

enum Flow {
    Stay,
    Redraw,
    Quit,
}

pub struct Session<'a, S: Storage, R: BufRead, W: Write> {
    app: &'a mut App<S>,
    input: R,
    output: W,
    tty: bool,
    console_width: usize,
    edit: EditFn,
}

impl<'a, S: Storage, R: BufRead, W: Write> Session<'a, S, R, W> {
    pub fn new(app: &'a mut App<S>, input: R, output: W, edit: EditFn) -> Session<'a, S, R, W> {
        Session {
            app,
            input,
            output,
            tty: false,
            console_width: 0,
            edit,
        }
    }

    /// style output for a terminal of the given width
    pub fn styled(mut self, tty: bool, console_width: usize) -> Session<'a, S, R, W> {
        self.tty = tty;
        self.console_width = console_width;
        self
    }

    fn screen(&self) -> Screen {
        Screen {
            theme: self.app.theme(),
            tty: self.tty,
            console_width: self.console_width,
        }
    }

    /// read commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        self.draw()?;
        loop {
            self.prompt()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            let command = Command::parse(&line);
            debug!("event=shell_command command={:?}", command);
            match self.handle(command) {
                Ok(Flow::Stay) => {}
                Ok(Flow::Redraw) => self.draw()?,
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(self.output, "error: {}", e)?,
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        match self.app.current_id() {
            Some(id) => write!(self.output, "leaf:{}> ", id)?,
            None => write!(self.output, "leaf> ")?,
        }
        self.output.flush()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let screen = self.screen();
        match self.app.current_note() {
            Some(note) => render_note(&mut self.output, note, false, false, screen),
            None => render_overview(&mut self.output, self.app.notes(), ListFlags::default(), screen),
        }
    }

    fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Empty => return Ok(Flow::Stay),
            Command::Quit => return Ok(Flow::Quit),
            Command::Theme => {
                let theme = self.app.toggle_theme()?;
                writeln!(self.output, "theme: {}", theme)?;
                return Ok(Flow::Stay);
            }
            Command::Unknown(word) => {
                writeln!(self.output, "unknown command '{}', type help", word)?;
                return Ok(Flow::Stay);
            }
            _ => {}
        }
        match self.app.current_id().map(str::to_string) {
            Some(id) => self.handle_editor(&id, command),
            None => self.handle_overview(command),
        }
    }

    fn handle_overview(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::New => {
                self.app.create_note()?;
                Ok(Flow::Redraw)
            }
            Command::Open(reference) => {
                let id = match self.app.resolve(&reference) {
                    Some(n) => n.id.clone(),
                    None => {
                        writeln!(self.output, "no note '{}'", reference)?;
                        return Ok(Flow::Stay);
                    }
                };
                self.app.select(&id)?;
                Ok(Flow::Redraw)
            }
            Command::List => Ok(Flow::Redraw),
            Command::Help => {
                write!(self.output, "{}", OVERVIEW_HELP)?;
                Ok(Flow::Stay)
            }
            other => {
                writeln!(self.output, "{} needs an open note", name_of(&other))?;
                Ok(Flow::Stay)
            }
        }
    }

    fn handle_editor(&mut self, id: &str, command: Command) -> Result<Flow> {
        let patch = match command {
            Command::Title(title) => {
                if title.is_empty() {
                    writeln!(self.output, "title needs text")?;
                    return Ok(Flow::Stay);
                }
                NotePatch { title: Some(title), ..Default::default() }
            }
            Command::Summary(summary) => NotePatch { summary: Some(summary), ..Default::default() },
            Command::Content(Some(content)) => NotePatch { content: Some(content), ..Default::default() },
            Command::Content(None) => {
                let old = self.app.get(id).map(|n| n.content.clone()).unwrap_or_default();
                let new = (self.edit)(&old)?;
                if new == old {
                    return Ok(Flow::Stay);
                }
                NotePatch { content: Some(new), ..Default::default() }
            }
            Command::Append(text) => {
                let mut content = self.app.get(id).map(|n| n.content.clone()).unwrap_or_default();
                if !content.is_empty() && !content.ends_with('\n') {
                    content.push('\n');
                }
                content.push_str(&text);
                NotePatch { content: Some(content), ..Default::default() }
            }
            Command::Delete => {
                self.app.delete_note(id)?;
                writeln!(self.output, "deleted note {}", id)?;
                return Ok(Flow::Redraw);
            }
            Command::Close => {
                self.app.close();
                return Ok(Flow::Redraw);
            }
            Command::Help => {
                write!(self.output, "{}", EDITOR_HELP)?;
                return Ok(Flow::Stay);
            }
            other => {
                writeln!(self.output, "{} is not available while a note is open", name_of(&other))?;
                return Ok(Flow::Stay);
            }
        };
        self.app.update_note(id, patch)?;
        Ok(Flow::Redraw)
    }
}

fn name_of(command: &Command) -> &'static str {
    match command {
        Command::New => "new",
        Command::Open(_) => "open",
        Command::List => "list",
        Command::Title(_) => "title",
        Command::Summary(_) => "summary",
        Command::Content(_) => "content",
        Command::Append(_) => "append",
        Command::Delete => "delete",
        Command::Close => "close",
        Command::Theme => "theme",
        Command::Help => "help",
        Command::Quit => "quit",
        Command::Empty | Command::Unknown(_) => "command",
    }
}
