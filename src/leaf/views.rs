//! Terminal renderings of the two views: the overview table of all notes
//! and the editor view of a single note.

use std::io::Write;

use crossterm::{queue, style::{ResetColor, SetForegroundColor}};

use crate::app::Stats;
use crate::errors::Result;
use crate::lineformat::LineFormat;
use crate::note::Note;
use crate::theme::Theme;
use crate::utils::{format_field, localize_timestamp, pretty_line};

/// How the overview is listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFlags {
    /// 0 lists everything
    pub limit: usize,
    /// most recently updated first instead of list order
    pub updated: bool,
    pub reverse: bool,
    pub condensed: bool,
    pub yaml: bool,
}

/// Where and how output goes.
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    pub theme: Theme,
    pub tty: bool,
    pub console_width: usize,
}

impl Screen {
    /// plain output, as used for pipes and tests
    pub fn plain(theme: Theme) -> Screen {
        Screen { theme, tty: false, console_width: 0 }
    }
}

/// Print the overview table. Positions shown are list positions, so they
/// can be passed back as note references whatever the sort order.
pub fn render_overview<W: Write>(output: &mut W,
                                 notes: &[Note],
                                 flags: ListFlags,
                                 screen: Screen)
                                 -> Result<()> {
    let mut rows: Vec<(usize, &Note)> = notes.iter().enumerate().map(|(i, n)| (i + 1, n)).collect();
    if flags.updated {
        rows.sort_by(|a, b| b.1.updated_at.cmp(&a.1.updated_at));
    }
    if flags.reverse {
        rows.reverse();
    }
    if flags.limit != 0 && flags.limit < rows.len() {
        rows.truncate(flags.limit);
    }

    if flags.yaml {
        let selected: Vec<&Note> = rows.iter().map(|r| r.1).collect();
        write!(output, "{}", serde_yaml::to_string(&selected)?)?;
        return Ok(());
    }
    if rows.is_empty() {
        writeln!(output, "no notes yet")?;
        return Ok(());
    }

    let shown: Vec<Note> = rows.iter().map(|r| r.1.clone()).collect();
    let line_format = LineFormat::new(&shown, flags.condensed, screen.console_width);
    if !flags.condensed {
        write_header(output, &line_format, screen)?;
    }
    for (position, note) in rows {
        note.write_row(output, position, &line_format)?;
    }
    Ok(())
}

fn write_header<W: Write>(output: &mut W, line_format: &LineFormat, screen: Screen) -> Result<()> {
    let palette = screen.theme.palette();
    let column_seperator = " ".repeat(line_format.colsep);
    let preview = if line_format.preview_width == 0 {
        String::new()
    } else {
        format_field("preview", line_format.preview_width, false) + &column_seperator
    };
    let header = format!("{1}{0}{2}{0}{3}{4}\n",
                         column_seperator,
                         format_field("#", line_format.pos_width, false),
                         format_field("title", line_format.title_width, false),
                         preview,
                         format_field("updated", line_format.updated_width, false));
    pretty_line(output, &header, "", palette.accent, screen.tty)?;
    if screen.tty {
        queue!(output, SetForegroundColor(palette.muted))?;
    }
    writeln!(output, "{}", "-".repeat(line_format.line_width()))?;
    if screen.tty {
        queue!(output, ResetColor)?;
    }
    Ok(())
}

/// Print one note in full, the way the editor shows it.
pub fn render_note<W: Write>(output: &mut W,
                             note: &Note,
                             yaml: bool,
                             condensed: bool,
                             screen: Screen)
                             -> Result<()> {
    if yaml {
        write!(output, "{}", serde_yaml::to_string(note)?)?;
        return Ok(());
    }
    let color = screen.theme.palette().accent;
    let tty = screen.tty;

    if condensed {
        pretty_line(output, "id: ", &format!("{}\n", note.id), color, tty)?;
        pretty_line(output, "title: ", &format!("{}\n", note.title), color, tty)?;
        if let Some(ref s) = note.summary {
            pretty_line(output, "summary: ", &format!("{}\n", s), color, tty)?;
        }
        pretty_line(output, "updated: ", &format!("{}\n", localize_timestamp(&note.updated_at)), color, tty)?;
        if !note.content.is_empty() {
            pretty_line(output, "content: ", &format!("{}\n", note.content), color, tty)?;
        }
        return Ok(());
    }

    pretty_line(output, "id\n--\n", &format!("{}\n\n", note.id), color, tty)?;
    pretty_line(output, "title\n-----\n", &format!("{}\n\n", note.title), color, tty)?;
    if let Some(ref s) = note.summary {
        pretty_line(output, "summary\n-------\n", &format!("{}\n\n", s), color, tty)?;
    }
    pretty_line(output,
                "created\n-------\n",
                &format!("{}\n\n", localize_timestamp(&note.created_at)),
                color,
                tty)?;
    pretty_line(output,
                "updated\n-------\n",
                &format!("{}\n\n", localize_timestamp(&note.updated_at)),
                color,
                tty)?;
    if !note.content.is_empty() {
        pretty_line(output, "content\n-------\n", &format!("{}\n\n", note.content), color, tty)?;
    }
    Ok(())
}

pub fn render_stats<W: Write>(output: &mut W, stats: &Stats, store: &str, screen: Screen) -> Result<()> {
    let color = screen.theme.palette().accent;
    let tty = screen.tty;
    pretty_line(output, "store: ", &format!("{}\n", store), color, tty)?;
    pretty_line(output, "theme: ", &format!("{}\n", stats.theme), color, tty)?;
    pretty_line(output, "notes: ", &format!("{}\n", stats.notes), color, tty)?;
    if stats.notes > 0 {
        pretty_line(output, "with summary: ", &format!("{}\n", stats.with_summary), color, tty)?;
    }
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        pretty_line(output,
                    "note ages: ",
                    &format!("oldest: {}, newest: {}\n",
                             localize_timestamp(&oldest),
                             localize_timestamp(&newest)),
                    color,
                    tty)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: &str, title: &str, updated_ms: i64) -> Note {
        let mut n = Note::new(id.to_string(), Utc.timestamp_millis_opt(0).unwrap());
        n.title = title.to_string();
        n.updated_at = Utc.timestamp_millis_opt(updated_ms).unwrap();
        n
    }

    fn overview(notes: &[Note], flags: ListFlags) -> String {
        let mut out = Vec::new();
        render_overview(&mut out, notes, flags, Screen::plain(Theme::Light)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_overview_says_so() {
        assert_eq!(overview(&[], ListFlags::default()), "no notes yet\n");
    }

    #[test]
    fn overview_lists_in_order_with_header() {
        let notes = vec![note("2", "second", 2_000), note("1", "first", 1_000)];
        let text = overview(&notes, ListFlags::default());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("#"));
        assert!(lines[0].contains("title"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("1  second"));
        assert!(lines[3].starts_with("2  first"));
    }

    #[test]
    fn sorting_keeps_list_positions() {
        let notes = vec![note("a", "stale", 1_000), note("b", "fresh", 9_000)];
        let flags = ListFlags { updated: true, condensed: true, ..Default::default() };
        let text = overview(&notes, flags);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("2 fresh"));
        assert!(lines[1].starts_with("1 stale"));
    }

    #[test]
    fn limit_caps_rows() {
        let notes = vec![note("a", "one", 1), note("b", "two", 2), note("c", "three", 3)];
        let flags = ListFlags { limit: 2, condensed: true, ..Default::default() };
        assert_eq!(overview(&notes, flags).lines().count(), 2);
    }

    #[test]
    fn content_marker_and_preview() {
        let mut n = note("a", "todo", 1);
        n.content = "buy milk\nand bread".to_string();
        let text = overview(&[n], ListFlags::default());
        assert!(text.contains("todo (+)"));
        assert!(text.contains("buy milk"));
        assert!(!text.contains("and bread"));
    }

    #[test]
    fn yaml_overview_is_parseable() {
        let notes = vec![note("a", "one", 1)];
        let text = overview(&notes, ListFlags { yaml: true, ..Default::default() });
        let parsed: Vec<Note> = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed, notes);
    }

    #[test]
    fn note_view_shows_summary_and_content() {
        let mut n = note("42", "plan", 1);
        n.summary = Some("the gist".to_string());
        n.content = "details".to_string();
        let mut out = Vec::new();
        render_note(&mut out, &n, false, false, Screen::plain(Theme::Dark)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id\n--\n42\n\n"));
        assert!(text.contains("summary\n-------\nthe gist\n"));
        assert!(text.contains("content\n-------\ndetails\n"));
    }
}
