use std::io::Write;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::lineformat::LineFormat;
use crate::utils::{format_field, localize_timestamp, preview};

/// title given to freshly created notes
pub static DEFAULT_TITLE: &str = "New Note";

/// A single note. Field names are camelCase on disk so the stored array
/// reads the same as the record it mirrors.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a note. Fields left as `None` are untouched;
/// `summary: Some(None)` clears the summary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<Option<String>>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.summary.is_none()
    }
}

/// current time at the precision notes are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Millisecond timestamp id, bumped forward until it is not taken.
pub fn new_note_id(now: DateTime<Utc>, notes: &[Note]) -> String {
    let mut candidate = now.timestamp_millis();
    while notes.iter().any(|n| n.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

impl Note {
    pub fn new(id: String, now: DateTime<Utc>) -> Note {
        Note {
            id,
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// merge a patch into the note; `updated_at` moves even if the patch is empty
    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(t) = patch.title {
            self.title = t.replace(['\r', '\n'], "");
        }
        if let Some(c) = patch.content {
            self.content = c;
        }
        if let Some(s) = patch.summary {
            self.summary = s;
        }
        self.updated_at = now;
    }

    /// one overview row
    pub fn write_row<T: Write>(&self,
                               output: &mut T,
                               position: usize,
                               line_format: &LineFormat)
                               -> Result<()> {
        let column_seperator = " ".repeat(line_format.colsep);
        write!(output, "{}", format_field(&position.to_string(), line_format.pos_width, false))?;
        write!(output, "{}", column_seperator)?;
        if !self.content.is_empty() && line_format.title_width > 4 {
            write!(output,
                   "{}",
                   format_field(&self.title, line_format.title_width - 4, true))?;
            write!(output, "{}", format_field(" (+)", 4, false))?;
        } else {
            write!(output,
                   "{}",
                   format_field(&self.title, line_format.title_width, true))?;
        }
        write!(output, "{}", column_seperator)?;
        if line_format.preview_width != 0 {
            write!(output,
                   "{}",
                   format_field(&self.preview(), line_format.preview_width, true))?;
            write!(output, "{}", column_seperator)?;
        }
        writeln!(output,
                 "{}",
                 format_field(&localize_timestamp(&self.updated_at),
                              line_format.updated_width,
                              false))?;
        Ok(())
    }

    /// summary if set, otherwise the first line of content
    pub fn preview(&self) -> String {
        match self.summary {
            Some(ref s) if !s.is_empty() => preview(s),
            _ => preview(&self.content),
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix,
/// e.g. `2024-01-15T10:30:00.000Z`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
