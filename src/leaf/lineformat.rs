use std::cmp::{max, min};

use crate::note::Note;

/// width of a localized `%F %T` timestamp
const UPDATED_WIDTH: usize = 19;
/// titles never shrink below this when squeezing into a terminal
const MIN_TITLE_WIDTH: usize = 12;
/// previews are dropped rather than shown narrower than this
const MIN_PREVIEW_WIDTH: usize = 10;
const MAX_PREVIEW_WIDTH: usize = 40;

/// Column widths for the overview table.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFormat {
    pub colsep: usize,
    pub pos_width: usize,
    pub title_width: usize,
    pub preview_width: usize,
    pub updated_width: usize,
}

impl LineFormat {
    /// Size columns for `notes`. `console_width` of 0 means unknown, in
    /// which case nothing is squeezed.
    pub fn new(notes: &[Note], condensed: bool, console_width: usize) -> LineFormat {
        let colsep = if condensed { 1 } else { 2 };
        let pos_width = max(notes.len().to_string().len(), "#".len());

        let mut title_width = notes.iter()
                                   .map(|n| {
                                       let extra = if n.content.is_empty() { 0 } else { 4 };
                                       n.title.chars().count() + extra
                                   })
                                   .max()
                                   .unwrap_or(0);
        title_width = max(title_width, "title".len());

        let mut preview_width = if condensed {
            0
        } else {
            let widest = notes.iter().map(|n| n.preview().chars().count()).max().unwrap_or(0);
            if widest == 0 { 0 } else { min(max(widest, "preview".len()), MAX_PREVIEW_WIDTH) }
        };

        let mut line_format = LineFormat {
            colsep,
            pos_width,
            title_width,
            preview_width,
            updated_width: UPDATED_WIDTH,
        };

        if console_width > 0 && line_format.line_width() > console_width {
            let overflow = line_format.line_width() - console_width;
            if preview_width > 0 {
                let shrunk = preview_width.saturating_sub(overflow);
                preview_width = if shrunk < MIN_PREVIEW_WIDTH { 0 } else { shrunk };
                line_format.preview_width = preview_width;
            }
            if line_format.line_width() > console_width {
                let overflow = line_format.line_width() - console_width;
                // a title already under the minimum is left as is
                title_width = max(title_width.saturating_sub(overflow),
                                  min(title_width, MIN_TITLE_WIDTH));
                line_format.title_width = title_width;
            }
        }
        line_format
    }

    pub fn line_width(&self) -> usize {
        let columns = if self.preview_width == 0 { 3 } else { 4 };
        self.pos_width + self.title_width + self.preview_width + self.updated_width
            + self.colsep * (columns - 1)
    }
}
