//! Terminal rendering of a highlighted document

use std::io::Write;

use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, Print, SetAttribute, SetForegroundColor},
};

use crate::document::{Document, RunKind};
use crate::error::Result;
use crate::highlight::Style;

/// Renders documents as styled terminal text
#[derive(Debug, Clone, Default)]
pub struct Display {
    /// Whether to prefix lines with their number
    pub show_line_numbers: bool,
}

impl Display {
    pub fn new(show_line_numbers: bool) -> Self {
        Self { show_line_numbers }
    }

    /// Width of the line-number gutter, separator included
    fn line_number_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let digits = line_count.max(1).to_string().len();
        digits.max(3) + 1 // minimum 3 digits + space
    }

    /// Write the document to `out`, one styled span per run
    pub fn render(&self, doc: &Document, out: &mut impl Write) -> Result<()> {
        let width = self.line_number_width(doc.line_count());
        let mut line = 1;

        self.gutter(out, line, width)?;

        for run in doc.runs() {
            let style = match run.kind() {
                RunKind::Key(style) => Some(style),
                _ => None,
            };

            let mut pieces = run.text().split('\n').peekable();
            while let Some(piece) = pieces.next() {
                if !piece.is_empty() {
                    match style {
                        Some(style) => write_styled(out, piece, &style)?,
                        None => queue!(out, Print(piece))?,
                    }
                }
                if pieces.peek().is_some() {
                    line += 1;
                    queue!(out, Print('\n'))?;
                    self.gutter(out, line, width)?;
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    fn gutter(&self, out: &mut impl Write, line: usize, width: usize) -> Result<()> {
        if width == 0 {
            return Ok(());
        }
        let lnum_str = format!("{:>width$} ", line, width = width - 1);
        queue!(
            out,
            SetAttribute(Attribute::Dim),
            Print(lnum_str),
            SetAttribute(Attribute::NormalIntensity)
        )?;
        Ok(())
    }
}

fn write_styled(out: &mut impl Write, text: &str, style: &Style) -> Result<()> {
    let color = TermColor::Rgb {
        r: style.color.r,
        g: style.color.g,
        b: style.color.b,
    };
    queue!(out, SetForegroundColor(color))?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    queue!(out, Print(text), SetAttribute(Attribute::Reset))?;
    Ok(())
}
