use super::*;
use crate::report::{Report, Section};
use anyhow::{Context, Result};
use colored::*;
use std::io::Write;

pub struct Reporter<W: Write> {
    format: OutputFormat,
    out: W,
    sections_written: usize,
}

impl Reporter<std::io::Stdout> {
    pub fn stdout(format: &str) -> Self {
        Self::new(OutputFormat::from(format), std::io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out,
            sections_written: 0,
        }
    }

    /// Text output is streamed section by section; JSON waits for the whole
    /// report in [`Reporter::finish`].
    pub fn section(&mut self, section: &Section) -> Result<()> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }

        if self.sections_written > 0 {
            writeln!(self.out)?;
        }
        if let Some((left, right)) = &section.header {
            writeln!(self.out, "{}", table_row(left, right).bold())?;
        }
        for (label, value) in &section.rows {
            writeln!(self.out, "{}", table_row(label, &value.to_string()))?;
        }
        self.out.flush()?;

        self.sections_written += 1;
        Ok(())
    }

    pub fn finish(&mut self, report: &Report) -> Result<()> {
        if self.format == OutputFormat::Json {
            let json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            writeln!(self.out, "{}", json)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
