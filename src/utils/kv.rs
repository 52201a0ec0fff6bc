use std::io::{self, Write};
use clap::ValueEnum;

/// How a record is laid out on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KvStyle {
    /// key="value" pairs on one line
    #[default]
    Pair,
    /// bare values on one line
    Value,
    /// one "key | value" line per pair
    Long,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub style: KvStyle,
    /// Print only this key's value.
    pub single_key: Option<String>,
}

/// Ordered list of named string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvRecord {
    pairs: Vec<(String, String)>,
}

impl KvRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

pub fn render<W: Write + ?Sized>(writer: &mut W, config: &RenderConfig, record: &KvRecord) -> io::Result<()> {
    if let Some(key) = &config.single_key {
        if let Some(value) = record.get(key) {
            writeln!(writer, "{}", value)?;
        }
        return Ok(())
    }

    match config.style {
        KvStyle::Pair => {
            let line: Vec<String> = record.pairs().iter().map(|(k, v)| format!("{}=\"{}\"", k, v)).collect();
            writeln!(writer, "{}", line.join(" "))
        }
        KvStyle::Value => {
            let line: Vec<&str> = record.pairs().iter().map(|(_, v)| v.as_str()).collect();
            writeln!(writer, "{}", line.join(" | "))
        }
        KvStyle::Long => {
            for (k, v) in record.pairs() {
                writeln!(writer, "{:<20} | {}", k, v)?;
            }
            writeln!(writer)
        }
    }
}

pub fn render_all<W: Write + ?Sized>(writer: &mut W, config: &RenderConfig, records: &[KvRecord]) -> io::Result<()> {
    for record in records {
        render(writer, config, record)?;
    }
    Ok(())
}
