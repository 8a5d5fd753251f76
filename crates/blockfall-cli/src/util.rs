use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of JSON records: a file when a path is given, stdout otherwise.
pub(crate) struct JsonOutput {
    writer: Box<dyn Write>,
    name: String,
}

impl JsonOutput {
    pub(crate) fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                name: "stdout".to_owned(),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            name: path.display().to_string(),
        })
    }

    /// Writes `value` as pretty-printed JSON.
    pub(crate) fn write_pretty<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.end_record()
    }

    /// Writes `value` as one line of JSON.
    pub(crate) fn write_line<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.end_record()
    }

    fn end_record(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer)
            .with_context(|| format!("Failed to write newline after JSON to {}", self.name))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", self.name))
    }
}

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {} JSON file: {}", file_kind, path.display()))
}
