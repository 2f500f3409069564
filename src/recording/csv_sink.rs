use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::recorder::SampleSink;
use super::session::Session;
use crate::sampler::{AttentionSample, GazePosition};

/// How the session table is kept up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// Rewrite the whole table each tick (via a temp file and rename)
    ///
    /// The file on disk is always a complete table, at O(n) cost per tick.
    Rewrite,
    /// Append only the rows not yet on disk
    ///
    /// A failed write is rolled back; a crash mid-write can still leave a
    /// truncated last row.
    Append,
}

/// One row of the session table
///
/// Date parts are kept as strings exactly as written (`Oct`, `05`, `14`,
/// `2026`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "gaze_X")]
    pub gaze_x: String,
    #[serde(rename = "gaze_Y")]
    pub gaze_y: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub year: String,
    /// `True` or `False`
    pub looking: String,
    pub confidence: i32,
}

impl CsvRow {
    pub fn is_looking(&self) -> bool {
        self.looking == "True"
    }

    /// Parsed gaze coordinates
    pub fn gaze(&self) -> Result<(f64, f64)> {
        let x = self
            .gaze_x
            .parse()
            .with_context(|| format!("Invalid gaze_X value: {:?}", self.gaze_x))?;
        let y = self
            .gaze_y
            .parse()
            .with_context(|| format!("Invalid gaze_Y value: {:?}", self.gaze_y))?;
        Ok((x, y))
    }
}

impl From<&AttentionSample> for CsvRow {
    fn from(sample: &AttentionSample) -> Self {
        let (gaze_x, gaze_y) = match sample.gaze() {
            GazePosition::Pixel { x, y } => (x.to_string(), y.to_string()),
            GazePosition::Normalized { x, y } => (x.to_string(), y.to_string()),
        };
        let ts = sample.timestamp();

        Self {
            gaze_x,
            gaze_y,
            month: ts.format("%b").to_string(),
            day: ts.format("%d").to_string(),
            hour: ts.format("%H").to_string(),
            year: ts.format("%Y").to_string(),
            looking: if sample.is_attending() { "True" } else { "False" }.to_string(),
            confidence: sample.confidence().as_i32(),
        }
    }
}

/// Read a session table back from disk
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<CsvRow>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open session file: {:?}", path))?;

    reader
        .deserialize()
        .collect::<Result<Vec<CsvRow>, _>>()
        .with_context(|| format!("Failed to parse session file: {:?}", path))
}

/// Streaming-persist sink writing the session table as CSV
pub struct CsvSink {
    path: PathBuf,
    strategy: WriteStrategy,
    /// Rows known to be on disk
    persisted: usize,
    /// Whether this session has created the file yet
    created: bool,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, strategy: WriteStrategy) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }

        info!("CSV sink initialized: {} ({:?})", path.display(), strategy);

        Ok(Self {
            path,
            strategy,
            persisted: 0,
            created: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows currently on disk
    pub fn persisted(&self) -> usize {
        self.persisted
    }

    fn write(&mut self, samples: &[AttentionSample]) -> Result<()> {
        match self.strategy {
            WriteStrategy::Rewrite => self.rewrite(samples),
            WriteStrategy::Append => self.append(samples),
        }
    }

    fn rewrite(&mut self, samples: &[AttentionSample]) -> Result<()> {
        let partial = partial_path(&self.path);

        {
            let mut writer = csv::Writer::from_path(&partial)
                .with_context(|| format!("Failed to create {:?}", partial))?;
            for sample in samples {
                writer
                    .serialize(CsvRow::from(sample))
                    .context("Failed to write CSV row")?;
            }
            writer.flush().context("Failed to flush CSV file")?;
        }

        fs::rename(&partial, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        self.created = true;
        self.persisted = samples.len();
        Ok(())
    }

    fn append(&mut self, samples: &[AttentionSample]) -> Result<()> {
        if self.persisted >= samples.len() {
            return Ok(());
        }

        let mut file = if self.created {
            OpenOptions::new().create(true).append(true).open(&self.path)
        } else {
            File::create(&self.path)
        }
        .with_context(|| format!("Failed to open {:?}", self.path))?;

        let needs_header = file.metadata()?.len() == 0;

        // An empty file mid-session was deleted or rotated: rows written
        // earlier are gone with it, so the whole table goes out again
        let pending = if needs_header && self.persisted > 0 {
            warn!(
                "{} was emptied or replaced, rewriting all {} rows",
                self.path.display(),
                samples.len()
            );
            samples
        } else {
            &samples[self.persisted..]
        };

        // Encode the whole batch before touching the file
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(Vec::new());
        for sample in pending {
            writer
                .serialize(CsvRow::from(sample))
                .context("Failed to encode CSV row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to encode CSV rows: {}", e.error()))?;

        append_all(&mut file, &bytes)
            .with_context(|| format!("Failed to append to {:?}", self.path))?;

        debug!("Appended {} rows to {}", pending.len(), self.path.display());

        self.created = true;
        self.persisted = samples.len();
        Ok(())
    }
}

/// File that can be cut back to an earlier length
trait AppendTarget: Write {
    fn len(&self) -> std::io::Result<u64>;

    fn truncate(&mut self, len: u64) -> std::io::Result<()>;
}

impl AppendTarget for File {
    fn len(&self) -> std::io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len)
    }
}

/// Write `bytes` at the end of `target`, or leave it as it was
///
/// A write that fails partway is cut back off, so a torn row never sits in
/// front of the rows the next append writes.
fn append_all<T: AppendTarget>(target: &mut T, bytes: &[u8]) -> Result<()> {
    let start = target.len()?;

    if let Err(e) = target.write_all(bytes).and_then(|_| target.flush()) {
        target
            .truncate(start)
            .with_context(|| format!("Failed to roll back partial write ({})", e))?;
        return Err(e.into());
    }

    Ok(())
}

impl SampleSink for CsvSink {
    fn on_sample(&mut self, session: &Session) -> Result<()> {
        self.write(session.samples())
    }

    fn finish(&mut self, session: &Session) -> Result<()> {
        if session.is_empty() && !self.created {
            info!("No samples recorded, {} not written", self.path.display());
            return Ok(());
        }

        if self.persisted < session.len() {
            info!(
                "Catching up {} unsaved samples",
                session.len() - self.persisted
            );
            self.write(session.samples())?;
        }

        info!(
            "Session saved: {} ({} rows)",
            self.path.display(),
            self.persisted
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "CSV"
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// In-memory file that accepts `capacity` bytes in total, then fails
    struct LimitedFile {
        data: Vec<u8>,
        capacity: usize,
    }

    impl Write for LimitedFile {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity.saturating_sub(self.data.len());
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
            }
            let n = room.min(buf.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl AppendTarget for LimitedFile {
        fn len(&self) -> io::Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_torn_append_is_rolled_back() {
        let header = b"gaze_X,gaze_Y\n".to_vec();
        let mut file = LimitedFile {
            data: header.clone(),
            capacity: header.len() + 10,
        };

        let result = append_all(&mut file, b"800,450,Mar,05,14,2026,True,3\n");

        assert!(result.is_err());
        assert_eq!(file.data, header, "partial row must not stay in the file");

        // Once space frees up the next append lands cleanly after the header
        file.capacity = usize::MAX;
        append_all(&mut file, b"800,450,Mar,05,14,2026,True,3\n").unwrap();
        assert_eq!(
            String::from_utf8(file.data).unwrap(),
            "gaze_X,gaze_Y\n800,450,Mar,05,14,2026,True,3\n"
        );
    }

    #[test]
    fn test_complete_append_keeps_everything() {
        let mut file = LimitedFile {
            data: Vec::new(),
            capacity: usize::MAX,
        };

        append_all(&mut file, b"a,b\n").unwrap();
        append_all(&mut file, b"1,2\n").unwrap();

        assert_eq!(file.data, b"a,b\n1,2\n");
    }

    #[test]
    fn test_partial_path_keeps_extension() {
        assert_eq!(
            partial_path(Path::new("out/data1.csv")),
            PathBuf::from("out/data1.csv.partial")
        );
    }

    #[test]
    fn test_row_looking_flag() {
        let row = CsvRow {
            gaze_x: "812".to_string(),
            gaze_y: "-3".to_string(),
            month: "Oct".to_string(),
            day: "05".to_string(),
            hour: "14".to_string(),
            year: "2026".to_string(),
            looking: "False".to_string(),
            confidence: 0,
        };

        assert!(!row.is_looking());
        assert_eq!(row.gaze().unwrap(), (812.0, -3.0));
    }
}
