//! Append-only JSON-lines event log.
//!
//! Every [`GradeEvent`] is one line. The file is only ever opened in
//! append mode; nothing is rewritten in place. Reads are full scans that
//! parse lazily, one line at a time.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::domain::GradeEvent;
use crate::error::StoreError;

/// Handle to the event log file.
///
/// Appends from one process are serialised by an internal lock and each
/// record lands with a single `write_all`, so readers see either the old
/// tail or the complete new line.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EventLog {
    /// Creates a handle. The file is created on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event as a complete line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if the event cannot be serialised and
    /// [`StoreError::Io`] if the file cannot be opened or written.
    pub fn append(&self, event: &GradeEvent) -> Result<(), StoreError> {
        let line = encode_line(event)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(&line)
            .and_then(|()| file.flush())
            .map_err(|source| self.io_error(source))?;

        tracing::debug!(path = %self.path.display(), bytes = line.len(), "event appended");
        Ok(())
    }

    /// Starts a fresh scan over every stored event in append order.
    ///
    /// With `name` set, only that student's events are yielded; every line
    /// is still parsed, so a malformed record fails filtered scans too.
    /// A missing log yields nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be opened.
    pub fn scan(&self, name: Option<&str>) -> Result<EventScan, StoreError> {
        let reader = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(self.io_error(source)),
        };
        Ok(EventScan {
            reader,
            path: self.path.clone(),
            name: name.map(str::to_string),
            line: 0,
            buf: String::new(),
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Lazy iterator over the records of one [`EventLog::scan`].
///
/// Stops for good after the first error. A final fragment without a
/// trailing newline is an append still in flight and is not yielded.
#[derive(Debug)]
pub struct EventScan {
    reader: Option<BufReader<File>>,
    path: PathBuf,
    name: Option<String>,
    line: usize,
    buf: String,
}

impl Iterator for EventScan {
    type Item = Result<GradeEvent, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            self.buf.clear();
            match reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {}
                Err(source) => {
                    self.reader = None;
                    return Some(Err(StoreError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            }
            self.line += 1;

            if !self.buf.ends_with('\n') {
                self.reader = None;
                return None;
            }

            let record = self.buf.trim_end_matches(['\n', '\r']);
            let event = match serde_json::from_str::<GradeEvent>(record) {
                Ok(event) => event,
                Err(source) => {
                    self.reader = None;
                    return Some(Err(StoreError::MalformedRecord {
                        path: self.path.clone(),
                        line: self.line,
                        source,
                    }));
                }
            };

            match &self.name {
                Some(name) if *name != event.name => continue,
                _ => return Some(Ok(event)),
            }
        }
    }
}

impl FusedIterator for EventScan {}

/// JSON formatter emitting `", "` and `": "` separators, the layout of
/// existing log files.
#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialises `event` as one newline-terminated log line.
fn encode_line(event: &GradeEvent) -> Result<Vec<u8>, StoreError> {
    let mut line = Vec::with_capacity(160);
    let mut serializer = serde_json::Serializer::with_formatter(&mut line, SpacedFormatter);
    event
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    line.push(b'\n');
    Ok(line)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use super::*;

    fn event(name: &str, lab: u32, points: i64) -> GradeEvent {
        GradeEvent {
            name: name.to_string(),
            lab,
            bonus_points: points,
            comment: vec!["ok".to_string()],
            datetime: "2016-10-01 12:00:00".to_string(),
            timestamp: None,
        }
    }

    fn collect(scan: Result<EventScan, StoreError>) -> Vec<GradeEvent> {
        let Ok(scan) = scan else {
            panic!("scan failed to start");
        };
        let Ok(events) = scan.collect::<Result<Vec<_>, _>>() else {
            panic!("scan failed");
        };
        events
    }

    fn log_in(dir: &tempfile::TempDir) -> EventLog {
        EventLog::new(dir.path().join("db.json"))
    }

    #[test]
    fn missing_log_scans_empty() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        assert!(collect(log_in(&dir).scan(None)).is_empty());
    }

    #[test]
    fn line_layout_matches_existing_logs() {
        let Ok(line) = encode_line(&event("Пётр", 2, 3)) else {
            panic!("encode failed");
        };
        assert_eq!(
            String::from_utf8(line).unwrap_or_default(),
            "{\"name\": \"Пётр\", \"lab\": 2, \"bonus-points\": 3, \"comment\": [\"ok\"], \"datetime\": \"2016-10-01 12:00:00\"}\n"
        );
    }

    #[test]
    fn appends_preserve_order() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let log = log_in(&dir);
        for lab in 1..=3 {
            assert!(log.append(&event("a", lab, 1)).is_ok());
        }
        let labs: Vec<u32> = collect(log.scan(None)).iter().map(|e| e.lab).collect();
        assert_eq!(labs, vec![1, 2, 3]);
    }

    #[test]
    fn scan_filters_by_name() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let log = log_in(&dir);
        let _ = log.append(&event("a", 1, 1));
        let _ = log.append(&event("b", 1, 2));
        let _ = log.append(&event("a", 2, 3));
        let events = collect(log.scan(Some("a")));
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.name == "a"));
    }

    #[test]
    fn scan_is_restartable() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let log = log_in(&dir);
        let _ = log.append(&event("a", 1, 1));
        let first = collect(log.scan(None));
        let _ = log.append(&event("a", 2, 1));
        let second = collect(log.scan(None));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(first[0], second[0]);
    }

    #[test]
    fn malformed_line_aborts_scan() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let log = log_in(&dir);
        let _ = log.append(&event("a", 1, 1));
        let written = fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .and_then(|mut f| f.write_all(b"not json\n"));
        assert!(written.is_ok());
        let _ = log.append(&event("a", 2, 1));

        let Ok(mut scan) = log.scan(Some("a")) else {
            panic!("scan failed to start");
        };
        assert!(matches!(scan.next(), Some(Ok(_))));
        assert!(matches!(
            scan.next(),
            Some(Err(StoreError::MalformedRecord { line: 2, .. }))
        ));
        assert!(scan.next().is_none());
    }

    #[test]
    fn unterminated_tail_is_not_yielded() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let log = log_in(&dir);
        let _ = log.append(&event("a", 1, 1));
        let written = fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .and_then(|mut f| f.write_all(b"{\"name\": \"a\", \"la"));
        assert!(written.is_ok());
        assert_eq!(collect(log.scan(None)).len(), 1);
    }

    #[test]
    fn reads_legacy_compact_records() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let log = log_in(&dir);
        let written = fs::write(
            log.path(),
            "{\"name\":\"a\",\"lab\":1,\"bonus-points\":4,\"comment\":[],\"datetime\":\"2016-10-01 12:00:00\",\"timestamp\":1475323200}\r\n",
        );
        assert!(written.is_ok());
        let events = collect(log.scan(None));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, Some(1_475_323_200));
    }
}
