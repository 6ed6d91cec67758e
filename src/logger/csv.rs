use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use super::{LoggerCommand, PoseLogger};
use crate::error::{Error, Result};
use crate::landmark::VALUES_PER_LANDMARK;
use crate::types::PoseFrame;
use crate::worker::{StopFlag, Worker};

/// Pose logger that accumulates frames in memory and writes them as CSV.
///
/// Each save rewrites the whole file: a header row, then one row per frame
/// holding a wall-clock timestamp followed by `x,y,z,vis` for every
/// landmark, all fixed-precision.
pub struct CsvPoseLogger {
    path: PathBuf,
    commands: Option<Sender<LoggerCommand>>,
}

impl CsvPoseLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvPoseLogger {
            path: path.into(),
            commands: None,
        }
    }

    fn send(&self, command: LoggerCommand) -> Result<()> {
        let commands = self.commands.as_ref().ok_or(Error::LoggerNotStarted)?;
        if commands.send(command).is_err() {
            // The worker already exited (fatal width mismatch, or the
            // producer went away); it saved on its way out.
            log::debug!(
                "logger worker for {} is no longer running",
                self.path.display()
            );
        }
        Ok(())
    }
}

impl PoseLogger for CsvPoseLogger {
    fn start(&mut self, frames: Receiver<PoseFrame>) -> Result<Vec<Worker>> {
        if self.commands.is_some() {
            return Err(Error::LoggerStarted);
        }
        let (cmd_tx, cmd_rx) = unbounded();
        self.commands = Some(cmd_tx);

        let mut table = Table::new(self.path.clone());
        let worker = Worker::spawn("pose-logger", move |stop| {
            accumulate(&mut table, frames, cmd_rx, stop)
        })?;
        Ok(vec![worker])
    }

    fn save(&self) -> Result<()> {
        self.send(LoggerCommand::Save)
    }

    fn close(&self) -> Result<()> {
        self.send(LoggerCommand::Close)
    }
}

fn accumulate(
    table: &mut Table,
    frames: Receiver<PoseFrame>,
    commands: Receiver<LoggerCommand>,
    stop: StopFlag,
) {
    let mut frames_open = true;
    while !stop.is_set() {
        match commands.try_recv() {
            Ok(LoggerCommand::Save) => table.write_or_log(),
            Ok(LoggerCommand::Close) | Err(TryRecvError::Disconnected) => {
                table.drain(&frames);
                table.write_or_log();
                return;
            }
            Err(TryRecvError::Empty) => {}
        }

        if !frames_open {
            thread::sleep(Duration::from_millis(5));
            continue;
        }
        match frames.try_recv() {
            Ok(frame) => {
                if let Err(err) = table.append(&frame) {
                    // Fatal for this logger: the column layout was fixed by
                    // the first frame. Keep what was accumulated.
                    log::error!("pose logger stopping: {err}");
                    table.write_or_log();
                    return;
                }
            }
            Err(TryRecvError::Empty) => thread::yield_now(),
            Err(TryRecvError::Disconnected) => frames_open = false,
        }
    }
}

struct Table {
    path: PathBuf,
    /// Column count, fixed by the first frame received.
    width: Option<usize>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    fn new(path: PathBuf) -> Self {
        Table {
            path,
            width: None,
            rows: Vec::new(),
        }
    }

    fn append(&mut self, frame: &PoseFrame) -> Result<()> {
        let mut row = Vec::with_capacity(frame.len() * VALUES_PER_LANDMARK + 1);
        row.push(Utc::now().timestamp_micros() as f64 / 1_000_000.0);
        row.extend(frame.flatten().iter().map(|&value| value as f64));

        let width = *self.width.get_or_insert(row.len());
        if row.len() != width {
            return Err(Error::WidthMismatch {
                expected: width,
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    fn drain(&mut self, frames: &Receiver<PoseFrame>) {
        while let Ok(frame) = frames.try_recv() {
            if let Err(err) = self.append(&frame) {
                log::error!("pose logger dropping tail: {err}");
                break;
            }
        }
    }

    fn write(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", header(self.width.unwrap_or(1)))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|value| format!("{value:.5}")).collect();
            writeln!(out, "{}", cells.join(","))?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_or_log(&self) {
        if let Err(err) = self.write() {
            log::error!("failed to write {}: {err}", self.path.display());
        }
    }
}

fn header(width: usize) -> String {
    let mut fields = vec!["timestamp".to_string()];
    for i in 0..width.saturating_sub(1) / VALUES_PER_LANDMARK {
        fields.push(format!("x{i:02}"));
        fields.push(format!("y{i:02}"));
        fields.push(format!("z{i:02}"));
        fields.push(format!("vis{i:02}"));
    }
    fields.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;

    #[test]
    fn header_names_every_flattened_field() {
        assert_eq!(
            header(1 + 2 * VALUES_PER_LANDMARK),
            "timestamp,x00,y00,z00,vis00,x01,y01,z01,vis01"
        );
    }

    #[test]
    fn width_is_locked_by_the_first_frame() {
        let mut table = Table::new(PathBuf::from("unused.csv"));
        table
            .append(&PoseFrame::from_landmarks(vec![Landmark::default(); 3]))
            .unwrap();
        let err = table
            .append(&PoseFrame::from_landmarks(vec![Landmark::default(); 2]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::WidthMismatch {
                expected: 13,
                got: 9
            }
        ));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn rows_are_fixed_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut table = Table::new(path.clone());
        table
            .append(&PoseFrame::from_landmarks(vec![Landmark::new(
                1.5, -0.25, 0.0, 1.0,
            )]))
            .unwrap();
        table.write().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert!(row.ends_with("1.50000,-0.25000,0.00000,1.00000"));
    }
}
