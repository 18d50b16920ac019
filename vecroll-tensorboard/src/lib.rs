//! Writes evaluation records to TFRecord files readable by TensorBoard.
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;
use vecroll_core::record::{Record, RecordValue, Recorder};

/// Write records to TFRecord.
///
/// The step of a record is read from the scalar at `step_key` (`"episode"` by
/// default). Records without it, such as the run-level `overall/*` statistics,
/// are written at the last step seen.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    last_step: usize,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "episode".to_string(),
            last_step: 0,
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] that panics on values other than
    /// scalars.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            ignore_unsupported_value: false,
            ..Self::new(logdir)
        }
    }

    /// Sets the key holding the step of a record.
    pub fn step_key(mut self, key: impl Into<String>) -> Self {
        self.step_key = key.into();
        self
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// This method handles [RecordValue::Scalar] in the [Record].
    /// Other variants will be ignored.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => self.last_step,
        };
        self.last_step = step;

        for (k, v) in record.iter() {
            if *k != self.step_key {
                match v {
                    RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                    _ => {
                        if !self.ignore_unsupported_value {
                            panic!("Unsupported value: {:?}", (k, v));
                        }
                        log::trace!("Skipped {} in TensorboardRecorder", k);
                    }
                };
            }
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_write_creates_event_file() {
        let dir = TempDir::new("tensorboard_recorder").unwrap();
        let mut recorder = TensorboardRecorder::new(dir.path());

        let mut record = Record::from_scalar("mean_return", 1.5);
        record.insert("episode", RecordValue::Scalar(3.0));
        record.insert("returns", RecordValue::Array1(vec![1.0, 2.0]));
        recorder.write(record);
        recorder.write(Record::from_scalar("overall/mean_return", 1.5));
        recorder.flush();

        assert_eq!(recorder.last_step, 3);
        // The event file is written by a background thread joined on drop.
        drop(recorder);
        let n_files = std::fs::read_dir(dir.path()).unwrap().count();
        assert!(n_files > 0);
    }
}
