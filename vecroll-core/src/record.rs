//! Types and traits for reporting evaluation metrics.
//!
//! A [`Record`] is a set of named values. The evaluator emits one record per
//! episode and one for the whole run, and hands them to a [`Recorder`], which
//! forwards them to a tracking sink such as TensorBoard.
//!
//! ```rust
//! use vecroll_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("mean_return", 7.0);
//! record.insert("episode", RecordValue::Scalar(0.0));
//! assert_eq!(record.get_scalar("mean_return").unwrap(), 7.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
