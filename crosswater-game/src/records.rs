//! Best completion time across sessions.
use log::info;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BestTime {
    pub elapsed: Duration,
}

impl BestTime {
    #[must_use]
    pub const fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }
}

impl fmt::Display for BestTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_centis = self.elapsed.as_millis() / 10;
        let minutes = total_centis / 6000;
        let seconds = (total_centis / 100) % 60;
        let centis = total_centis % 100;
        write!(f, "{minutes:02}:{seconds:02}.{centis:02}")
    }
}

/// Persistence for the best time.
/// Platform-specific implementations decide where it lives.
pub trait RecordStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stored best time, if one was ever recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load_best(&self) -> Result<Option<BestTime>, Self::Error>;

    /// Overwrite the stored best time.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_best(&self, best: &BestTime) -> Result<(), Self::Error>;
}

/// In-process store; clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    best: Rc<RefCell<Option<BestTime>>>,
}

impl RecordStore for MemoryRecordStore {
    type Error = Infallible;

    fn load_best(&self) -> Result<Option<BestTime>, Self::Error> {
        Ok(*self.best.borrow())
    }

    fn save_best(&self, best: &BestTime) -> Result<(), Self::Error> {
        *self.best.borrow_mut() = Some(*best);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum RecordUpdate {
    FirstRecord { best: BestTime },
    Improved { previous: BestTime, best: BestTime },
    /// The stored time was as fast or faster and stays.
    Kept { best: BestTime },
}

impl RecordUpdate {
    #[must_use]
    pub const fn best(&self) -> BestTime {
        match self {
            Self::FirstRecord { best } | Self::Improved { best, .. } | Self::Kept { best } => *best,
        }
    }
}

/// Store `elapsed` if it beats the current record.
///
/// # Errors
///
/// Returns the store's error if loading or saving fails.
pub fn record_win<S: RecordStore>(store: &S, elapsed: Duration) -> Result<RecordUpdate, S::Error> {
    let candidate = BestTime::new(elapsed);
    let update = match store.load_best()? {
        None => RecordUpdate::FirstRecord { best: candidate },
        Some(previous) if candidate < previous => RecordUpdate::Improved {
            previous,
            best: candidate,
        },
        Some(best) => return Ok(RecordUpdate::Kept { best }),
    };
    store.save_best(&update.best())?;
    info!("new best time {}", update.best());
    Ok(update)
}
