// Quick-pick tempo rows - user-curated shortcut lists for one-tap recall

use serde::{Deserialize, Serialize};

use crate::sequencer::meter::{MAX_BPM, MIN_BPM, Tempo};

/// Numeric entry length cap, matching the widest valid tempo
pub const ENTRY_MAX_DIGITS: usize = 3;

/// Which of the two rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPickRow {
    Top,
    Bottom,
}

/// Rejected user input; the edited entry is left untouched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("enter a number between {min} and {max}", min = MIN_BPM, max = MAX_BPM)]
    NotANumber,

    #[error("{0} is outside the {min}-{max} BPM range", min = MIN_BPM, max = MAX_BPM)]
    OutOfRange(u16),

    #[error("no such quick-pick entry")]
    NoSuchEntry,
}

/// Two independently editable rows of tempos, persisted as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPicks {
    pub row1: Vec<u16>,
    pub row2: Vec<u16>,
}

impl Default for QuickPicks {
    fn default() -> Self {
        Self {
            row1: vec![60, 70, 80, 90, 100, 120],
            row2: vec![60, 70, 80, 90, 100, 120],
        }
    }
}

impl QuickPicks {
    pub fn row(&self, row: QuickPickRow) -> &[u16] {
        match row {
            QuickPickRow::Top => &self.row1,
            QuickPickRow::Bottom => &self.row2,
        }
    }

    fn row_mut(&mut self, row: QuickPickRow) -> &mut Vec<u16> {
        match row {
            QuickPickRow::Top => &mut self.row1,
            QuickPickRow::Bottom => &mut self.row2,
        }
    }

    /// Clamp every entry into the valid range; applied after deserializing
    pub fn sanitized(mut self) -> Self {
        for value in self.row1.iter_mut().chain(self.row2.iter_mut()) {
            *value = Tempo::new(*value).bpm();
        }
        self
    }

    /// Validate a numeric entry and commit it to `row[index]`.
    /// Any failure leaves the prior value in place.
    pub fn commit_edit(
        &mut self,
        row: QuickPickRow,
        index: usize,
        entry: &str,
    ) -> Result<u16, SettingsError> {
        let trimmed = entry.trim();
        if trimmed.is_empty() || trimmed.len() > ENTRY_MAX_DIGITS {
            return Err(SettingsError::NotANumber);
        }

        let value: u16 = trimmed.parse().map_err(|_| SettingsError::NotANumber)?;
        if !(MIN_BPM..=MAX_BPM).contains(&value) {
            return Err(SettingsError::OutOfRange(value));
        }

        let slot = self
            .row_mut(row)
            .get_mut(index)
            .ok_or(SettingsError::NoSuchEntry)?;
        *slot = value;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rows() {
        let picks = QuickPicks::default();
        assert_eq!(picks.row(QuickPickRow::Top), &[60, 70, 80, 90, 100, 120]);
        assert_eq!(picks.row(QuickPickRow::Bottom), &[60, 70, 80, 90, 100, 120]);
    }

    #[test]
    fn test_commit_accepts_in_range() {
        let mut picks = QuickPicks::default();
        assert_eq!(picks.commit_edit(QuickPickRow::Top, 0, "150"), Ok(150));
        assert_eq!(picks.row(QuickPickRow::Top)[0], 150);

        // The other row is untouched
        assert_eq!(picks.row(QuickPickRow::Bottom)[0], 60);
    }

    #[test]
    fn test_commit_rejects_out_of_range() {
        let mut picks = QuickPicks::default();

        assert_eq!(
            picks.commit_edit(QuickPickRow::Top, 1, "19"),
            Err(SettingsError::OutOfRange(19))
        );
        assert_eq!(
            picks.commit_edit(QuickPickRow::Top, 1, "231"),
            Err(SettingsError::OutOfRange(231))
        );

        // Prior value untouched after both rejections
        assert_eq!(picks.row(QuickPickRow::Top)[1], 70);
    }

    #[test]
    fn test_commit_rejects_non_numeric() {
        let mut picks = QuickPicks::default();

        for entry in ["", "  ", "abc", "12a", "-10", "1500"] {
            assert_eq!(
                picks.commit_edit(QuickPickRow::Bottom, 2, entry),
                Err(SettingsError::NotANumber),
                "entry {:?} should be rejected",
                entry
            );
        }
        assert_eq!(picks.row(QuickPickRow::Bottom)[2], 80);
    }

    #[test]
    fn test_commit_rejects_missing_index() {
        let mut picks = QuickPicks::default();
        assert_eq!(
            picks.commit_edit(QuickPickRow::Top, 99, "120"),
            Err(SettingsError::NoSuchEntry)
        );
    }

    #[test]
    fn test_sanitize_clamps_every_entry() {
        let picks = QuickPicks {
            row1: vec![5, 300, 120],
            row2: vec![0, 231],
        };
        let picks = picks.sanitized();
        assert_eq!(picks.row1, vec![MIN_BPM, MAX_BPM, 120]);
        assert_eq!(picks.row2, vec![MIN_BPM, MAX_BPM]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut picks = QuickPicks::default();
        picks.commit_edit(QuickPickRow::Top, 0, "180").unwrap();

        let json = serde_json::to_string(&picks).unwrap();
        let back: QuickPicks = serde_json::from_str(&json).unwrap();
        assert_eq!(back, picks);
    }
}
