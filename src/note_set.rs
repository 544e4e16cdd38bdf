use std::{fmt, str::FromStr};

use crate::error::NoteAppError;

/*
    The two built-in note lists. Constant reference data: a run always shuffles a copy.

    NOTE: Sharps and flats are listed separately even where they name the same pitch (A# and Bb, ...).
        This is intentional; an ear-training run should ask for both spellings.
*/

const NATURAL_NOTES: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

const ALL_NOTES: [&str; 17] = [
    "A", "A#", "Bb", "B", "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSet {
    Natural,
    All,
}

impl NoteSet {
    pub fn notes(&self) -> &'static [&'static str] {
        match self {
            NoteSet::Natural => &NATURAL_NOTES,
            NoteSet::All => &ALL_NOTES,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NoteSet::Natural => "Natural Notes",
            NoteSet::All => "All Notes",
        }
    }

    // Owned copy for handing over to the sequencer thread
    pub fn to_vec(&self) -> Vec<String> {
        self.notes().iter().map(|n| n.to_string()).collect()
    }
}

impl fmt::Display for NoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for NoteSet {
    type Err = NoteAppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "natural" | "naturals" | "n" => Ok(NoteSet::Natural),
            "all" | "a" => Ok(NoteSet::All),
            other => Err(NoteAppError::UnknownNoteSet(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::NoteSet;

    #[test]
    fn natural_set_test() {
        assert_eq!(NoteSet::Natural.notes(), &["A", "B", "C", "D", "E", "F", "G"]);
    }

    #[test]
    fn all_set_keeps_enharmonic_spellings() {
        let notes = NoteSet::All.notes();
        assert_eq!(notes.len(), 17);

        // No string appears twice, but both spellings of each pair are there
        let unique: HashSet<&&str> = notes.iter().collect();
        assert_eq!(unique.len(), 17);
        for pair in [("A#", "Bb"), ("C#", "Db"), ("D#", "Eb"), ("F#", "Gb"), ("G#", "Ab")] {
            assert!(notes.contains(&pair.0), "missing {}", pair.0);
            assert!(notes.contains(&pair.1), "missing {}", pair.1);
        }

        for natural in NoteSet::Natural.notes() {
            assert!(notes.contains(natural));
        }
    }

    #[test]
    fn parse_test() {
        assert_eq!("all".parse::<NoteSet>().unwrap(), NoteSet::All);
        assert_eq!(" Natural ".parse::<NoteSet>().unwrap(), NoteSet::Natural);
        assert_eq!("n".parse::<NoteSet>().unwrap(), NoteSet::Natural);
        assert!("sharps".parse::<NoteSet>().is_err());
    }

    #[test]
    fn to_vec_is_a_copy() {
        let mut copy = NoteSet::Natural.to_vec();
        copy.clear();
        assert_eq!(NoteSet::Natural.notes().len(), 7);
    }
}
