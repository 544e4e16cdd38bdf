use std::collections::VecDeque;

use log::{debug, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::config::DEFAULT_INTERVAL_MS;

/*

    Note reveal sequencer. Goal is a class that is:
        1. Isolated and well-tested
        2. Unaware of time (ticks are delivered from outside, see sequencing_daemon.rs)
        3. Unaware of presentation (notes go out through NoteDisplay)

    A run: start() shuffles a copy of the notes and reveals the first one immediately. Every later
        advance() reveals the next one in shuffle order. The first advance() that finds nothing left
        reports completion once and asks the caller to disarm its timer.

*/

// Presentation hooks, implemented by whoever shows notes to the user
pub trait NoteDisplay {
    fn on_note_revealed(&mut self, note: &str);
    fn on_sequence_completed(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerStatus {
    Idle,
    Running,
    Exhausted,
}

// What the periodic trigger should do after a start/advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Disarm,
}

pub struct NoteSequencer<R: Rng = StdRng> {
    remaining: VecDeque<String>,
    interval_ms: u64,
    status: SequencerStatus,
    rng: R,
}

impl NoteSequencer<StdRng> {
    pub fn new() -> NoteSequencer<StdRng> {
        NoteSequencer::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> NoteSequencer<R> {

    pub fn with_rng(rng: R) -> NoteSequencer<R> {
        NoteSequencer {
            remaining: VecDeque::new(),
            interval_ms: DEFAULT_INTERVAL_MS,
            status: SequencerStatus::Idle,
            rng,
        }
    }

    /*
        Replaces whatever run was going on. The given notes are copied, never mutated.
        Returns the outcome of revealing the first note: Disarm only for an empty note list.
    */
    pub fn start<S: AsRef<str>>(
        &mut self,
        notes: &[S],
        interval_ms: u64,
        display: &mut impl NoteDisplay,
    ) -> TickOutcome {

        // Callers are expected to pass through configure_interval first
        self.interval_ms = if interval_ms == 0 {
            warn!("Zero interval passed to sequencer, using {} ms", DEFAULT_INTERVAL_MS);
            DEFAULT_INTERVAL_MS
        } else {
            interval_ms
        };

        let mut shuffled: Vec<String> = notes.iter().map(|n| n.as_ref().to_string()).collect();
        shuffled.shuffle(&mut self.rng);

        info!("Starting run of {} notes, interval {} ms", shuffled.len(), self.interval_ms);

        self.remaining = VecDeque::from(shuffled);
        self.status = SequencerStatus::Running;

        self.advance(display)
    }

    pub fn advance(&mut self, display: &mut impl NoteDisplay) -> TickOutcome {

        // Finished or stopped sequencers stay silent
        if self.status != SequencerStatus::Running {
            return TickOutcome::Disarm;
        }

        match self.remaining.pop_front() {
            Some(note) => {
                debug!("Revealing {} ({} left)", note, self.remaining.len());
                display.on_note_revealed(&note);
                TickOutcome::Continue
            }
            None => {
                info!("All notes displayed");
                self.status = SequencerStatus::Exhausted;
                display.on_sequence_completed();
                TickOutcome::Disarm
            }
        }
    }

    pub fn stop(&mut self) {
        if self.status == SequencerStatus::Running {
            info!("Run stopped with {} notes left", self.remaining.len());
        }
        self.remaining.clear();
        self.status = SequencerStatus::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.status == SequencerStatus::Running
    }

    #[cfg(test)]
    fn status(&self) -> SequencerStatus {
        self.status
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::{NoteDisplay, NoteSequencer, SequencerStatus, TickOutcome};
    use crate::note_set::NoteSet;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Shown {
        Note(String),
        Completed,
    }

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Vec<Shown>,
    }

    impl RecordingDisplay {
        fn notes(&self) -> Vec<String> {
            self.shown.iter()
                .filter_map(|s| match s { Shown::Note(n) => Some(n.clone()), Shown::Completed => None })
                .collect()
        }

        fn completions(&self) -> usize {
            self.shown.iter().filter(|s| **s == Shown::Completed).count()
        }
    }

    impl NoteDisplay for RecordingDisplay {
        fn on_note_revealed(&mut self, note: &str) {
            self.shown.push(Shown::Note(note.to_string()));
        }

        fn on_sequence_completed(&mut self) {
            self.shown.push(Shown::Completed);
        }
    }

    fn seeded(seed: u64) -> NoteSequencer<StdRng> {
        NoteSequencer::with_rng(StdRng::seed_from_u64(seed))
    }

    fn sorted(mut notes: Vec<String>) -> Vec<String> {
        notes.sort();
        notes
    }

    // Ticks until the sequencer asks to be disarmed
    fn drain(sequencer: &mut NoteSequencer<StdRng>, display: &mut RecordingDisplay) {
        let mut ticks = 0;
        while sequencer.advance(display) == TickOutcome::Continue {
            ticks += 1;
            assert!(ticks < 100, "sequencer never finished");
        }
    }

    #[test]
    fn three_note_run_test() {
        let mut sequencer = seeded(1);
        let mut display = RecordingDisplay::default();

        assert_eq!(sequencer.start(&["A", "B", "C"], 1000, &mut display), TickOutcome::Continue);

        // First note shows up at start, before any tick
        assert_eq!(display.shown.len(), 1);
        assert!(["A", "B", "C"].contains(&display.notes()[0].as_str()));
        assert_eq!(sequencer.remaining(), 2);

        assert_eq!(sequencer.advance(&mut display), TickOutcome::Continue);
        assert_eq!(sequencer.advance(&mut display), TickOutcome::Continue);
        assert_eq!(display.notes().len(), 3);
        assert_eq!(display.completions(), 0);

        assert_eq!(sequencer.advance(&mut display), TickOutcome::Disarm);
        assert_eq!(display.completions(), 1);
        assert_eq!(display.shown.last(), Some(&Shown::Completed));
        assert_eq!(sorted(display.notes()), vec!["A", "B", "C"]);
        assert_eq!(sequencer.status(), SequencerStatus::Exhausted);
        assert!(!sequencer.is_running());
    }

    #[test]
    fn full_run_emits_every_note_once() {
        for note_set in [NoteSet::Natural, NoteSet::All] {
            for seed in 0..20 {
                let mut sequencer = seeded(seed);
                let mut display = RecordingDisplay::default();

                sequencer.start(note_set.notes(), 1000, &mut display);
                drain(&mut sequencer, &mut display);

                let expected: Vec<String> = sorted(note_set.to_vec());
                assert_eq!(sorted(display.notes()), expected);
                assert_eq!(display.completions(), 1);

                // Completion only after exactly len(notes) reveals
                let completed_at = display.shown.iter().position(|s| *s == Shown::Completed).unwrap();
                assert_eq!(completed_at, note_set.notes().len());
            }
        }
    }

    #[test]
    fn advance_after_completion_is_silent() {
        let mut sequencer = seeded(7);
        let mut display = RecordingDisplay::default();

        sequencer.start(&["A"], 1000, &mut display);
        assert_eq!(sequencer.advance(&mut display), TickOutcome::Disarm);
        assert_eq!(sequencer.advance(&mut display), TickOutcome::Disarm);
        assert_eq!(sequencer.advance(&mut display), TickOutcome::Disarm);

        assert_eq!(display.shown, vec![Shown::Note("A".to_string()), Shown::Completed]);
    }

    #[test]
    fn advance_before_start_does_nothing() {
        let mut sequencer = seeded(7);
        let mut display = RecordingDisplay::default();

        assert_eq!(sequencer.advance(&mut display), TickOutcome::Disarm);
        assert!(display.shown.is_empty());
        assert_eq!(sequencer.status(), SequencerStatus::Idle);
    }

    #[test]
    fn empty_note_list_completes_immediately() {
        let mut sequencer = seeded(3);
        let mut display = RecordingDisplay::default();
        let empty: [&str; 0] = [];

        assert_eq!(sequencer.start(&empty, 1000, &mut display), TickOutcome::Disarm);
        assert_eq!(display.shown, vec![Shown::Completed]);
    }

    #[test]
    fn restart_replaces_previous_run() {
        let mut sequencer = seeded(11);
        let mut display = RecordingDisplay::default();

        sequencer.start(NoteSet::All.notes(), 1000, &mut display);
        sequencer.advance(&mut display);
        assert_eq!(sequencer.remaining(), 15);

        let mut second = RecordingDisplay::default();
        sequencer.start(&["X", "Y"], 2000, &mut second);
        assert_eq!(sequencer.interval_ms(), 2000);
        drain(&mut sequencer, &mut second);

        assert_eq!(sorted(second.notes()), vec!["X", "Y"]);
        assert_eq!(second.completions(), 1);
        // Nothing from the first run leaked into the second
        assert_eq!(display.shown.len(), 2);
    }

    #[test]
    fn stop_test() {
        let mut sequencer = seeded(5);
        let mut display = RecordingDisplay::default();

        sequencer.stop();
        assert_eq!(sequencer.status(), SequencerStatus::Idle);

        sequencer.start(NoteSet::Natural.notes(), 1000, &mut display);
        sequencer.stop();
        assert_eq!(sequencer.remaining(), 0);
        assert_eq!(sequencer.advance(&mut display), TickOutcome::Disarm);
        assert_eq!(display.shown.len(), 1);
        assert_eq!(display.completions(), 0);

        sequencer.stop();
        assert_eq!(sequencer.status(), SequencerStatus::Idle);
    }

    #[test]
    fn zero_interval_uses_default() {
        let mut sequencer = seeded(5);
        let mut display = RecordingDisplay::default();
        sequencer.start(&["A"], 0, &mut display);
        assert_eq!(sequencer.interval_ms(), crate::config::DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn shuffle_is_not_degenerate() {
        let mut sequencer = NoteSequencer::new();
        let mut first_notes = HashSet::new();

        for _ in 0..200 {
            let mut display = RecordingDisplay::default();
            sequencer.start(NoteSet::Natural.notes(), 1000, &mut display);
            first_notes.insert(display.notes()[0].clone());
        }

        // 200 runs all starting on the same note would be a (1/7)^199 fluke
        assert!(first_notes.len() > 1);
    }

    #[test]
    fn source_list_untouched() {
        let notes = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
        let mut sequencer = seeded(9);
        let mut display = RecordingDisplay::default();

        sequencer.start(notes.as_slice(), 1000, &mut display);
        drain(&mut sequencer, &mut display);

        assert_eq!(notes, vec!["A", "B", "C", "D"]);
    }
}
