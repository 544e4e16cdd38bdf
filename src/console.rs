/*
    Terminal front end. Stands in for the window of the desktop version: a prompt line, an interval
        "text box" that starts at 10 and two start buttons (all/natural) plus exit.
*/

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use log::{error, info};

use crate::{
    config,
    error::{NoteAppError, Result},
    interval::{configure_interval, seconds_text},
    note_set::NoteSet,
    sequencer::NoteDisplay,
    sequencing_daemon::SequencingDaemon,
};

const HELP: &str = "Commands:
  all                 start with all notes (sharps and flats included)
  natural             start with natural notes only
  interval <seconds>  set the time between notes
  stop                stop the current run
  help                show this list
  exit                quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start(NoteSet),
    // Raw text, validated only when a run starts
    Interval(String),
    Stop,
    Help,
    Exit,
}

impl FromStr for ConsoleCommand {
    type Err = NoteAppError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "interval" | "i" => Ok(ConsoleCommand::Interval(rest.to_string())),
            "stop" | "s" => Ok(ConsoleCommand::Stop),
            "help" | "h" | "?" => Ok(ConsoleCommand::Help),
            "exit" | "quit" | "q" => Ok(ConsoleCommand::Exit),
            other => other.parse::<NoteSet>()
                .map(ConsoleCommand::Start)
                .map_err(|_| NoteAppError::UnknownCommand(line.to_string())),
        }
    }
}

// Whatever can run a note sequence for the console
pub trait RunControl {
    fn start_run(&mut self, notes: Vec<String>, interval_ms: u64) -> Result<()>;
    fn stop_run(&mut self) -> Result<()>;
}

impl RunControl for SequencingDaemon {
    fn start_run(&mut self, notes: Vec<String>, interval_ms: u64) -> Result<()> {
        SequencingDaemon::start_run(self, notes, interval_ms)
    }

    fn stop_run(&mut self) -> Result<()> {
        SequencingDaemon::stop_run(self)
    }
}

// Prints notes as they come, runs on the sequencing thread
pub struct ConsoleDisplay<W: Write> {
    out: W,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> ConsoleDisplay<W> {
        ConsoleDisplay { out }
    }

    fn show(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            error!("Failed to display '{}': {}", text, e);
        }
    }
}

impl<W: Write> NoteDisplay for ConsoleDisplay<W> {
    fn on_note_revealed(&mut self, note: &str) {
        self.show(note);
    }

    fn on_sequence_completed(&mut self) {
        self.show(config::COMPLETION_MESSAGE);
    }
}

pub struct Console<C: RunControl> {
    control: C,
    interval_text: String,
}

impl<C: RunControl> Console<C> {
    pub fn new(control: C, interval_text: String) -> Console<C> {
        Console { control, interval_text }
    }

    // Interval text is re-read on every start, like pressing a button next to the text box
    pub fn start_run(&mut self, note_set: NoteSet) -> Result<()> {
        let interval_ms = configure_interval(&self.interval_text);
        info!("Starting {} every {} s", note_set, seconds_text(interval_ms));
        self.control.start_run(note_set.to_vec(), interval_ms)
    }

    // Returns false on exit
    pub fn execute(&mut self, command: ConsoleCommand, out: &mut impl Write) -> Result<bool> {
        match command {
            ConsoleCommand::Start(note_set) => self.start_run(note_set)?,
            ConsoleCommand::Interval(text) => {
                writeln!(out, "Interval: {} seconds", seconds_text(configure_interval(&text)))?;
                self.interval_text = text;
            }
            ConsoleCommand::Stop => self.control.stop_run()?,
            ConsoleCommand::Help => writeln!(out, "{}", HELP)?,
            ConsoleCommand::Exit => return Ok(false),
        }
        Ok(true)
    }

    /*
        Prints the prompt, then starts the initial run if one was picked up front. In that order:
            the first note is printed from the sequencing thread and must land below the prompt.
    */
    pub fn begin(&mut self, initial: Option<NoteSet>, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", config::START_PROMPT)?;
        writeln!(out, "Interval: {} seconds (type 'help' for commands)", seconds_text(configure_interval(&self.interval_text)))?;
        out.flush()?;

        match initial {
            Some(note_set) => self.start_run(note_set),
            None => Ok(()),
        }
    }

    /*
        Reads commands line by line until exit or end of input. Unknown commands are reported
            and skipped, anything else that fails ends the session.
    */
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ConsoleCommand>() {
                Ok(command) => {
                    if !self.execute(command, &mut *out)? {
                        break;
                    }
                }
                Err(e) => writeln!(out, "{}", e)?,
            }
        }

        self.control.stop_run()
    }

    pub fn into_control(self) -> C {
        self.control
    }
}
