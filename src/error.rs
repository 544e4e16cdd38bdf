/*
    Errors of the surrounding application. The note sequencing itself cannot fail:
        bad interval text falls back silently (see interval.rs).
*/

#[derive(Debug, thiserror::Error)]
pub enum NoteAppError {
    #[error("Unknown note set: '{0}' (expected 'natural' or 'all')")]
    UnknownNoteSet(String),

    #[error("Unknown command: '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Sequencer thread is no longer running")]
    DaemonStopped,

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = NoteAppError> = std::result::Result<T, E>;
