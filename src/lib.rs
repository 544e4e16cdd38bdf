pub mod config;
pub mod console;
pub mod error;
pub mod interval;
pub mod local_messaging;
pub mod note_set;
pub mod sequencer;
pub mod sequencing_daemon;
