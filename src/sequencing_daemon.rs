/*

    The periodic trigger for the note sequencer. A dedicated thread that:
        - drains host messages (start, stop, shutdown)
        - fires the armed trigger once per interval, advancing the sequencer
        - sleeps TICK_TIME_US between loops

    Everything touching the sequencer happens on this one thread, so ticks never overlap. Host
        messages are handled at the top of each loop before the trigger is checked: a restart
        disarms the old trigger before it can fire again, so no note of an abandoned run shows
        up after the new run started.

*/

use std::thread::{self, JoinHandle};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use rand::Rng;
use ringbuf::traits::{Consumer, Producer};

use crate::{
    config,
    error::{NoteAppError, Result},
    local_messaging::{create_message_channel, LocalSequencerMessage, MessageConsumer, MessageProducer, StartPayload},
    sequencer::{NoteDisplay, NoteSequencer, TickOutcome},
};

/*
    Fixed-period trigger that can be armed and disarmed. Clock-free: callers pass in "now".
*/
pub struct PeriodicTrigger {
    period: Option<Duration>,
    next_fire: Option<DateTime<Utc>>,
}

impl PeriodicTrigger {
    pub fn new() -> PeriodicTrigger {
        PeriodicTrigger { period: None, next_fire: None }
    }

    // First firing is one full period after now
    pub fn arm(&mut self, period_ms: u64, now: DateTime<Utc>) {
        let period = i64::try_from(period_ms).ok().and_then(Duration::try_milliseconds);

        self.next_fire = period.and_then(|p| now.checked_add_signed(p));
        if self.next_fire.is_none() {
            warn!("Interval of {} ms is out of range, trigger will never fire", period_ms);
        }
        self.period = period;
    }

    pub fn disarm(&mut self) {
        self.period = None;
        self.next_fire = None;
    }

    pub fn is_armed(&self) -> bool {
        self.period.is_some()
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match (self.period, self.next_fire) {
            (Some(period), Some(next)) if now >= next => {
                // A late loop fires once, not a burst of catch-up ticks
                let upcoming = next.checked_add_signed(period)
                    .and_then(|t| if t <= now { now.checked_add_signed(period) } else { Some(t) });
                self.next_fire = upcoming;
                true
            }
            _ => false,
        }
    }
}

/*
    The state owned by the sequencing thread. Split out from the thread body so it can be driven
        with explicit instants.
*/
pub struct SequencingLoop<R: Rng, D: NoteDisplay> {
    sequencer: NoteSequencer<R>,
    trigger: PeriodicTrigger,
    display: D,
}

impl<R: Rng, D: NoteDisplay> SequencingLoop<R, D> {
    pub fn new(sequencer: NoteSequencer<R>, display: D) -> SequencingLoop<R, D> {
        SequencingLoop { sequencer, trigger: PeriodicTrigger::new(), display }
    }

    // Returns false once the loop should exit
    pub fn handle_message(&mut self, message: LocalSequencerMessage, now: DateTime<Utc>) -> bool {
        match message {
            LocalSequencerMessage::Start(StartPayload { notes, interval_ms }) => {
                self.trigger.disarm();
                let outcome = self.sequencer.start(notes.as_slice(), interval_ms, &mut self.display);
                if outcome == TickOutcome::Continue {
                    self.trigger.arm(self.sequencer.interval_ms(), now);
                    info!("Trigger armed every {} ms", self.sequencer.interval_ms());
                }
                true
            }
            LocalSequencerMessage::Stop => {
                if self.sequencer.is_running() {
                    info!("Trigger disarmed on stop");
                }
                self.sequencer.stop();
                self.trigger.disarm();
                true
            }
            LocalSequencerMessage::Shutdown => {
                self.sequencer.stop();
                self.trigger.disarm();
                false
            }
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.trigger.poll(now) {
            debug!("Tick at {}", now);
            if self.sequencer.advance(&mut self.display) == TickOutcome::Disarm {
                self.trigger.disarm();
                info!("Trigger disarmed, run finished");
            }
        }
    }

    #[cfg(test)]
    fn is_armed(&self) -> bool {
        self.trigger.is_armed()
    }

    #[cfg(test)]
    fn display(&self) -> &D {
        &self.display
    }
}

fn start_live_loop<R, D>(mut state: SequencingLoop<R, D>, mut consumer: MessageConsumer)
where
    R: Rng,
    D: NoteDisplay,
{
    let sleeper = spin_sleep::SpinSleeper::new(100);

    loop {
        let this_loop_time = Utc::now();

        while let Some(message) = consumer.try_pop() {
            debug!("Received {:?}", message);
            if !state.handle_message(message, this_loop_time) {
                info!("Sequencing loop shutting down");
                return;
            }
        }

        state.tick(this_loop_time);

        /*
            Calculate time taken to execute this loop and log accordingly
        */
        let dur = Utc::now() - this_loop_time;
        let time_taken = dur.num_microseconds().unwrap_or(0) as u64;
        if time_taken > config::TICK_TIME_US {
            warn!("Operations performed (time: {}) exceed tick time, overflow...", time_taken);
        }

        sleeper.sleep(std::time::Duration::from_micros(config::TICK_TIME_US));
    }
}

/*
    Host side handle of the sequencing thread.
*/
pub struct SequencingDaemon {
    producer: MessageProducer,
    handle: Option<JoinHandle<()>>,
}

impl SequencingDaemon {

    pub fn start<D: 'static + NoteDisplay + Send>(display: D) -> SequencingDaemon {
        let (producer, consumer) = create_message_channel(config::COMMAND_QUEUE_CAPACITY);

        let handle = thread::spawn(move || {
            let state = SequencingLoop::new(NoteSequencer::new(), display);
            start_live_loop(state, consumer);
        });

        SequencingDaemon { producer, handle: Some(handle) }
    }

    fn is_alive(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    // Waits for room while the loop is alive: a burst of restarts must never fail
    pub fn send(&mut self, message: LocalSequencerMessage) -> Result<()> {
        let mut pending = message;
        loop {
            if !self.is_alive() {
                return Err(NoteAppError::DaemonStopped);
            }
            match self.producer.try_push(pending) {
                Ok(()) => return Ok(()),
                Err(returned) => {
                    pending = returned;
                    thread::sleep(std::time::Duration::from_micros(config::TICK_TIME_US));
                }
            }
        }
    }

    pub fn start_run(&mut self, notes: Vec<String>, interval_ms: u64) -> Result<()> {
        self.send(LocalSequencerMessage::Start(StartPayload { notes, interval_ms }))
    }

    pub fn stop_run(&mut self) -> Result<()> {
        self.send(LocalSequencerMessage::Stop)
    }

    // Stops any run and waits for the thread to exit. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<()> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };

        // Queue might be momentarily full; keep offering until the loop drains it
        while !handle.is_finished() && self.producer.try_push(LocalSequencerMessage::Shutdown).is_err() {
            thread::sleep(std::time::Duration::from_micros(config::TICK_TIME_US));
        }

        handle.join().map_err(|_| NoteAppError::DaemonStopped)
    }
}

impl Drop for SequencingDaemon {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Sequencing thread did not shut down cleanly: {}", e);
        }
    }
}
