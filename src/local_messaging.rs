use ringbuf::{traits::Split, HeapRb};

/*
    Messages from the host (console) to the sequencing thread.
        Lock-free single producer/single consumer: the host pushes, the timer loop drains.
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSequencerMessage {
    // Replace any current run with a fresh shuffle of these notes
    Start(StartPayload),
    Stop,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPayload {
    pub notes: Vec<String>,
    pub interval_ms: u64,
}

pub type MessageProducer = ringbuf::HeapProd<LocalSequencerMessage>;
pub type MessageConsumer = ringbuf::HeapCons<LocalSequencerMessage>;

pub fn create_message_channel(capacity: usize) -> (MessageProducer, MessageConsumer) {
    let rb = HeapRb::<LocalSequencerMessage>::new(capacity);
    rb.split()
}
