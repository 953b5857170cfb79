//! Message bus for lifecycle notifications

use cb_util::log;

#[derive(Default)]
pub struct MessageBus {
    queue: Vec<Message>,
}

impl MessageBus {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn submit(&mut self, m: Message) {
        self.queue.push(m);
    }

    pub fn drain_all(&mut self) -> std::vec::Drain<'_, Message> {
        self.queue.drain(..)
    }

    /// Delivers everything queued so far to the log
    pub fn dispatch(&mut self) -> usize {
        let mut delivered = 0;
        for message in self.drain_all() {
            match message {
                Message::StateChanged(state) => {
                    log::info!("ClosedBlocks state changed: {:?}", state)
                }
                Message::BlocksLoaded(count) => log::info!("Loaded {} blocks", count),
            }
            delivered += 1;
        }
        delivered
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PluginState {
    Start,
    Stop,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    StateChanged(PluginState),
    BlocksLoaded(usize),
}
