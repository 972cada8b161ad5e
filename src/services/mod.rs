pub mod poller;

pub use poller::{PollPolicy, PollState, Poller};
