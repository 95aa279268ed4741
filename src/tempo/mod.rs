pub mod clock;
pub mod division;

pub use clock::{TempoClock, MIN_BPM, NOTES_PER_BEAT};
pub use division::{Division, DIVISIONS, NUM_DIVISIONS};
