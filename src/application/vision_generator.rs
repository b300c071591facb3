// Vision event generator - Synthetic inspection verdicts
use crate::application::random_source::RandomSource;
use crate::domain::vision::{DefectType, VisionVerdict};
use chrono::{DateTime, Local, Utc};

const PASS_PROBABILITY: f64 = 0.92;
const FRAME_CYCLE: u32 = 500;
pub const PART_NAME: &str = "Engine Block Casting";

pub struct VisionGenerator<R: RandomSource> {
    rng: R,
}

impl<R: RandomSource> VisionGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw one verdict and advance the display frame counter.
    pub fn tick(&mut self, frame_counter: u32, now: DateTime<Utc>) -> (VisionVerdict, u32) {
        let rng = &mut self.rng;
        let is_pass = rng.chance(PASS_PROBABILITY);
        let id = format!("PX-{}", 1000 + rng.below(9000));
        let confidence = rng.uniform(0.96, 0.035);
        let timestamp = now.with_timezone(&Local).format("%H:%M:%S").to_string();

        let verdict = if is_pass {
            let mask = format!("M-{}", rng.below(100));
            VisionVerdict::pass(id, PART_NAME.to_string(), confidence, timestamp, mask)
        } else {
            let defect = DefectType::ALL[rng.below(DefectType::ALL.len() as u32) as usize];
            let mask = format!("M-{}", rng.below(100));
            VisionVerdict::fail(id, PART_NAME.to_string(), confidence, defect, timestamp, mask)
        };

        (verdict, (frame_counter + 1) % FRAME_CYCLE)
    }
}
