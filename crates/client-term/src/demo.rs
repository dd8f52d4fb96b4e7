//! A fake device walking around the room, for running without a feed

use std::sync::Mutex;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rtrack_client::Fetch;
use rtrack_core::{
    error::PollError,
    network::encode_report,
    types::{Position, PositionReport},
};

const ROOM_WIDTH: i32 = 12;
const ROOM_HEIGHT: i32 = 8;
const DEVICE: &str = "demo-tag";

struct Walk {
    x: i32,
    y: i32,
    rng: StdRng,
}

pub struct SimulatedFeed {
    walk: Mutex<Walk>,
    /// Chance of answering like a feed without enough beacon data
    failure_rate: f64,
}

impl SimulatedFeed {
    pub fn new(seed: u64) -> Self {
        Self {
            walk: Mutex::new(Walk {
                x: ROOM_WIDTH / 2,
                y: ROOM_HEIGHT / 2,
                rng: StdRng::seed_from_u64(seed),
            }),
            failure_rate: 0.1,
        }
    }

    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }
}

impl Fetch for SimulatedFeed {
    fn fetch(&self, _url: &str) -> Result<String, PollError> {
        let mut walk = self
            .walk
            .lock()
            .map_err(|_| PollError::Network("simulated feed poisoned".to_string()))?;
        let Walk { x, y, rng } = &mut *walk;

        if rng.random_bool(self.failure_rate) {
            return Ok(r#"{"message":"Not enough data"}"#.to_string());
        }

        *x = (*x + rng.random_range(-1..=1)).clamp(0, ROOM_WIDTH - 1);
        *y = (*y + rng.random_range(-1..=1)).clamp(0, ROOM_HEIGHT - 1);

        let report =
            PositionReport::new(Position::new(f64::from(*x), f64::from(*y))).with_device(DEVICE);
        encode_report(&report)
    }
}
