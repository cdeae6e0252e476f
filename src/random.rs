use std::time::{SystemTime, UNIX_EPOCH};

use crate::biquad::FilterKind;

pub const DEFAULT_SHELF_CHANCE: u8 = 10;

/// Candidate gain magnitudes, in dB; the sign is drawn separately.
pub const GAIN_OPTIONS_DB: [f32; 4] = [1.0, 3.0, 6.0, 12.0];
/// Candidate band frequencies, in Hz.
pub const FREQ_OPTIONS_HZ: [f32; 6] = [125.0, 250.0, 500.0, 1000.0, 3000.0, 10000.0];

/// A randomly drawn EQ band, together with the generator that drew it.
///
/// The generator is a Lehmer-style stream with two multiply/fold mixing
/// rounds; identically seeded instances produce identical draws.
pub struct RandomParameters {
    state: u32,
    // TODO: make the option lists user-configurable
    gain_options_db: Vec<f32>,
    freq_options_hz: Vec<f32>,
    shelf_chance: u8,

    pub gain_db: f32,
    pub freq_hz: f32,
    pub kind: FilterKind,

    /// Keep drawing until the (gain, frequency) pair changes. Safe because
    /// both option sets hold more than one candidate.
    pub avoid_repeat: bool,
}

impl RandomParameters {
    /// Seeds from the wall clock and draws an initial band.
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self::seeded(millis as u32)
    }

    /// Seeds explicitly and draws an initial band.
    pub fn seeded(seed: u32) -> Self {
        let mut parameters = Self {
            state: seed,
            gain_options_db: GAIN_OPTIONS_DB.to_vec(),
            freq_options_hz: FREQ_OPTIONS_HZ.to_vec(),
            shelf_chance: DEFAULT_SHELF_CHANCE,
            gain_db: 0.0,
            freq_hz: 0.0,
            kind: FilterKind::Peak,
            avoid_repeat: true,
        };
        parameters.randomise(DEFAULT_SHELF_CHANCE);
        parameters
    }

    /// A fixed selection with no initial draw, for "nothing chosen yet"
    /// placeholders and guess comparisons.
    pub fn with_values(gain_db: f32, freq_hz: f32, kind: FilterKind) -> Self {
        Self {
            state: 0,
            gain_options_db: GAIN_OPTIONS_DB.to_vec(),
            freq_options_hz: FREQ_OPTIONS_HZ.to_vec(),
            shelf_chance: DEFAULT_SHELF_CHANCE,
            gain_db,
            freq_hz,
            kind,
            avoid_repeat: true,
        }
    }

    // Lehmer stream with two multiply/fold rounds for better mixing.
    fn random(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0xe120_fc15);
        let tmp = u64::from(self.state).wrapping_mul(0x4a39_b70d);
        let mixed = ((tmp >> 32) ^ tmp) as u32;
        let tmp = u64::from(mixed).wrapping_mul(0x12fa_d5c9);
        ((tmp >> 32) ^ tmp) as u32
    }

    // Inclusive on both ends. The modulo keeps its bias for ranges that do
    // not divide 2^32; draws stay reproducible across versions.
    fn random_range(&mut self, min: u32, max: u32) -> u32 {
        (self.random() % (max - min + 1)) + min
    }

    // A shelf draw picks the shelf that can act on the already-chosen
    // frequency; the comparison against the chance is strictly less-than.
    fn determine_kind(&mut self) {
        if self.random_range(1, 100) < u32::from(self.shelf_chance) {
            self.kind = if self.freq_hz <= 500.0 {
                FilterKind::LowShelf
            } else {
                FilterKind::HighShelf
            };
        } else {
            self.kind = FilterKind::Peak;
        }
    }

    fn draw(&mut self) {
        let polarity = if self.random_range(0, 1) == 1 { 1.0 } else { -1.0 };

        let gain_index = self.random() as usize % self.gain_options_db.len();
        self.gain_db = self.gain_options_db[gain_index] * polarity;

        let freq_index = self.random() as usize % self.freq_options_hz.len();
        self.freq_hz = self.freq_options_hz[freq_index];

        self.determine_kind();
    }

    /// Draws a new band. `shelf_chance` is a percentage, clamped to 100.
    pub fn randomise(&mut self, shelf_chance: u8) {
        self.shelf_chance = shelf_chance.min(100);

        if self.avoid_repeat {
            let previous_gain = self.gain_db;
            let previous_freq = self.freq_hz;

            while self.gain_db == previous_gain && self.freq_hz == previous_freq {
                self.draw();
            }

            return;
        }

        self.draw();
    }
}

impl Default for RandomParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for RandomParameters {
    // the kind is deliberately left out: the game scores a guess on
    // frequency and gain alone
    fn eq(&self, other: &Self) -> bool {
        self.gain_db == other.gain_db && self.freq_hz == other.freq_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_give_identical_streams() {
        let mut first = RandomParameters::seeded(0x5eed_1234);
        let mut second = RandomParameters::seeded(0x5eed_1234);

        assert!(first == second);
        for _ in 0..64 {
            assert_eq!(first.random(), second.random());
        }
    }

    #[test]
    fn range_with_one_value_is_constant() {
        let mut parameters = RandomParameters::seeded(7);
        for _ in 0..32 {
            assert_eq!(parameters.random_range(5, 5), 5);
        }
    }

    #[test]
    fn binary_range_produces_both_values() {
        let mut parameters = RandomParameters::seeded(7);
        let mut seen = [false, false];
        for _ in 0..200 {
            seen[parameters.random_range(0, 1) as usize] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn equality_ignores_the_kind() {
        let peak = RandomParameters::with_values(6.0, 1000.0, FilterKind::Peak);
        let shelf = RandomParameters::with_values(6.0, 1000.0, FilterKind::LowShelf);
        assert!(peak == shelf);

        let other = RandomParameters::with_values(-6.0, 1000.0, FilterKind::Peak);
        assert!(peak != other);
    }

    #[test]
    fn draws_come_from_the_option_sets() {
        let mut parameters = RandomParameters::seeded(42);
        let mut boosted = false;
        let mut cut = false;

        for _ in 0..100 {
            parameters.randomise(DEFAULT_SHELF_CHANCE);
            assert!(GAIN_OPTIONS_DB.contains(&parameters.gain_db.abs()));
            assert!(FREQ_OPTIONS_HZ.contains(&parameters.freq_hz));
            boosted |= parameters.gain_db > 0.0;
            cut |= parameters.gain_db < 0.0;
        }
        assert!(boosted && cut);
    }

    #[test]
    fn avoid_repeat_never_hands_back_the_same_pair() {
        let mut parameters = RandomParameters::seeded(3);
        assert!(parameters.avoid_repeat);

        for _ in 0..200 {
            let previous = (parameters.gain_db, parameters.freq_hz);
            parameters.randomise(0);
            assert_ne!((parameters.gain_db, parameters.freq_hz), previous);
        }
    }

    #[test]
    fn without_avoid_repeat_a_single_draw_is_taken() {
        let mut direct = RandomParameters::seeded(11);
        let mut via_randomise = RandomParameters::seeded(11);

        direct.draw();
        via_randomise.avoid_repeat = false;
        via_randomise.randomise(DEFAULT_SHELF_CHANCE);

        assert_eq!(direct.gain_db, via_randomise.gain_db);
        assert_eq!(direct.freq_hz, via_randomise.freq_hz);
        assert_eq!(direct.state, via_randomise.state);
    }

    #[test]
    fn shelf_chance_clamps_to_one_hundred() {
        let mut parameters = RandomParameters::seeded(5);
        parameters.randomise(255);
        assert_eq!(parameters.shelf_chance, 100);
    }

    #[test]
    fn tiny_shelf_chance_never_selects_a_shelf() {
        // the roll is at least 1, so a chance of 1 can never beat it
        let mut parameters = RandomParameters::seeded(9);
        for &chance in &[0u8, 1u8] {
            parameters.shelf_chance = chance;
            for _ in 0..200 {
                parameters.freq_hz = 125.0;
                parameters.determine_kind();
                assert_eq!(parameters.kind, FilterKind::Peak);
            }
        }
    }

    #[test]
    fn shelf_side_splits_at_five_hundred_hertz() {
        for (freq, expected) in [
            (500.0, FilterKind::LowShelf),
            (500.01, FilterKind::HighShelf),
        ] {
            let mut parameters = RandomParameters::seeded(1);
            parameters.shelf_chance = 100;
            parameters.freq_hz = freq;

            let mut shelf_seen = false;
            for _ in 0..50 {
                parameters.determine_kind();
                if parameters.kind != FilterKind::Peak {
                    assert_eq!(parameters.kind, expected, "at {freq} Hz");
                    shelf_seen = true;
                }
            }
            assert!(shelf_seen);
        }
    }
}
