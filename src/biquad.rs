use std::time::Instant;

use crate::fast_sqrt;

const SQRT2: f64 = std::f64::consts::SQRT_2;

/// The filter shapes the band can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowShelf = 1,
    HighShelf,
    Peak,
}

impl FilterKind {
    pub fn to_index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Self {
        match index {
            1 => FilterKind::LowShelf,
            2 => FilterKind::HighShelf,
            _ => FilterKind::Peak,
        }
    }
}

/// One biquad section's worth of feed-forward/feedback coefficients.
///
/// The two constructors are pure functions of the musical parameters so the
/// exact and approximated strategies can be compared in isolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub b1: f64,
    pub b2: f64,
}

impl Coefficients {
    /// Pass-through configuration.
    pub const IDENTITY: Self = Self {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
        b1: 0.0,
        b2: 0.0,
    };

    /// Full-precision derivation using the library square root.
    pub fn exact(kind: FilterKind, freq: f64, q: f64, gain_db: f64, sample_rate: u32) -> Self {
        let v = 10f64.powf(gain_db.abs() / 20.0);
        let k = (std::f64::consts::PI * (freq / sample_rate as f64)).tan();
        let boost = gain_db >= 0.0;

        match kind {
            FilterKind::Peak => Self::peak(v, k, q, boost),
            _ => Self::shelf(kind, v, k, SQRT2 * k, (2.0 * v).sqrt() * k, boost),
        }
    }

    /// Cheaper derivation: the shelf cross-term uses the one-step square root
    /// approximation. Peak filters never touch a square root, so this path is
    /// bit-identical to [`Coefficients::exact`] for them.
    pub fn fast(kind: FilterKind, freq: f64, q: f64, gain_db: f64, sample_rate: u32) -> Self {
        let v = 10f64.powf(gain_db.abs() / 20.0);
        let k = (std::f64::consts::PI * (freq / sample_rate as f64)).tan();
        let boost = gain_db >= 0.0;

        match kind {
            FilterKind::Peak => Self::peak(v, k, q, boost),
            _ => Self::shelf(kind, v, k, SQRT2 * k, fast_sqrt::fs1(2.0 * v) * k, boost),
        }
    }

    // Boost and cut swap the v-carrying terms between the zero and pole side
    // so a cut mirrors the matching boost.
    fn peak(v: f64, k: f64, q: f64, boost: bool) -> Self {
        let k2 = k * k;

        if boost {
            let norm = 1.0 / (1.0 + 1.0 / q * k + k2);
            let a1 = 2.0 * (k2 - 1.0) * norm;
            Self {
                a0: (1.0 + v / q * k + k2) * norm,
                a1,
                a2: (1.0 - v / q * k + k2) * norm,
                b1: a1,
                b2: (1.0 - 1.0 / q * k + k2) * norm,
            }
        } else {
            let norm = 1.0 / (1.0 + v / q * k + k2);
            let a1 = 2.0 * (k2 - 1.0) * norm;
            Self {
                a0: (1.0 + 1.0 / q * k + k2) * norm,
                a1,
                a2: (1.0 - 1.0 / q * k + k2) * norm,
                b1: a1,
                b2: (1.0 - v / q * k + k2) * norm,
            }
        }
    }

    fn shelf(kind: FilterKind, v: f64, k: f64, sqrt2_k: f64, sqrt2v_k: f64, boost: bool) -> Self {
        let k2 = k * k;

        match (kind, boost) {
            (FilterKind::LowShelf, true) => {
                let norm = 1.0 / (1.0 + sqrt2_k + k2);
                Self {
                    a0: (1.0 + sqrt2v_k + v * k2) * norm,
                    a1: 2.0 * (v * k2 - 1.0) * norm,
                    a2: (1.0 - sqrt2v_k + v * k2) * norm,
                    b1: 2.0 * (k2 - 1.0) * norm,
                    b2: (1.0 - sqrt2_k + k2) * norm,
                }
            }
            (FilterKind::LowShelf, false) => {
                let norm = 1.0 / (1.0 + sqrt2v_k + v * k2);
                Self {
                    a0: (1.0 + sqrt2_k + k2) * norm,
                    a1: 2.0 * (k2 - 1.0) * norm,
                    a2: (1.0 - sqrt2_k + k2) * norm,
                    b1: 2.0 * (v * k2 - 1.0) * norm,
                    b2: (1.0 - sqrt2v_k + v * k2) * norm,
                }
            }
            (_, true) => {
                let norm = 1.0 / (1.0 + sqrt2_k + k2);
                Self {
                    a0: (v + sqrt2v_k + k2) * norm,
                    a1: 2.0 * (k2 - v) * norm,
                    a2: (v - sqrt2v_k + k2) * norm,
                    b1: 2.0 * (k2 - 1.0) * norm,
                    b2: (1.0 - sqrt2_k + k2) * norm,
                }
            }
            (_, false) => {
                let norm = 1.0 / (v + sqrt2v_k + k2);
                Self {
                    a0: (1.0 + sqrt2_k + k2) * norm,
                    a1: 2.0 * (k2 - 1.0) * norm,
                    a2: (1.0 - sqrt2_k + k2) * norm,
                    b1: 2.0 * (k2 - v) * norm,
                    b2: (v - sqrt2v_k + k2) * norm,
                }
            }
        }
    }
}

/// A single-channel biquad EQ band.
///
/// Starts out as a pass-through; parameters only take effect through
/// [`Filter::set_parameters`]. The two state scalars deliberately survive
/// parameter changes, trading a short transient for continuity.
pub struct Filter {
    kind: FilterKind,
    sample_rate: u32,
    freq: f64,
    q: f64,
    gain_db: f64,

    coeffs: Coefficients,
    z1: f64,
    z2: f64,

    compute_time_ns: u64,

    /// When false, processing passes samples through untouched and parameter
    /// changes are dropped.
    pub enabled: bool,
    /// Selects the approximated coefficient derivation over the exact one.
    pub fast_coefficients: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self {
            kind: FilterKind::Peak,
            sample_rate: 0,
            freq: 250.0,
            q: 0.707,
            gain_db: 0.0,
            coeffs: Coefficients::IDENTITY,
            z1: 0.0,
            z2: 0.0,
            compute_time_ns: 0,
            enabled: true,
            fast_coefficients: true,
        }
    }

    /// Must be called before the first parameter change; a zero rate poisons
    /// the coefficient maths.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    /// Stores the band parameters and recomputes coefficients before
    /// returning. Dropped entirely while the filter is disabled.
    pub fn set_parameters(&mut self, kind: FilterKind, freq: f64, q: f64, gain_db: f64) {
        if !self.enabled {
            return;
        }

        self.kind = kind;
        self.freq = freq;
        self.q = q;
        self.gain_db = gain_db;

        self.compute_coefficients();
    }

    fn compute_coefficients(&mut self) {
        let started = Instant::now();

        self.coeffs = if self.fast_coefficients {
            Coefficients::fast(self.kind, self.freq, self.q, self.gain_db, self.sample_rate)
        } else {
            Coefficients::exact(self.kind, self.freq, self.q, self.gain_db, self.sample_rate)
        };

        self.compute_time_ns = started.elapsed().as_nanos() as u64;
    }

    /// Wall-clock cost of the last coefficient recomputation, in nanoseconds.
    pub fn coefficient_compute_time_ns(&self) -> u64 {
        self.compute_time_ns
    }

    /// Transposed direct form II, one sample per call, in order.
    pub fn process(&mut self, input: f64) -> f64 {
        if !self.enabled {
            return input;
        }

        let out = input * self.coeffs.a0 + self.z1;
        self.z1 = input * self.coeffs.a1 + self.z2 - self.coeffs.b1 * out;
        self.z2 = input * self.coeffs.a2 - self.coeffs.b2 * out;
        out
    }

    /// Same section for f32 streams: the arithmetic runs in f64, the output
    /// is truncated to f32 before it feeds the state update.
    pub fn process_f32(&mut self, input: f32) -> f32 {
        if !self.enabled {
            return input;
        }

        let x = input as f64;
        let out = (x * self.coeffs.a0 + self.z1) as f32;
        self.z1 = x * self.coeffs.a1 + self.z2 - self.coeffs.b1 * out as f64;
        self.z2 = x * self.coeffs.a2 - self.coeffs.b2 * out as f64;
        out
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}
