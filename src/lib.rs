use atomic_float::AtomicF32;
use nih_plug::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub mod biquad;
pub mod fast_sqrt;
pub mod random;

mod editor;
mod params;

use biquad::{Filter, FilterKind};
use params::{RandomEqParams, HIGH_Q, NORMAL_Q};

/// Channels are processed by fully independent filters; stereo is assumed.
const CHANNEL_COUNT: usize = 2;

/// Headroom scaling around the filter, so a boosted band has room to swing.
const INPUT_SCALE: f32 = 0.2;
const OUTPUT_SCALE: f32 = 5.0;

/// The band the editor last published, carried to the audio thread as a
/// versioned message. This is stored as an [`Arc`] so it can be shared
/// between the GUI and the audio processing parts.
///
/// A publish racing a snapshot can tear for one block at most; the version
/// re-check picks the settled values up on the next block.
pub struct BandSelection {
    version: AtomicU32,
    gain_db: AtomicF32,
    freq_hz: AtomicF32,
    kind: AtomicU32,
}

impl BandSelection {
    /// Starts out mirroring a freshly constructed [`Filter`], so applying it
    /// before any publish configures a pass-through band.
    fn new() -> Self {
        Self {
            version: AtomicU32::new(0),
            gain_db: AtomicF32::new(0.0),
            freq_hz: AtomicF32::new(250.0),
            kind: AtomicU32::new(FilterKind::Peak.to_index()),
        }
    }

    pub fn publish(&self, gain_db: f32, freq_hz: f32, kind: FilterKind) {
        self.gain_db.store(gain_db, Ordering::Relaxed);
        self.freq_hz.store(freq_hz, Ordering::Relaxed);
        self.kind.store(kind.to_index(), Ordering::Relaxed);
        self.version.fetch_add(1, Ordering::Release);
    }

    fn snapshot(&self) -> (u32, f32, f32, FilterKind) {
        let version = self.version.load(Ordering::Acquire);
        (
            version,
            self.gain_db.load(Ordering::Relaxed),
            self.freq_hz.load(Ordering::Relaxed),
            FilterKind::from_index(self.kind.load(Ordering::Relaxed)),
        )
    }
}

pub struct RandomEq {
    params: Arc<RandomEqParams>,

    /// Selection shared with the editor.
    band: Arc<BandSelection>,

    filters: [Filter; CHANNEL_COUNT],

    /// Last band version pushed into the filters. A version is marked
    /// applied even while bypassed: the filters drop parameter changes when
    /// disabled, and re-enabling does not resurrect them.
    applied_version: u32,
    applied_q: f64,
}

impl Default for RandomEq {
    fn default() -> Self {
        Self {
            params: Arc::new(RandomEqParams::default()),
            band: Arc::new(BandSelection::new()),
            filters: [Filter::new(), Filter::new()],
            applied_version: 0,
            applied_q: HIGH_Q,
        }
    }
}

impl Plugin for RandomEq {
    const NAME: &'static str = "Random EQ";
    const VENDOR: &'static str = "Random EQ";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, _async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        editor::create(
            self.params.clone(),
            self.band.clone(),
            self.params.editor_state.clone(),
        )
    }

    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        // The filters themselves are kept: their state and any applied band
        // survive re-initialisation, only the rate is refreshed.
        for filter in self.filters.iter_mut() {
            filter.set_sample_rate(buffer_config.sample_rate as u32);
        }

        true
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let bypassed = self.params.bypass.value();
        let q = if self.params.high_q.value() {
            HIGH_Q
        } else {
            NORMAL_Q
        };

        for filter in self.filters.iter_mut() {
            filter.enabled = !bypassed;
        }

        // Drain the band message at most once per block.
        let (version, gain_db, freq_hz, kind) = self.band.snapshot();
        if version != self.applied_version || q != self.applied_q {
            self.applied_version = version;
            self.applied_q = q;

            for filter in self.filters.iter_mut() {
                filter.set_parameters(kind, freq_hz as f64, q, gain_db as f64);
            }
        }

        for mut channel_samples in buffer.iter_samples() {
            let channel_count = channel_samples.len().min(CHANNEL_COUNT);
            for ch_idx in 0..channel_count {
                let sample = channel_samples
                    .get_mut(ch_idx)
                    .expect("channel index out of range");
                *sample = self.filters[ch_idx].process_f32(*sample * INPUT_SCALE) * OUTPUT_SCALE;
            }
        }

        ProcessStatus::Normal
    }
}

impl ClapPlugin for RandomEq {
    const CLAP_ID: &'static str = "org.randomeq.random-eq";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Ear training EQ that challenges you to guess the randomised band");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Equalizer,
    ];
}

impl Vst3Plugin for RandomEq {
    const VST3_CLASS_ID: [u8; 16] = *b"RandomEqTrainerA";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Eq];
}

nih_export_clap!(RandomEq);
nih_export_vst3!(RandomEq);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_selection_round_trips() {
        let band = BandSelection::new();
        let (version, gain_db, freq_hz, kind) = band.snapshot();
        assert_eq!(version, 0);
        assert_eq!(gain_db, 0.0);
        assert_eq!(freq_hz, 250.0);
        assert_eq!(kind, FilterKind::Peak);

        band.publish(-6.0, 3000.0, FilterKind::HighShelf);
        let (version, gain_db, freq_hz, kind) = band.snapshot();
        assert_eq!(version, 1);
        assert_eq!(gain_db, -6.0);
        assert_eq!(freq_hz, 3000.0);
        assert_eq!(kind, FilterKind::HighShelf);
    }

    #[test]
    fn filter_kind_transport_is_stable() {
        for kind in [FilterKind::LowShelf, FilterKind::HighShelf, FilterKind::Peak] {
            assert_eq!(FilterKind::from_index(kind.to_index()), kind);
        }
    }
}
