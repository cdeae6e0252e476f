use nih_plug::prelude::*;
use nih_plug_iced::IcedState;
use std::sync::Arc;

/// Q used while the High Q toggle is on; accentuates the band's resonance.
pub const HIGH_Q: f64 = 3.5;
/// Everyday Q for the guessing game.
pub const NORMAL_Q: f64 = 0.7;

#[derive(Params)]
pub struct RandomEqParams {
    #[persist = "editor-state"]
    pub editor_state: Arc<IcedState>,

    #[id = "bypass"]
    pub bypass: BoolParam,

    #[id = "high_q"]
    pub high_q: BoolParam,
}

impl Default for RandomEqParams {
    fn default() -> Self {
        Self {
            editor_state: crate::editor::default_state(),

            bypass: BoolParam::new("Bypass", false).make_bypass(),

            high_q: BoolParam::new("High Q", true),
        }
    }
}
