use nih_plug::nih_log;
use nih_plug::prelude::{Editor, GuiContext, Param, ParamPtr};
use nih_plug_iced::widgets as nih_widgets;
use nih_plug_iced::*;
use std::sync::Arc;

use crate::biquad::FilterKind;
use crate::params::RandomEqParams;
use crate::random::{RandomParameters, FREQ_OPTIONS_HZ, GAIN_OPTIONS_DB};
use crate::BandSelection;

const FREQ_LABELS: [&str; 6] = ["125 Hz", "250 Hz", "500 Hz", "1 kHz", "3 kHz", "10 kHz"];
const GAIN_LABELS: [&str; 4] = ["1 dB", "3 dB", "6 dB", "12 dB"];

// Makes sense to also define this here, makes it a bit easier to keep track of
pub(crate) fn default_state() -> Arc<IcedState> {
    IcedState::from_size(560, 360)
}

pub(crate) fn create(
    params: Arc<RandomEqParams>,
    band: Arc<BandSelection>,
    editor_state: Arc<IcedState>,
) -> Option<Box<dyn Editor>> {
    create_iced_editor::<RandomEqEditor>(editor_state, (params, band))
}

struct RandomEqEditor {
    params: Arc<RandomEqParams>,
    context: Arc<dyn GuiContext>,

    band: Arc<BandSelection>,

    /// The band the user is listening for. Drawn once when the editor opens,
    /// re-drawn (and published to the audio thread) on every Check.
    answer: RandomParameters,

    chosen_freq: usize,
    chosen_gain: usize,
    boost_chosen: bool,

    feedback: String,

    check_button_state: button::State,
}

#[derive(Debug, Clone, Copy)]
enum Message {
    FreqChosen(usize),
    GainChosen(usize),
    PolarityChosen(bool),
    BypassToggled(bool),
    HighQToggled(bool),
    Check,
}

impl IcedEditor for RandomEqEditor {
    type Executor = executor::Default;
    type Message = Message;
    type InitializationFlags = (Arc<RandomEqParams>, Arc<BandSelection>);

    fn new(
        (params, band): Self::InitializationFlags,
        context: Arc<dyn GuiContext>,
    ) -> (Self, Command<Self::Message>) {
        let editor = RandomEqEditor {
            params,
            context,

            band,

            answer: RandomParameters::new(),

            chosen_freq: 0,
            chosen_gain: 0,
            boost_chosen: true,

            feedback: String::from("Select parameters..."),

            check_button_state: Default::default(),
        };

        (editor, Command::none())
    }

    fn context(&self) -> &dyn GuiContext {
        self.context.as_ref()
    }

    fn update(
        &mut self,
        _window: &mut WindowQueue,
        message: Self::Message,
    ) -> Command<Self::Message> {
        match message {
            Message::FreqChosen(index) => self.chosen_freq = index,
            Message::GainChosen(index) => self.chosen_gain = index,
            Message::PolarityChosen(boost) => self.boost_chosen = boost,
            Message::BypassToggled(state) => {
                let ptr = self.params.bypass.as_ptr();
                self.set_bool_param(ptr, state);
            }
            Message::HighQToggled(state) => {
                let ptr = self.params.high_q.as_ptr();
                self.set_bool_param(ptr, state);
            }
            Message::Check => self.check_guess(),
        }

        Command::none()
    }

    fn view(&mut self) -> Element<'_, Self::Message> {
        let mut freq_column = Column::new()
            .spacing(8)
            .push(Text::new("Frequency").size(18));
        for (index, label) in FREQ_LABELS.iter().enumerate() {
            freq_column = freq_column.push(Radio::new(
                index,
                *label,
                Some(self.chosen_freq),
                Message::FreqChosen,
            ));
        }

        let mut gain_column = Column::new()
            .spacing(8)
            .push(Text::new("Gain").size(18))
            .push(
                Row::new()
                    .spacing(12)
                    .push(Radio::new(
                        true,
                        "Boost",
                        Some(self.boost_chosen),
                        Message::PolarityChosen,
                    ))
                    .push(Radio::new(
                        false,
                        "Cut",
                        Some(self.boost_chosen),
                        Message::PolarityChosen,
                    )),
            );
        for (index, label) in GAIN_LABELS.iter().enumerate() {
            gain_column = gain_column.push(Radio::new(
                index,
                *label,
                Some(self.chosen_gain),
                Message::GainChosen,
            ));
        }

        let controls = Column::new()
            .spacing(12)
            .push(Checkbox::new(
                self.params.bypass.value(),
                "Bypass",
                Message::BypassToggled,
            ))
            .push(Checkbox::new(
                self.params.high_q.value(),
                "High Q",
                Message::HighQToggled,
            ))
            .push(Space::with_height(12.into()))
            .push(
                Button::new(&mut self.check_button_state, Text::new("Check"))
                    .on_press(Message::Check),
            )
            .push(Text::new(self.feedback.as_str()).size(15));

        Column::new()
            .padding(20)
            .spacing(12)
            .push(
                Text::new("Random EQ")
                    .font(assets::NOTO_SANS_LIGHT)
                    .size(24)
                    .height(30.into())
                    .width(Length::Fill)
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .vertical_alignment(alignment::Vertical::Bottom),
            )
            .push(
                Row::new()
                    .spacing(36)
                    .push(freq_column)
                    .push(gain_column)
                    .push(controls),
            )
            .into()
    }

    fn background_color(&self) -> nih_plug_iced::Color {
        nih_plug_iced::Color {
            r: 0.98,
            g: 0.98,
            b: 0.98,
            a: 1.0,
        }
    }
}

impl RandomEqEditor {
    fn set_bool_param(&mut self, ptr: ParamPtr, state: bool) {
        self.handle_param_message(nih_widgets::ParamMessage::BeginSetParameter(ptr));
        self.handle_param_message(nih_widgets::ParamMessage::SetParameterNormalized(
            ptr,
            if state { 1.0 } else { 0.0 },
        ));
        self.handle_param_message(nih_widgets::ParamMessage::EndSetParameter(ptr));
    }

    fn check_guess(&mut self) {
        let magnitude = GAIN_OPTIONS_DB[self.chosen_gain];
        let guessed_gain = if self.boost_chosen { magnitude } else { -magnitude };
        let guess = RandomParameters::with_values(
            guessed_gain,
            FREQ_OPTIONS_HZ[self.chosen_freq],
            FilterKind::Peak,
        );

        if guess == self.answer {
            self.feedback = String::from("Correct!");
            nih_log!("guess matched the answer");
        } else {
            self.feedback = format!(
                "Nope, the parameters were:\n{}  |  {}",
                format_freq(self.answer.freq_hz),
                format_gain(self.answer.gain_db),
            );
            nih_log!("guess missed the answer");
        }

        // next round; shelves stay out of the rotation for now
        self.answer.randomise(0);
        self.band
            .publish(self.answer.gain_db, self.answer.freq_hz, self.answer.kind);

        // the selection snaps back to its defaults for the new round
        self.chosen_freq = 0;
        self.chosen_gain = 0;
        self.boost_chosen = true;
    }
}

fn format_freq(freq_hz: f32) -> String {
    if freq_hz >= 1000.0 {
        format!("{} kHz", freq_hz as i32 / 1000)
    } else {
        format!("{} Hz", freq_hz as i32)
    }
}

fn format_gain(gain_db: f32) -> String {
    if gain_db > 0.0 {
        format!("+{} dB", gain_db as i32)
    } else {
        format!("{} dB", gain_db as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_labels_use_kilohertz_from_one_thousand() {
        assert_eq!(format_freq(125.0), "125 Hz");
        assert_eq!(format_freq(500.0), "500 Hz");
        assert_eq!(format_freq(1000.0), "1 kHz");
        assert_eq!(format_freq(10000.0), "10 kHz");
    }

    #[test]
    fn gains_carry_an_explicit_sign() {
        assert_eq!(format_gain(6.0), "+6 dB");
        assert_eq!(format_gain(-12.0), "-12 dB");
    }
}
