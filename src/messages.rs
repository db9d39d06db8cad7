//! Timed text carousel shown after the proposal is accepted.
//!
//! The sequencer never touches a timer itself: callers feed it the current
//! time in milliseconds and apply whatever steps are due.

pub const FADE_MS: f64 = 1000.0;
pub const HOLD_MS: f64 = 3500.0;
pub const STEP_MS: f64 = FADE_MS + HOLD_MS;

pub const GREETING: [&str; 11] = [
    "In a world of black and white...",
    "You paint my life with color.",
    "Every moment with you is magic.",
    "Your smile is my favorite sunlight.",
    "I promise to always hold your hand.",
    "To buy you flowers just because.",
    "To listen to your stories.",
    "To be your biggest fan.",
    "You are my best friend.",
    "My safe place.",
    "I love you, Arushi. \u{2764}\u{fe0f}",
];

pub const PALETTE: [&str; 11] = [
    "#e53935", "#d81b60", "#8e24aa", "#5e35b1", "#3949ab", "#1e88e5", "#00acc1", "#00897b",
    "#43a047", "#7cb342", "#f4511e",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub index: usize,
    pub text: &'static str,
    pub color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStep {
    FadeOut,
    Show(Message),
}

#[derive(Clone, Debug)]
pub struct MessageSequencer {
    texts: &'static [&'static str],
    palette: &'static [&'static str],
    next_due: f64,
    emitted: usize,
    on_screen: Option<Message>,
}

impl MessageSequencer {
    pub fn new(
        texts: &'static [&'static str],
        palette: &'static [&'static str],
        started_at: f64,
    ) -> Self {
        Self {
            texts,
            palette,
            next_due: started_at,
            emitted: 0,
            on_screen: None,
        }
    }

    pub fn greeting(started_at: f64) -> Self {
        Self::new(&GREETING, &PALETTE, started_at)
    }

    pub fn message(&self, index: usize) -> Option<Message> {
        let text = *self.texts.get(index)?;
        let color = match self.palette.len() {
            0 => "inherit",
            n => self.palette[index % n],
        };
        Some(Message {
            index,
            text,
            color,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.texts.len() * 2
    }

    /// Returns the step due at `now`, if any. At most one step is released
    /// per call, and the next one is timed from `now`, so a late poll delays
    /// the rest of the sequence instead of skipping through it.
    pub fn poll(&mut self, now: f64) -> Option<SequenceStep> {
        if self.is_finished() || now < self.next_due {
            return None;
        }

        let index = self.emitted / 2;
        let showing = self.emitted % 2 == 1;
        self.emitted += 1;

        if showing {
            self.next_due = now + HOLD_MS;
            self.on_screen = self.message(index);
            self.on_screen.map(SequenceStep::Show)
        } else {
            self.next_due = now + FADE_MS;
            self.on_screen = None;
            Some(SequenceStep::FadeOut)
        }
    }

    /// The message currently shown. `None` while fading between messages;
    /// the last message stays up once the sequence ends.
    pub fn visible(&self) -> Option<Message> {
        self.on_screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE: [&str; 3] = ["one", "two", "three"];
    const TWO_COLORS: [&str; 2] = ["red", "blue"];

    fn drain(seq: &mut MessageSequencer, now: f64) -> Vec<SequenceStep> {
        std::iter::from_fn(|| seq.poll(now)).collect()
    }

    #[test]
    fn fades_before_each_message() {
        let mut seq = MessageSequencer::new(&THREE, &TWO_COLORS, 100.0);

        assert_eq!(seq.poll(99.0), None);
        assert_eq!(drain(&mut seq, 100.0), vec![SequenceStep::FadeOut]);
        assert_eq!(seq.poll(1099.0), None);

        let shown = drain(&mut seq, 1100.0);
        assert_eq!(
            shown,
            vec![SequenceStep::Show(Message {
                index: 0,
                text: "one",
                color: "red",
            })]
        );
    }

    #[test]
    fn shows_each_message_once_and_stops() {
        let mut seq = MessageSequencer::new(&THREE, &TWO_COLORS, 0.0);
        let mut shows = Vec::new();

        let mut now = 0.0;
        while now < 20_000.0 {
            for step in drain(&mut seq, now) {
                if let SequenceStep::Show(message) = step {
                    shows.push((now, message));
                }
            }
            now += 1.0;
        }

        assert_eq!(shows.len(), 3);
        assert!(seq.is_finished());
        for pair in shows.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= STEP_MS);
        }
        let texts: Vec<_> = shows.iter().map(|(_, m)| m.text).collect();
        assert_eq!(texts, THREE);
        // Palette cycles by index.
        assert_eq!(shows[2].1.color, "red");
    }

    #[test]
    fn stalled_frame_releases_one_step_and_keeps_spacing() {
        let mut seq = MessageSequencer::new(&THREE, &TWO_COLORS, 0.0);
        assert_eq!(drain(&mut seq, 0.0), vec![SequenceStep::FadeOut]);
        assert!(matches!(seq.poll(1_000.0), Some(SequenceStep::Show(m)) if m.index == 0));

        // Nothing polled for a long while, then frames resume.
        assert_eq!(drain(&mut seq, 20_000.0), vec![SequenceStep::FadeOut]);
        assert_eq!(drain(&mut seq, 20_016.0), vec![]);
        assert_eq!(seq.poll(20_999.0), None);
        assert!(matches!(seq.poll(21_000.0), Some(SequenceStep::Show(m)) if m.index == 1));
        assert_eq!(seq.poll(24_499.0), None);
        assert_eq!(seq.poll(24_500.0), Some(SequenceStep::FadeOut));
    }

    #[test]
    fn shows_stay_spaced_under_irregular_frames() {
        let mut seq = MessageSequencer::greeting(0.0);
        let mut rng = fastrand::Rng::with_seed(4);
        let mut shows = Vec::new();

        let mut now = 0.0;
        while !seq.is_finished() {
            if let Some(SequenceStep::Show(_)) = seq.poll(now) {
                shows.push(now);
            }
            // Mostly smooth frames with the occasional multi-second stall.
            now += if rng.u8(..) < 8 { 9_000.0 } else { 16.0 };
        }

        assert_eq!(shows.len(), GREETING.len());
        for pair in shows.windows(2) {
            assert!(pair[1] - pair[0] >= STEP_MS, "{:?}", pair);
        }
    }

    #[test]
    fn visible_message_tracks_emitted_steps() {
        let mut seq = MessageSequencer::new(&THREE, &TWO_COLORS, 0.0);
        assert_eq!(seq.visible(), None);

        seq.poll(0.0);
        assert_eq!(seq.visible(), None);
        seq.poll(1_000.0);
        assert_eq!(seq.visible().map(|m| m.index), Some(0));
        seq.poll(4_499.0);
        assert_eq!(seq.visible().map(|m| m.index), Some(0));
        seq.poll(4_500.0);
        assert_eq!(seq.visible(), None);

        for now in [5_500.0, 10_000.0, 11_000.0] {
            seq.poll(now);
        }
        assert!(seq.is_finished());
        assert_eq!(seq.poll(1e9), None);
        assert_eq!(seq.visible().map(|m| m.index), Some(2));
    }

    #[test]
    fn empty_sequence_never_emits() {
        let mut seq = MessageSequencer::new(&[], &[], 0.0);
        assert!(seq.is_finished());
        assert_eq!(seq.poll(1e9), None);
        assert_eq!(seq.visible(), None);
    }

    #[test]
    fn greeting_pairs_text_with_palette() {
        let seq = MessageSequencer::greeting(0.0);
        let last = seq.message(GREETING.len() - 1).expect("last message");
        assert_eq!(last.color, "#f4511e");
        assert_eq!(seq.message(GREETING.len()), None);
    }
}
