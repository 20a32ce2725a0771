use crate::card::Suit;
use crate::config::SessionConfig;
use crate::error::RuleViolation;
use crate::hand::Hand;
use crate::shape::{Play, PlayShape, ShapeFamily};

/// A C3-level side effect of applying a legal play, surfaced so the match state machine and
/// journal can react without rules.rs knowing about hands or the journal itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Revolution,
    EightCut,
    ElevenBack,
    SuitLock(Vec<Suit>),
    FieldClear { next_leader: usize },
}

/// What the next player must beat. Lives for the duration of one "trick"; most of it resets
/// on `clear()`, but `revolution` is permanent for the game (§4.3).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub last_play: Option<Play>,
    pub last_player: Option<usize>,
    pub suit_lock: Option<Vec<Suit>>,
    pub revolution: bool,
    pub eleven_back_active: bool,
    pub pass_mask: u8,
    /// Whether the play that produced the current (cleared) field was an eight-cut, for the
    /// wire protocol's "eight-cut-last-play" notice (§4.5/§6). Reset by `clear()` and by any
    /// subsequent non-pass play.
    pub eight_cut_notice: bool,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clear(&self) -> bool {
        self.last_play.is_none()
    }

    /// Reset everything a field clear resets. `revolution` survives — it only flips on
    /// another revolution-triggering play.
    pub fn clear(&mut self) {
        self.last_play = None;
        self.last_player = None;
        self.suit_lock = None;
        self.eleven_back_active = false;
        self.pass_mask = 0;
        self.eight_cut_notice = false;
    }

    fn is_spade_three_return(&self, play: &Play) -> bool {
        matches!(
            self.last_play.as_ref().map(|p| &p.shape),
            Some(PlayShape::JokerSingle)
        ) && play.cards.len() == 1
            && play.cards[0].is_spade_three()
    }

    /// The symmetric half of the Joker-single / Spade-3-return exception (§4.2, §4.3
    /// predicate 2): a lone Joker beats any single regardless of the field's shape/size match.
    fn is_joker_single_counter(&self, play: &Play) -> bool {
        matches!(play.shape, PlayShape::JokerSingle)
            && matches!(
                self.last_play.as_ref().map(|p| p.shape.family()),
                Some(Some(ShapeFamily::Single))
            )
    }

    /// Whether every non-finished seat other than `last_player` has passed since `last_play`
    /// was placed — the "all others passed" field-clear condition (§4.3). Independent of
    /// whether `last_player` itself is still a legal active-seat candidate.
    pub fn all_others_passed(&self, finished: [bool; 5]) -> bool {
        let Some(last_player) = self.last_player else {
            return false;
        };
        for seat in 0..5 {
            if seat == last_player || finished[seat] {
                continue;
            }
            if self.pass_mask & (1 << seat) == 0 {
                return false;
            }
        }
        true
    }

    fn beats(&self, previous: &Play, next: &Play) -> bool {
        let inverted = self.revolution ^ self.eleven_back_active;
        match (
            previous.shape.representative_rank(),
            next.shape.representative_rank(),
        ) {
            (Some(prev_rank), Some(next_rank)) => {
                if inverted {
                    (next_rank as i32) < (prev_rank as i32)
                } else {
                    (next_rank as i32) > (prev_rank as i32)
                }
            }
            _ => false,
        }
    }

    /// Check a candidate play's legality against this field and the acting seat's hand.
    /// Does not mutate; call `apply` only after this returns `Ok`.
    pub fn validate(&self, hand: &Hand, play: &Play) -> Result<(), RuleViolation> {
        if play.is_pass() {
            return Ok(());
        }
        if !hand.contains_all(&play.cards) {
            return Err(RuleViolation::CardsNotInHand);
        }
        if !play.is_valid_shape() {
            return Err(RuleViolation::InvalidShape);
        }
        if self.is_spade_three_return(play) {
            return Ok(());
        }
        if self.is_joker_single_counter(play) {
            return Ok(());
        }

        let Some(last_play) = &self.last_play else {
            return Ok(());
        };
        let expected_family = last_play
            .shape
            .family()
            .expect("a field's last_play is never Pass or Invalid");
        let expected_size = last_play.shape.size();
        let actual_family = play
            .shape
            .family()
            .expect("validated play shape is not Pass or Invalid here");
        let actual_size = play.shape.size();
        if actual_family != expected_family || actual_size != expected_size {
            return Err(RuleViolation::ShapeDoesNotMatchField {
                expected_family,
                expected_size,
                actual_family,
                actual_size,
            });
        }

        if let Some(locked_suits) = &self.suit_lock {
            let play_suits = play.shape.suits();
            if !play_suits.iter().all(|s| locked_suits.contains(s)) {
                return Err(RuleViolation::SuitLockViolated);
            }
        }

        if !self.beats(last_play, play) {
            return Err(RuleViolation::PlayTooWeak);
        }

        Ok(())
    }

    /// Apply an already-validated play, mutating the field and returning the effects it
    /// triggered. `seat` is the acting seat.
    pub fn apply(&mut self, play: &Play, seat: usize, config: &SessionConfig) -> Vec<Effect> {
        let mut effects = Vec::new();

        if play.is_pass() {
            self.pass_mask |= 1 << seat;
            return effects;
        }

        self.eight_cut_notice = false;
        let is_spade_three_return = self.is_spade_three_return(play);

        if !is_spade_three_return {
            if let Some(previous) = &self.last_play {
                let prev_suits = previous.shape.suits();
                let next_suits = play.shape.suits();
                if !prev_suits.is_empty()
                    && !next_suits.is_empty()
                    && next_suits.iter().all(|s| prev_suits.contains(s))
                {
                    self.suit_lock = Some(next_suits.clone());
                    effects.push(Effect::SuitLock(next_suits));
                }
            }
        }

        self.last_play = Some(play.clone());
        self.last_player = Some(seat);
        self.pass_mask = 0;

        if play.shape.triggers_revolution() {
            self.revolution = !self.revolution;
            effects.push(Effect::Revolution);
        }

        if play.shape.contains_eight(&play.cards) {
            effects.push(Effect::EightCut);
            self.clear();
            self.eight_cut_notice = true;
            effects.push(Effect::FieldClear { next_leader: seat });
            return effects;
        }

        if config.eleven_back_enabled && play.shape.contains_jack(&play.cards) {
            self.eleven_back_active = true;
            effects.push(Effect::ElevenBack);
        }

        if is_spade_three_return {
            self.clear();
            effects.push(Effect::FieldClear { next_leader: seat });
        }

        effects
    }
}

/// Number of consecutive passes (with no intervening play) that triggers a thousand-day-hand
/// field clear (§4.3).
pub const THOUSAND_DAY_HAND_THRESHOLD: u32 = 20;
