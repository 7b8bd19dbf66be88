//! Sub-pixel pen state for one drawing surface.
//!
//! The engine only ever sees integer advances. Each surface keeps the part of
//! a pixel that rounding has not accounted for yet and folds it into the next
//! glyph, so the integer pen never drifts more than half a pixel from the
//! fractional one.

/// Rounds half to even and returns the residual, which lies in `[-0.5, 0.5]`.
fn round_with_residual(value: f64) -> (i32, f64) {
    if !value.is_finite() {
        return (0, 0.0);
    }
    let rounded = value.round_ties_even();
    (rounded as i32, value - rounded)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PenState {
    advance_carry: f64,
    nudge_carry: f64,
    previous: Option<char>,
}

/// Outcome of one glyph, computed without touching the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenStep {
    /// Integer advance before the engine spacing correction.
    pub advance: i32,
    /// Horizontal shift applied to the glyph bitmap and origin.
    pub nudge: i32,
    advance_carry: f64,
    nudge_carry: f64,
}

impl PenStep {
    pub fn advance_carry(&self) -> f64 {
        self.advance_carry
    }

    pub fn nudge_carry(&self) -> f64 {
        self.nudge_carry
    }
}

impl PenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn advance_carry(&self) -> f64 {
        self.advance_carry
    }

    pub fn nudge_carry(&self) -> f64 {
        self.nudge_carry
    }

    pub fn previous(&self) -> Option<char> {
        self.previous
    }

    /// `raw_advance` is A + B + C + kerning; `left_bearing` is A.
    pub fn step(&self, raw_advance: f64, left_bearing: f64) -> PenStep {
        let (advance, advance_carry) = round_with_residual(raw_advance + self.advance_carry);
        let bearing_fraction = if left_bearing.is_finite() { left_bearing.fract() } else { 0.0 };
        let (nudge, nudge_carry) = round_with_residual(bearing_fraction + self.nudge_carry);
        PenStep {
            advance,
            nudge,
            advance_carry,
            nudge_carry,
        }
    }

    pub fn commit(&mut self, step: &PenStep) {
        self.advance_carry = step.advance_carry;
        self.nudge_carry = step.nudge_carry;
    }

    pub fn set_previous(&mut self, ch: char) {
        self.previous = Some(ch);
    }
}
