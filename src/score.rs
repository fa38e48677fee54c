use crate::error::{QuizError, Result};

/// Points for any correct answer before the time bonus.
pub const BASE_POINTS: u32 = 50;
pub const POINTS_PER_SECOND: u32 = 5;

/// Points awarded for a correct answer submitted with `time_remaining` seconds left.
pub fn calculate_score(time_remaining: u32) -> u32 {
    BASE_POINTS.saturating_add(time_remaining.saturating_mul(POINTS_PER_SECOND))
}

/// Like [`calculate_score`], but rejects times outside `0..=time_limit`.
pub fn checked_score(time_remaining: i64, time_limit: u32) -> Result<u32> {
    match u32::try_from(time_remaining) {
        Ok(t) if t <= time_limit => Ok(calculate_score(t)),
        _ => Err(QuizError::OutOfRangeTime {
            time_remaining,
            time_limit,
        }),
    }
}

/// Score as a rounded percentage of 100 points per question.
pub fn percentage(score: u32, total_questions: usize) -> u32 {
    if total_questions == 0 {
        return 0;
    }
    (score as f64 / (total_questions as f64 * 100.0) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Outstanding,
    Great,
    Good,
    NiceTry,
}

impl Verdict {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            p if p >= 90 => Verdict::Outstanding,
            p if p >= 70 => Verdict::Great,
            p if p >= 50 => Verdict::Good,
            _ => Verdict::NiceTry,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Outstanding => "Outstanding! You're a quiz master!",
            Verdict::Great => "Great job! You know your stuff!",
            Verdict::Good => "Good effort! Keep practicing!",
            Verdict::NiceTry => "Nice try! Better luck next time!",
        }
    }
}
