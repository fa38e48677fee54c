use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bonus::BonusSource;
use crate::error::{QuizError, Rejected, Result};
use crate::leaderboard::LeaderboardEntry;
use crate::question::{QuestionBank, QuestionId};
use crate::score::checked_score;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    Intro,
    InProgress,
    Complete,
}

/// One submitted or timed-out answer. `chosen` is `None` for a timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub chosen: Option<String>,
    pub time_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    Base,
    Bonus,
}

/// A single score-changing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub question_id: QuestionId,
    pub kind: AwardKind,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBonus {
    pub question_id: QuestionId,
    pub points: u32,
}

/// A completed session, ready to be ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalSession {
    pub username: String,
    pub score: u32,
    pub answers: Vec<AnswerRecord>,
    pub awards: Vec<Award>,
    pub completed_at: DateTime<Local>,
}

impl FinalSession {
    pub fn entry(&self) -> LeaderboardEntry {
        LeaderboardEntry::new(self.username.clone(), self.score)
    }

    pub fn correct_count(&self) -> usize {
        self.awards
            .iter()
            .filter(|a| a.kind == AwardKind::Base)
            .count()
    }
}

/// Where the session went after an answer or bonus resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The pointer moved to this question index.
    Next(usize),
    /// A bonus is pending; the pointer moves once it resolves.
    AwaitingBonus(PendingBonus),
    Completed(FinalSession),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub correct: bool,
    /// Base points awarded for this answer.
    pub points: u32,
    pub advance: Advance,
}

/// The quiz state machine: intro -> in_progress -> complete.
///
/// All score changes go through the award log, so `score` always equals the
/// sum of `awards`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    username: String,
    phase: Phase,
    pointer: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    awards: Vec<Award>,
    pending_bonus: Option<PendingBonus>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, username: &str) -> Result<()> {
        if self.phase != Phase::Intro {
            return Err(Rejected::WrongPhase(self.phase).into());
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(QuizError::InvalidUsername);
        }

        self.username = username.to_string();
        self.phase = Phase::InProgress;
        self.pointer = 0;
        self.score = 0;
        self.answers.clear();
        self.awards.clear();
        self.pending_bonus = None;
        info!(username = %self.username, "session started");
        Ok(())
    }

    /// Records the answer for the current question and resolves its awards.
    ///
    /// `chosen` of `None` or `""` is a timeout. The bonus source is consulted
    /// only for correct answers with at least one question still ahead.
    pub fn submit_answer(
        &mut self,
        bank: &QuestionBank,
        question_id: QuestionId,
        chosen: Option<&str>,
        time_remaining: u32,
        bonus: &mut dyn BonusSource,
    ) -> Result<Submission> {
        if self.phase != Phase::InProgress {
            return Err(Rejected::WrongPhase(self.phase).into());
        }
        let question = bank
            .get(self.pointer)
            .ok_or(Rejected::WrongPhase(self.phase))?;
        if question.id != question_id {
            return Err(Rejected::NotCurrent {
                expected: question.id,
                got: question_id,
            }
            .into());
        }
        if self.answers.len() > self.pointer {
            return Err(Rejected::AlreadyAnswered(question_id).into());
        }
        let earned = checked_score(i64::from(time_remaining), question.time_limit)?;

        let chosen = chosen.filter(|c| !c.is_empty());
        let correct = chosen.is_some_and(|c| question.is_correct(c));
        self.answers.push(AnswerRecord {
            question_id,
            chosen: chosen.map(str::to_string),
            time_remaining,
        });

        let points = if correct {
            self.award(question_id, AwardKind::Base, earned);
            earned
        } else {
            0
        };
        debug!(question_id, correct, points, "answer recorded");

        let has_next = self.pointer + 1 < bank.len();
        let offered = if correct && has_next { bonus.roll() } else { None };

        let advance = match offered {
            Some(points) => {
                let pending = PendingBonus {
                    question_id,
                    points,
                };
                self.pending_bonus = Some(pending);
                debug!(question_id, points, "bonus offered");
                Advance::AwaitingBonus(pending)
            }
            None => self.advance(bank),
        };

        Ok(Submission {
            correct,
            points,
            advance,
        })
    }

    /// Applies the pending bonus as its own award and moves to the next question.
    pub fn resolve_bonus(&mut self, bank: &QuestionBank) -> Result<Advance> {
        if self.phase != Phase::InProgress {
            return Err(Rejected::WrongPhase(self.phase).into());
        }
        let pending = self.pending_bonus.take().ok_or(Rejected::NoPendingBonus)?;
        self.award(pending.question_id, AwardKind::Bonus, pending.points);
        Ok(self.advance(bank))
    }

    /// Back to intro with everything but the caller's leaderboard cleared.
    pub fn play_again(&mut self) {
        *self = Self::default();
    }

    fn award(&mut self, question_id: QuestionId, kind: AwardKind, points: u32) {
        self.score = self.score.saturating_add(points);
        self.awards.push(Award {
            question_id,
            kind,
            points,
        });
    }

    fn advance(&mut self, bank: &QuestionBank) -> Advance {
        self.pointer += 1;
        if self.pointer >= bank.len() {
            self.phase = Phase::Complete;
            let finished = self.finalize_unchecked();
            info!(username = %finished.username, score = finished.score, "session complete");
            Advance::Completed(finished)
        } else {
            Advance::Next(self.pointer)
        }
    }

    fn finalize_unchecked(&self) -> FinalSession {
        FinalSession {
            username: self.username.clone(),
            score: self.score,
            answers: self.answers.clone(),
            awards: self.awards.clone(),
            completed_at: Local::now(),
        }
    }

    /// The finalized session once the quiz is complete.
    pub fn finalize(&self) -> Option<FinalSession> {
        (self.phase == Phase::Complete).then(|| self.finalize_unchecked())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn awards(&self) -> &[Award] {
        &self.awards
    }

    pub fn pending_bonus(&self) -> Option<PendingBonus> {
        self.pending_bonus
    }

    /// Whether the question at the pointer already has an answer.
    pub fn current_answered(&self) -> bool {
        self.answers.len() > self.pointer
    }
}
