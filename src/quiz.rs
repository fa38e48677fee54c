//! The running quiz: session, timers, lifelines, leaderboard and theme.
//!
//! Every question's lifetime owns a countdown handle (and an unfreeze handle
//! while frozen). Both are cancelled on every path that ends the question:
//! submit, timeout, and play again. A pending bonus reveal owns the deferred
//! handle and is cancelled the same way, so an abandoned session never
//! receives points.

use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::bonus::BonusSource;
use crate::error::Result;
use crate::leaderboard::{self, LeaderboardEntry};
use crate::lifeline::{Lifelines, FREEZE_DURATION};
use crate::question::{Question, QuestionBank};
use crate::session::{Advance, FinalSession, Phase, Session};
use crate::theme::Theme;
use crate::timer::{TimerHandle, Timers};

pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);
pub const FEEDBACK_CORRECT: Duration = Duration::from_millis(1_000);
pub const FEEDBACK_INCORRECT: Duration = Duration::from_millis(1_500);
pub const BONUS_REVEAL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Countdown { question: usize },
    Unfreeze { question: usize },
    ShowNext,
    ShowBonus,
    AwardBonus,
    ShowResults,
}

/// Outcome of the last answer, shown while the quiz pauses between questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub question: usize,
    pub chosen: Option<String>,
    pub correct: bool,
    pub points: u32,
    pub bonus: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Intro,
    Question,
    Feedback(Feedback),
    Bonus(u32),
    Results,
}

pub struct Quiz {
    bank: QuestionBank,
    session: Session,
    leaderboard: Vec<LeaderboardEntry>,
    theme: Theme,
    bonus: Box<dyn BonusSource>,
    timers: Timers<Task>,
    countdown: Option<TimerHandle>,
    unfreeze: Option<TimerHandle>,
    deferred: Option<TimerHandle>,
    stage: Stage,
    time_remaining: u32,
    selected: Option<usize>,
    lifelines: Lifelines,
    last_result: Option<FinalSession>,
    last_rank: Option<usize>,
}

impl fmt::Debug for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quiz")
            .field("stage", &self.stage)
            .field("session", &self.session)
            .field("time_remaining", &self.time_remaining)
            .field("selected", &self.selected)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl Quiz {
    pub fn new(
        bank: QuestionBank,
        board: Vec<LeaderboardEntry>,
        theme: Theme,
        bonus: Box<dyn BonusSource>,
    ) -> Self {
        Self {
            bank,
            session: Session::new(),
            leaderboard: leaderboard::normalize(board),
            theme,
            bonus,
            timers: Timers::new(),
            countdown: None,
            unfreeze: None,
            deferred: None,
            stage: Stage::Intro,
            time_remaining: 0,
            selected: None,
            lifelines: Lifelines::default(),
            last_result: None,
            last_rank: None,
        }
    }

    pub fn start(&mut self, username: &str) -> Result<()> {
        self.session.start(username)?;
        self.last_result = None;
        self.last_rank = None;
        self.begin_question();
        Ok(())
    }

    /// Selects an option of the live question by index.
    pub fn select_index(&mut self, index: usize) -> bool {
        if self.stage != Stage::Question {
            return false;
        }
        match self.current_question().map(|q| q.options.len()) {
            Some(len) if index < len => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn select_option(&mut self, option: &str) -> bool {
        match self.current_question().and_then(|q| q.option_index(option)) {
            Some(i) => self.select_index(i),
            None => false,
        }
    }

    /// Moves the selection by `delta`, wrapping around the options.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        let Some(len) = self.current_question().map(|q| q.options.len() as isize) else {
            return false;
        };
        let next = match self.selected {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.select_index(next as usize)
    }

    /// Submits the selected option. Without a selection this is a no-op.
    pub fn submit(&mut self) -> Result<()> {
        if self.stage != Stage::Question {
            debug!(stage = ?self.stage, "submit ignored");
            return Ok(());
        }
        let Some(chosen) = self
            .selected
            .and_then(|i| self.current_question().map(|q| q.options[i].clone()))
        else {
            debug!("submit ignored without a selection");
            return Ok(());
        };
        self.answer(Some(chosen))
    }

    /// Reveals the hint. Returns `false` past the per-question cap.
    pub fn request_hint(&mut self) -> bool {
        if self.stage != Stage::Question {
            return false;
        }
        let used = self.lifelines.use_hint();
        debug!(used, hints_left = self.lifelines.hints_left(), "hint requested");
        used
    }

    /// Suspends the countdown for [`FREEZE_DURATION`], once per question.
    pub fn freeze_timer(&mut self) -> bool {
        if self.stage != Stage::Question || self.is_frozen() || !self.lifelines.use_freeze() {
            return false;
        }
        if let Some(h) = self.countdown.take() {
            self.timers.cancel(h);
        }
        let question = self.session.pointer();
        self.unfreeze = Some(
            self.timers
                .schedule(FREEZE_DURATION, Task::Unfreeze { question }),
        );
        debug!(question, "timer frozen");
        true
    }

    pub fn change_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Abandons whatever is running and returns to the intro screen.
    pub fn play_again(&mut self) {
        self.end_question();
        if let Some(h) = self.deferred.take() {
            self.timers.cancel(h);
        }
        self.timers.clear();
        self.session.play_again();
        self.stage = Stage::Intro;
        self.selected = None;
        self.lifelines = Lifelines::default();
        self.time_remaining = 0;
        info!("play again");
    }

    /// Advances all timers by `elapsed`, firing whatever falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.timers.now() + elapsed;
        while let Some((handle, task)) = self.timers.pop_until(deadline) {
            self.fire(handle, task);
        }
    }

    fn fire(&mut self, handle: TimerHandle, task: Task) {
        debug!(?task, "timer fired");
        match task {
            Task::Countdown { question } => {
                if self.countdown != Some(handle) || question != self.session.pointer() {
                    return;
                }
                self.countdown = None;
                self.time_remaining = self.time_remaining.saturating_sub(1);
                if self.time_remaining == 0 {
                    info!(question, "time is up");
                    if let Err(e) = self.answer(None) {
                        warn!(error = %e, "timeout submission rejected");
                    }
                } else {
                    self.schedule_countdown();
                }
            }
            Task::Unfreeze { question } => {
                if self.unfreeze != Some(handle) || question != self.session.pointer() {
                    return;
                }
                self.unfreeze = None;
                if self.stage == Stage::Question && self.time_remaining > 0 {
                    self.schedule_countdown();
                }
            }
            Task::ShowNext => {
                self.deferred = None;
                self.begin_question();
            }
            Task::ShowBonus => {
                let points = self.session.pending_bonus().map(|p| p.points);
                match points {
                    Some(points) => {
                        self.stage = Stage::Bonus(points);
                        self.deferred = Some(self.timers.schedule(BONUS_REVEAL, Task::AwardBonus));
                    }
                    None => self.deferred = None,
                }
            }
            Task::AwardBonus => {
                self.deferred = None;
                match self.session.resolve_bonus(&self.bank) {
                    Ok(Advance::Completed(finished)) => self.complete(finished),
                    Ok(_) => self.begin_question(),
                    Err(e) => warn!(error = %e, "bonus could not be applied"),
                }
            }
            Task::ShowResults => {
                self.deferred = None;
                self.stage = Stage::Results;
            }
        }
    }

    fn answer(&mut self, chosen: Option<String>) -> Result<()> {
        let Some(question_id) = self.current_question().map(|q| q.id) else {
            return Ok(());
        };
        let question = self.session.pointer();
        let submission = self.session.submit_answer(
            &self.bank,
            question_id,
            chosen.as_deref(),
            self.time_remaining,
            self.bonus.as_mut(),
        )?;
        self.end_question();

        let (delay, next, bonus) = match submission.advance {
            Advance::Next(_) => (feedback_delay(submission.correct), Task::ShowNext, None),
            Advance::AwaitingBonus(pending) => {
                (feedback_delay(true), Task::ShowBonus, Some(pending.points))
            }
            Advance::Completed(finished) => {
                self.complete(finished);
                (feedback_delay(submission.correct), Task::ShowResults, None)
            }
        };

        self.stage = Stage::Feedback(Feedback {
            question,
            chosen,
            correct: submission.correct,
            points: submission.points,
            bonus,
        });
        self.deferred = Some(self.timers.schedule(delay, next));
        Ok(())
    }

    fn complete(&mut self, finished: FinalSession) {
        let (board, rank) = leaderboard::insert_ranked(&self.leaderboard, finished.entry());
        info!(score = finished.score, rank = ?rank, "leaderboard updated");
        self.leaderboard = board;
        self.last_rank = rank;
        self.last_result = Some(finished);
        if !matches!(self.stage, Stage::Feedback(_)) {
            self.stage = Stage::Results;
        }
    }

    fn begin_question(&mut self) {
        self.end_question();
        self.selected = None;
        self.lifelines = Lifelines::default();
        match self.bank.get(self.session.pointer()).map(|q| q.time_limit) {
            Some(limit) => {
                self.time_remaining = limit;
                self.stage = Stage::Question;
                self.schedule_countdown();
            }
            None => self.stage = Stage::Results,
        }
    }

    fn end_question(&mut self) {
        if let Some(h) = self.countdown.take() {
            self.timers.cancel(h);
        }
        if let Some(h) = self.unfreeze.take() {
            self.timers.cancel(h);
        }
    }

    fn schedule_countdown(&mut self) {
        let question = self.session.pointer();
        self.countdown = Some(
            self.timers
                .schedule(COUNTDOWN_INTERVAL, Task::Countdown { question }),
        );
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    /// The question currently being answered, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.stage {
            Stage::Question => self.bank.get(self.session.pointer()),
            _ => None,
        }
    }

    /// The question the current stage is about, including feedback for the
    /// one just answered.
    pub fn displayed_question(&self) -> Option<&Question> {
        match &self.stage {
            Stage::Question => self.bank.get(self.session.pointer()),
            Stage::Feedback(fb) => self.bank.get(fb.question),
            _ => None,
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn lifelines(&self) -> &Lifelines {
        &self.lifelines
    }

    pub fn is_frozen(&self) -> bool {
        self.unfreeze.is_some()
    }

    pub fn freeze_remaining(&self) -> Option<Duration> {
        self.unfreeze.and_then(|h| self.timers.remaining(h))
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn last_result(&self) -> Option<&FinalSession> {
        self.last_result.as_ref()
    }

    /// Rank of the last completed session on the board.
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Number of scheduled timers, for tests and diagnostics.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

fn feedback_delay(correct: bool) -> Duration {
    if correct {
        FEEDBACK_CORRECT
    } else {
        FEEDBACK_INCORRECT
    }
}
