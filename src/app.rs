use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tracing::{debug, warn};
use webbrowser::Browser;

use crate::quiz::{Quiz, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    /// Open the share link for the last result.
    Share,
}

/// Terminal-facing state wrapped around the quiz: the name being typed and
/// the last validation message.
#[derive(Debug)]
pub struct App {
    pub quiz: Quiz,
    pub name_input: String,
    pub notice: Option<String>,
}

impl App {
    pub fn new(quiz: Quiz, username: Option<String>) -> Self {
        Self {
            quiz,
            name_input: username.unwrap_or_default(),
            notice: None,
        }
    }

    pub fn on_elapsed(&mut self, elapsed: Duration) {
        self.quiz.advance(elapsed);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Action::Quit;
        }
        if key.code == KeyCode::Tab {
            self.quiz.change_theme(self.quiz.theme().next());
            return Action::Continue;
        }

        match self.quiz.stage() {
            Stage::Intro => self.on_intro_key(key),
            Stage::Question => self.on_question_key(key),
            Stage::Feedback(_) | Stage::Bonus(_) => {}
            Stage::Results => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => {
                    let previous = self.quiz.session().username().to_string();
                    self.quiz.play_again();
                    self.name_input = previous;
                }
                KeyCode::Char('s') => return Action::Share,
                KeyCode::Char('q') => return Action::Quit,
                _ => {}
            },
        }
        Action::Continue
    }

    fn on_intro_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.quiz.start(&self.name_input) {
                Ok(()) => self.notice = None,
                Err(e) => {
                    if !e.is_validation() {
                        warn!(error = %e, "start rejected");
                    }
                    self.notice = Some(e.to_string());
                }
            },
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.name_input.push(c);
                self.notice = None;
            }
            _ => {}
        }
    }

    fn on_question_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                self.quiz.select_index(idx);
            }
            KeyCode::Up | KeyCode::Left => {
                self.quiz.move_selection(-1);
            }
            KeyCode::Down | KeyCode::Right => {
                self.quiz.move_selection(1);
            }
            KeyCode::Enter => {
                if let Err(e) = self.quiz.submit() {
                    warn!(error = %e, "submit rejected");
                }
            }
            KeyCode::Char('h') => {
                self.quiz.request_hint();
            }
            KeyCode::Char('f') => {
                self.quiz.freeze_timer();
            }
            _ => {}
        }
    }

    /// Pre-filled share link for the last completed session.
    pub fn share_url(&self) -> Option<String> {
        self.quiz.last_result().map(|r| {
            format!(
                "https://twitter.com/intent/tweet?text=I%20scored%20{}%20points%20on%20Brain%20Blitz%20Quiz%20({}%2F{}%20correct)",
                r.score,
                r.correct_count(),
                self.quiz.bank().len()
            )
        })
    }

    /// Opens the share link in a browser when one is available.
    pub fn open_share(&self) {
        let Some(url) = self.share_url() else {
            return;
        };
        if !Browser::is_available() {
            debug!("no browser available for sharing");
            return;
        }
        if let Err(e) = webbrowser::open(&url) {
            warn!(error = %e, "failed to open share link");
        }
    }
}
