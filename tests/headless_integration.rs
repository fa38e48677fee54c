use std::sync::mpsc;
use std::time::Duration;

use blitz::{
    bonus::NoBonus,
    leaderboard,
    question::QuestionBank,
    quiz::{Quiz, Stage, FEEDBACK_CORRECT},
    runtime::{FixedTicker, QuizEvent, Runner, TestEventSource},
    session::Phase,
    theme::Theme,
    Action, App,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> QuizEvent {
    QuizEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn builtin_app() -> App {
    let quiz = Quiz::new(
        QuestionBank::builtin().unwrap(),
        leaderboard::seed().unwrap(),
        Theme::default(),
        Box::new(NoBonus),
    );
    App::new(quiz, None)
}

// Drives the app like the binary does, but advances quiz time by a fixed
// amount per tick so the run is deterministic.
fn drive(app: &mut App, runner: &mut Runner<TestEventSource, FixedTicker>, tick: Duration) -> bool {
    match runner.step().event {
        QuizEvent::Key(key) => app.on_key(key) == Action::Quit,
        QuizEvent::Tick => {
            app.on_elapsed(tick);
            false
        }
        QuizEvent::Resize => false,
    }
}

#[test]
fn headless_quiz_answers_every_question() {
    let mut app = builtin_app();
    let answers: Vec<usize> = app
        .quiz
        .bank()
        .questions()
        .iter()
        .map(|q| q.correct_index().unwrap())
        .collect();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    for c in "alice".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    for _ in 0..6 {
        drive(&mut app, &mut runner, Duration::ZERO);
    }
    assert_eq!(app.quiz.stage(), &Stage::Question);

    for (i, answer) in answers.iter().enumerate() {
        let digit = char::from_digit(*answer as u32 + 1, 10).unwrap();
        tx.send(key(KeyCode::Char(digit))).unwrap();
        tx.send(key(KeyCode::Enter)).unwrap();
        drive(&mut app, &mut runner, Duration::ZERO);
        drive(&mut app, &mut runner, Duration::ZERO);
        assert!(
            matches!(app.quiz.stage(), Stage::Feedback(fb) if fb.correct),
            "question {i} should be answered correctly"
        );

        // an empty channel yields a tick, which ends the feedback pause exactly
        drive(&mut app, &mut runner, FEEDBACK_CORRECT);
    }

    assert_eq!(app.quiz.stage(), &Stage::Results);
    assert_eq!(app.quiz.phase(), Phase::Complete);
    let result = app.quiz.last_result().unwrap();
    assert_eq!(result.correct_count(), 8);
    // every answer lands before its first countdown tick
    let expected: u32 = app
        .quiz
        .bank()
        .questions()
        .iter()
        .map(|q| 50 + q.time_limit * 5)
        .sum();
    assert_eq!(result.score, expected);
    assert_eq!(app.quiz.last_rank(), Some(0));

    tx.send(key(KeyCode::Esc)).unwrap();
    assert!(drive(&mut app, &mut runner, Duration::ZERO));
}

#[test]
fn headless_timeouts_record_unanswered_questions() {
    let mut app = builtin_app();
    app.name_input = "bob".into();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key(KeyCode::Enter)).unwrap();

    for _ in 0..200 {
        drive(&mut app, &mut runner, Duration::from_secs(1));
        if app.quiz.stage() == &Stage::Results {
            break;
        }
    }

    assert_eq!(app.quiz.stage(), &Stage::Results);
    let answers = app.quiz.session().answers();
    assert_eq!(answers.len(), app.quiz.bank().len());
    assert!(answers
        .iter()
        .all(|a| a.chosen.is_none() && a.time_remaining == 0));
    assert_eq!(app.quiz.score(), 0);
    assert_eq!(app.quiz.pending_timers(), 0);
}

#[test]
fn headless_play_again_returns_to_intro() {
    let mut app = builtin_app();
    app.name_input = "carol".into();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Char('3'))).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    for _ in 0..3 {
        drive(&mut app, &mut runner, Duration::ZERO);
    }
    assert_eq!(app.quiz.score(), 125);

    // finish the rest by timing out
    for _ in 0..200 {
        drive(&mut app, &mut runner, Duration::from_secs(1));
        if app.quiz.stage() == &Stage::Results {
            break;
        }
    }
    assert_eq!(app.quiz.stage(), &Stage::Results);

    tx.send(key(KeyCode::Char('r'))).unwrap();
    drive(&mut app, &mut runner, Duration::ZERO);
    assert_eq!(app.quiz.stage(), &Stage::Intro);
    assert_eq!(app.quiz.score(), 0);
    assert_eq!(app.name_input, "carol");
    assert!(app
        .quiz
        .leaderboard()
        .iter()
        .any(|e| e.username == "carol" && e.score == 125));
}
