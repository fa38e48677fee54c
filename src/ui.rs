pub mod countdown;
pub mod leaderboard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use webbrowser::Browser;

use crate::{
    app::App,
    question::Question,
    quiz::{Feedback, Stage},
    score::{percentage, Verdict},
    theme::Palette,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.quiz.theme().palette();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // header
                Constraint::Min(1),    // body
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(self, chunks[0], buf, &palette);

        let legend = match self.quiz.stage() {
            Stage::Intro => {
                render_intro(self, chunks[1], buf, &palette);
                "(enter) start / (tab) theme / (esc) quit"
            }
            Stage::Question => {
                if let Some(q) = self.quiz.current_question() {
                    render_question(self, q, None, chunks[1], buf, &palette);
                }
                "(1-4) select / (enter) submit / (h)int / (f)reeze / (esc) quit"
            }
            Stage::Feedback(fb) => {
                if let Some(q) = self.quiz.displayed_question() {
                    render_question(self, q, Some(fb), chunks[1], buf, &palette);
                }
                ""
            }
            Stage::Bonus(points) => {
                render_bonus(*points, chunks[1], buf, &palette);
                ""
            }
            Stage::Results => {
                render_results(self, chunks[1], buf, &palette);
                if Browser::is_available() {
                    "(r) play again / (s)hare / (tab) theme / (esc) quit"
                } else {
                    "(r) play again / (tab) theme / (esc) quit"
                }
            }
        };

        Paragraph::new(Span::styled(
            legend,
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[2], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let mut spans = vec![Span::styled(
        "Brain Blitz Quiz",
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD),
    )];
    if !matches!(app.quiz.stage(), Stage::Intro) {
        spans.push(Span::styled(
            format!("   score: {}", app.quiz.score()),
            Style::default().fg(palette.text),
        ));
    }
    spans.push(Span::styled(
        format!("   theme: {}", app.quiz.theme()),
        Style::default().fg(palette.muted),
    ));

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_intro(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} questions against the clock", app.quiz.bank().len()),
            Style::default().fg(palette.secondary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Your name: ", bold_style.fg(palette.text)),
            Span::styled(
                format!("{}_", app.name_input),
                bold_style.fg(palette.primary),
            ),
        ]),
    ];
    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(palette.incorrect),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_question(
    app: &App,
    question: &Question,
    feedback: Option<&Feedback>,
    area: Rect,
    buf: &mut Buffer,
    palette: &Palette,
) {
    let quiz = &app.quiz;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // progress
            Constraint::Length(3), // question text
            Constraint::Length(1), // gauge
            Constraint::Length(1), // padding
            Constraint::Length(question.options.len() as u16),
            Constraint::Length(1), // padding
            Constraint::Min(1),    // hint / lifelines / feedback
        ])
        .split(area);

    let number = feedback.map_or(quiz.session().pointer(), |fb| fb.question) + 1;
    Paragraph::new(Span::styled(
        format!("Question {} of {}", number, quiz.bank().len()),
        Style::default().fg(palette.muted),
    ))
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        question.text.as_str(),
        bold_style.fg(palette.text),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[1], buf);

    let remaining = quiz.time_remaining();
    Gauge::default()
        .gauge_style(
            Style::default().fg(countdown::gauge_color(remaining, question.time_limit)),
        )
        .percent(countdown::percent_left(remaining, question.time_limit))
        .label(format!("{remaining}s"))
        .render(chunks[2], buf);

    let options: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = match feedback {
                Some(_) if *option == question.correct_answer => bold_style.fg(palette.correct),
                Some(fb) if fb.chosen.as_deref() == Some(option.as_str()) => {
                    bold_style.fg(palette.incorrect)
                }
                Some(_) => Style::default().fg(palette.muted),
                None if quiz.selected() == Some(i) => bold_style
                    .fg(palette.primary)
                    .add_modifier(Modifier::REVERSED),
                None => Style::default().fg(palette.text),
            };
            Line::from(Span::styled(format!(" [{}] {} ", i + 1, option), style))
        })
        .collect();
    Paragraph::new(options).render(chunks[4], buf);

    match feedback {
        Some(fb) => render_feedback(question, fb, chunks[6], buf, palette),
        None => render_lifelines(app, question, chunks[6], buf, palette),
    }
}

fn render_lifelines(app: &App, question: &Question, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let lifelines = app.quiz.lifelines();
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "hints left: {}   freeze: {}",
            lifelines.hints_left(),
            if lifelines.freeze_used() { "used" } else { "ready" }
        ),
        Style::default().fg(palette.muted),
    ))];

    if let Some(left) = app.quiz.freeze_remaining() {
        lines.push(Line::from(Span::styled(
            format!("Timer frozen ({}s)", left.as_secs_f64().ceil() as u64),
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(lines.len() as u16), Constraint::Min(0)])
        .split(area);

    if lifelines.hint_shown() {
        let hint = question.hint.as_deref().unwrap_or("No hint for this one");
        Paragraph::new(Span::styled(hint, Style::default().fg(palette.secondary)))
            .block(Block::default().borders(Borders::ALL).title("Hint"))
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }

    Paragraph::new(lines).render(chunks[0], buf);
}

fn render_feedback(question: &Question, fb: &Feedback, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![if fb.correct {
        Line::from(Span::styled(
            format!("Correct! +{} points", fb.points),
            bold_style.fg(palette.correct),
        ))
    } else if fb.chosen.is_none() {
        Line::from(Span::styled(
            format!("Time's up! The answer was {}", question.correct_answer),
            bold_style.fg(palette.incorrect),
        ))
    } else {
        Line::from(Span::styled(
            format!("Wrong! The answer was {}", question.correct_answer),
            bold_style.fg(palette.incorrect),
        ))
    }];
    if fb.bonus.is_some() {
        lines.push(Line::from(Span::styled(
            "Something special is coming...",
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(lines).render(area, buf);
}

fn render_bonus(points: u32, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(
            "BONUS!",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("+{points} points"),
            Style::default()
                .fg(palette.correct)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    Paragraph::new(lines).alignment(Alignment::Center).render(
        Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        },
        buf,
    );
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let quiz = &app.quiz;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let total = quiz.bank().len();
    let (score, correct) = quiz
        .last_result()
        .map_or((quiz.score(), 0), |r| (r.score, r.correct_count()));
    let pct = percentage(score, total);

    let mut summary = vec![
        Line::from(Span::styled(
            format!("Final score: {score}"),
            bold_style.fg(palette.primary),
        )),
        Line::from(Span::styled(
            format!("{correct}/{total} correct   {pct}%"),
            Style::default().fg(palette.text),
        )),
        Line::from(Span::styled(
            Verdict::from_percentage(pct).message(),
            Style::default().fg(palette.secondary),
        )),
    ];
    if let Some(finished) = quiz.last_result() {
        summary.push(Line::from(Span::styled(
            format!("finished at {}", finished.completed_at.format("%H:%M:%S")),
            Style::default().fg(palette.muted),
        )));
    }
    Paragraph::new(summary)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    leaderboard::table(quiz.leaderboard(), quiz.last_rank(), palette).render(chunks[1], buf);
}
