//! Caca Cliqueur rendering: score, turd, shop, quests, leaderboard, log and
//! the restart confirmation dialog.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::{
    ASK_RESTART, BUY_AUTO_CLICKER, BUY_MULTIPLIER, CANCEL_RESTART, CONFIRM_RESTART,
    DIALOG_BACKDROP, TAP, TOGGLE_MUTE,
};
use super::logic::format_number;
use super::View;

/// Turd art, idle.
const TURD_ART: &[&str] = &[
    "      ,(  ",
    "     (  )  ",
    "   (      ) ",
    "  (  o  o  )",
    " (__________)",
];

/// Turd art, squashed while the tap feedback is showing.
const TURD_TAP_ART: &[&str] = &[
    "            ",
    "     ,(     ",
    "   (  ~~  ) ",
    "  ( >    < )",
    " (__________)",
];

pub fn render(view: &View, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);

    let (main_area, side_area) = if narrow {
        (area, None)
    } else {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // score
            Constraint::Length(8), // turd
            Constraint::Length(8), // shop + menu
            Constraint::Min(3),    // quests (+ leaderboard/log when narrow)
        ])
        .split(main_area);

    render_score(view, f, chunks[0]);
    render_turd(view, f, chunks[1], click_state);
    render_shop(view, f, chunks[2], click_state);

    match side_area {
        Some(side) => {
            let side_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(13), Constraint::Min(3)])
                .split(side);
            render_quests(view, f, chunks[3]);
            render_leaderboard(view, f, side_chunks[0]);
            render_log(view, f, side_chunks[1]);
        }
        None => {
            let rest = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(3)])
                .split(chunks[3]);
            render_quests(view, f, rest[0]);
            render_leaderboard(view, f, rest[1]);
        }
    }

    if view.confirm_restart {
        render_confirm_dialog(f, area, click_state);
    }
}

fn render_score(view: &View, f: &mut Frame, area: Rect) {
    let state = &view.snapshot.state;
    let mut spans = vec![Span::styled(
        format!("Score: {}", format_number(state.score)),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(best) = view.snapshot.best {
        spans.push(Span::styled(
            format!("  (record: {})", format_number(best)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(gain) = view.feedback {
        spans.push(Span::styled(
            format!("  +{}", format_number(gain)),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Caca Cliqueur "),
        );
    f.render_widget(widget, area);
}

fn render_turd(view: &View, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let art = if view.feedback.is_some() {
        TURD_TAP_ART
    } else {
        TURD_ART
    };
    let art_style = Style::default().fg(Color::Rgb(139, 90, 43));

    let mut lines: Vec<Line> = art
        .iter()
        .map(|row| Line::from(Span::styled(*row, art_style)))
        .collect();
    lines.push(Line::from(Span::styled(
        "(tapez pour cliquer)",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(139, 90, 43)));
    let inner = block.inner(area);
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(widget, area);

    // Whole panel is the tap target
    click_state.borrow_mut().add_click_target(inner, TAP);
}

fn render_shop(view: &View, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = &view.snapshot.state;
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let afford_style = |affordable: bool| {
        if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [M] ", key_style),
            Span::styled(
                format!(
                    "Acheter multiplicateur (x{}) - Coût: {}",
                    state.multiplier,
                    format_number(state.multiplier_cost)
                ),
                afford_style(view.snapshot.can_afford_multiplier),
            ),
        ]),
        BUY_MULTIPLIER,
    );
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [A] ", key_style),
            Span::styled(
                format!(
                    "Acheter clic automatique ({}/sec) - Coût: {}",
                    state.auto_rate,
                    format_number(state.auto_click_cost)
                ),
                afford_style(view.snapshot.can_afford_auto_clicker),
            ),
        ]),
        BUY_AUTO_CLICKER,
    );
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [R] ", key_style),
            Span::styled("Recommencer la partie", Style::default().fg(Color::Red)),
        ]),
        ASK_RESTART,
    );
    let mute_label = if view.muted {
        "Réactiver le son"
    } else {
        "Mettre en sourdine"
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [S] ", key_style),
            Span::styled(mute_label, Style::default().fg(Color::Cyan)),
        ]),
        TOGGLE_MUTE,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Boutique ");
    let inner_width = block.inner(area).width;
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, inner_width);

    let widget = Paragraph::new(cl.into_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_quests(view: &View, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = view
        .snapshot
        .quests
        .iter()
        .map(|q| {
            let style = if q.completed {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            let mark = if q.completed { "✔" } else { "·" };
            Line::from(Span::styled(
                format!(" {} {} - {}", mark, q.description, q.status_label()),
                style,
            ))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Quêtes "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_leaderboard(view: &View, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = if view.snapshot.leaderboard.is_empty() {
        vec![Line::from(Span::styled(
            " Aucun score pour l'instant",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.snapshot
            .leaderboard
            .iter()
            .enumerate()
            .map(|(i, score)| {
                let style = if i == 0 {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(
                    format!(" {}. Score: {} clics", i + 1, format_number(*score)),
                    style,
                ))
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Classement des meilleurs joueurs "),
    );
    f.render_widget(widget, area);
}

fn render_log(view: &View, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest entries first, limited to the visible area
    let log_lines: Vec<Line> = view
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let style = if entry.is_important {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if i == 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Journal "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_confirm_dialog(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let width = area.width.saturating_sub(4).min(50);
    let inner_width = width.saturating_sub(2);

    let question = Paragraph::new("Voulez-vous vraiment recommencer la partie ?")
        .wrap(Wrap { trim: true });
    let question_rows = question.line_count(inner_width.max(1)) as u16;

    let mut cl = ClickableList::new();
    for _ in 0..question_rows {
        cl.push(Line::from(""));
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            " [O] Oui",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        CONFIRM_RESTART,
    );
    cl.push_clickable(
        Line::from(Span::styled(" [N] Non", Style::default().fg(Color::White))),
        CANCEL_RESTART,
    );

    let height = (cl.len() as u16 + 2).min(area.height);
    let dialog = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Confirmation ");
    let inner = block.inner(dialog);

    {
        let mut cs = click_state.borrow_mut();
        cs.add_click_target(area, DIALOG_BACKDROP);
        cl.register_targets(dialog, &mut cs, 1, 1, 0);
    }

    f.render_widget(Clear, dialog);
    f.render_widget(block, dialog);
    f.render_widget(Paragraph::new(cl.into_lines()), inner);
    f.render_widget(
        question,
        Rect::new(inner.x, inner.y, inner.width, question_rows.min(inner.height)),
    );
}
