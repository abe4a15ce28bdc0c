//! Rendering - Dashboard drawing: header, advisory, prayer cards, hadith, dua, footer

use chrono::{Datelike, Local};
use noor_common::labels::{
    app_title, civil_date_label, daily_dua_translation, format_clock, format_countdown,
    format_time, hadith_heading, hijri_suffix, loading_text, location_advisory,
    next_prayer_heading, prayer_label, DAILY_DUA,
};
use noor_common::schedule::is_highlighted;
use noor_common::session::Phase;
use noor_common::DailySchedule;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::layout::{centered, compute_layout};
use super::state::DashboardState;

/// Draw the whole dashboard for the current state
pub fn draw_ui(f: &mut Frame, state: &DashboardState) {
    let area = f.size();
    let schedule = match (state.phase(), state.session.schedule()) {
        (Phase::Ready, Some(schedule)) => schedule,
        _ => {
            draw_loading(f, area, state);
            return;
        }
    };

    let grid = compute_layout(area, state.session.location_denied());

    draw_header(f, grid.header, state, &schedule);
    if grid.advisory.height > 0 {
        draw_advisory(f, grid.advisory, state);
    }
    draw_cards(f, &grid.cards, state, &schedule);
    draw_reflection(f, grid.reflection, state);
    if grid.sidebar.width > 0 {
        draw_dua(f, grid.sidebar, state);
    }
    draw_footer(f, grid.footer, state);
}

fn draw_loading(f: &mut Frame, area: Rect, state: &DashboardState) {
    let text = vec![
        Line::from(Span::styled(
            app_title(state.language),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            loading_text(state.language),
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, centered(area, 40, 5));
}

fn draw_header(f: &mut Frame, area: Rect, state: &DashboardState, schedule: &DailySchedule) {
    let language = state.language;
    let local_now = state.now.with_timezone(&Local);
    let next = state.next;

    let countdown = state
        .session
        .countdown(state.now)
        .map(format_countdown)
        .unwrap_or_else(|| "--:--:--".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(
                app_title(language),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format_clock(&local_now),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{}: ", next_prayer_heading(language)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                prayer_label(next, language),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(countdown, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw(civil_date_label(schedule.calendar_date(), language)),
            Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} {}", schedule.hijri_date(), hijri_suffix(language)),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_advisory(f: &mut Frame, area: Rect, state: &DashboardState) {
    let paragraph = Paragraph::new(location_advisory(state.language))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(paragraph, area);
}

fn draw_cards(f: &mut Frame, cards: &[Rect], state: &DashboardState, schedule: &DailySchedule) {
    let next = state.next;

    for (event, area) in schedule.events().iter().zip(cards) {
        let highlighted = is_highlighted(event.name, next);
        let (border, text) = if highlighted {
            (
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default().fg(Color::DarkGray), Style::default().fg(Color::White))
        };

        let lines = vec![
            Line::from(Span::styled(prayer_label(Some(event.name), state.language), text)),
            Line::from(""),
            Line::from(Span::styled(
                format_time(&event.instant.with_timezone(&Local)),
                text,
            )),
        ];
        let card = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(card, *area);
    }
}

fn draw_reflection(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", hadith_heading(state.language)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines = match state.session.reflection() {
        Some(reflection) => vec![
            Line::from(Span::styled(
                format!("\"{}\"", reflection.hadith_text),
                Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                format!("- {}", reflection.reference_label),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(reflection.reflection_text.as_str()),
        ],
        None => vec![Line::from(Span::styled(
            loading_text(state.language),
            Style::default().fg(Color::Gray),
        ))],
    };

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_dua(f: &mut Frame, area: Rect, state: &DashboardState) {
    let lines = vec![
        Line::from(Span::styled(
            DAILY_DUA,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            daily_dua_translation(state.language),
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let year = state.now.with_timezone(&Local).year();
    let text = format!(
        "© {} Noor Prayer App. Calculated using {} Method.  [q] quit",
        year,
        state.method()
    );
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
