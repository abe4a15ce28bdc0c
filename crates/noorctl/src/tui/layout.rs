//! Layout - Dashboard grid computation
//!
//! Splits the terminal into header, advisory banner, prayer cards, hadith
//! panel, dua panel and footer. Degrades on small terminals by dropping the
//! advisory banner first, then the side panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Dashboard layout structure containing all panel rectangles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    /// Title, clock, next prayer, dates (top)
    pub header: Rect,
    /// Location advisory (zero height when not shown)
    pub advisory: Rect,
    /// Six prayer cards, left to right
    pub cards: Vec<Rect>,
    /// Hadith of the day
    pub reflection: Rect,
    /// Daily dua (zero width on narrow terminals)
    pub sidebar: Rect,
    /// Method credit (bottom)
    pub footer: Rect,
}

const HEADER_HEIGHT: u16 = 4;
const ADVISORY_HEIGHT: u16 = 3;
const CARD_HEIGHT: u16 = 5;
const FOOTER_HEIGHT: u16 = 1;
const MIN_REFLECTION_HEIGHT: u16 = 5;
const MIN_SIDEBAR_WIDTH: u16 = 90;

/// Compute the dashboard grid for `area`
pub fn compute_layout(area: Rect, show_advisory: bool) -> DashboardLayout {
    let fixed = HEADER_HEIGHT + CARD_HEIGHT + FOOTER_HEIGHT;
    let show_advisory =
        show_advisory && area.height >= fixed + ADVISORY_HEIGHT + MIN_REFLECTION_HEIGHT;
    let advisory_height = if show_advisory { ADVISORY_HEIGHT } else { 0 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(advisory_height),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(rows[2])
        .to_vec();

    let (reflection, sidebar) = if area.width >= MIN_SIDEBAR_WIDTH {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
            .split(rows[3]);
        (cols[0], cols[1])
    } else {
        (rows[3], Rect::new(rows[3].x, rows[3].y, 0, 0))
    };

    DashboardLayout {
        header: rows[0],
        advisory: rows[1],
        cards,
        reflection,
        sidebar,
        footer: rows[4],
    }
}

/// Centered box for the loading screen
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
