use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tokio::time::Instant;

use super::app::{App, Focus};
use super::form::Field;
use super::results::RegionId;

fn focused(style: Style, on: bool) -> Style {
    if on {
        style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn draw(f: &mut Frame, app: &App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // inputs
            Constraint::Length(1), // calculate
            Constraint::Length(4), // account 1
            Constraint::Length(4), // account 2
            Constraint::Min(1),    // help
        ])
        .split(f.area());

    // --- INPUTS ---
    let inputs: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let on = app.focus == Focus::Input(*field);
            let cursor = if on { "_" } else { "" };
            Line::from(vec![
                Span::raw(format!("{:<20}", field.title())),
                Span::styled(
                    format!("{}{}", app.form.text(*field), cursor),
                    focused(Style::default(), on),
                ),
            ])
        })
        .collect();
    let inputs = Paragraph::new(inputs).block(Block::default().title("Inputs").borders(Borders::ALL));
    f.render_widget(inputs, chunks[0]);

    // --- CALCULATE ---
    let calculate = Paragraph::new(Span::styled(
        " [ Calculate ] ",
        focused(Style::default(), app.focus == Focus::Calculate),
    ));
    f.render_widget(calculate, chunks[1]);

    // --- ACCOUNTS ---
    draw_account(f, app, now, chunks[2], RegionId::Label1, [(0, RegionId::Lot1), (1, RegionId::Risk1)]);
    draw_account(f, app, now, chunks[3], RegionId::Label2, [(2, RegionId::Lot2), (3, RegionId::Risk2)]);

    // --- HELP ---
    let help = Paragraph::new(
        "Tab/Shift-Tab move  Enter calculate (stop loss) or copy  F5 calculate  Ctrl-C quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[4]);

    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}

fn draw_account(
    f: &mut Frame,
    app: &App,
    now: Instant,
    area: Rect,
    label: RegionId,
    rows: [(usize, RegionId); 2],
) {
    let lines: Vec<Line> = rows
        .iter()
        .map(|(index, region_id)| {
            let region = app.results.region(*region_id);
            let value_style = if region.warning {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let confirmed = app
                .controls
                .get(*index)
                .is_some_and(|c| c.timer.is_confirmed(now));
            let (button, button_style) = if confirmed {
                ("[Copied ✓]", Style::default().fg(Color::Green))
            } else {
                ("[Copy]", Style::default())
            };

            Line::from(vec![
                Span::styled(format!("{:<16}", region.text), value_style),
                Span::styled(button, focused(button_style, app.focus == Focus::Copy(*index))),
            ])
        })
        .collect();

    let block = Block::default()
        .title(app.results.region(label).text.clone())
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_notice(f: &mut Frame, notice: &str) {
    let area = centered(f.area(), 40, 5);
    let popup = Paragraph::new(vec![Line::from(notice.to_string()), Line::from(""), Line::from("[ OK ]")])
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .block(Block::default().title("Notice").borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use tokio::sync::mpsc;

    use super::*;
    use crate::clipboard::testing::FakeClipboard;
    use crate::clipboard::{ClipboardCopier, CopyOutcome};
    use crate::sizing::{RiskCalculator, SizingConfig};

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(
            RiskCalculator::new(SizingConfig::default()),
            ClipboardCopier::new(std::sync::Arc::new(FakeClipboard::default())),
            tx,
        )
    }

    fn render(app: &App, now: Instant) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, app, now)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    /// First (x, y) where `needle` starts.
    fn find(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
        (0..buffer.area.height).find_map(|y| {
            let row = row_text(buffer, y);
            row.find(needle).map(|byte| (row[..byte].chars().count() as u16, y))
        })
    }

    #[test]
    fn test_below_minimum_lot_is_drawn_red() {
        let mut app = app();
        app.form.set(Field::Capital1, "100");
        app.form.set(Field::Capital2, "10000");
        app.form.set(Field::RiskPercent, "1");
        app.form.set(Field::StopLoss, "50");
        app.calculate();

        let buffer = render(&app, Instant::now());

        let (x, y) = find(&buffer, "0.01").unwrap();
        assert_eq!(buffer[(x, y)].fg, Color::Red);
        let (x, y) = find(&buffer, "0.20").unwrap();
        assert_ne!(buffer[(x, y)].fg, Color::Red);
        assert!(find(&buffer, "Account 1 lot size for 50 pips").is_some());
    }

    #[test]
    fn test_copy_button_shows_confirmation_until_expiry() {
        let mut app = app();
        let now = Instant::now();
        app.on_copy_outcome(CopyOutcome { control: 0, result: Ok(()) }, now);

        let buffer = render(&app, now);
        let (x, y) = find(&buffer, "[Copied ✓]").unwrap();
        assert_eq!(buffer[(x, y)].fg, Color::Green);
        // Only the invoking control is confirmed
        let copied_rows = (0..buffer.area.height)
            .filter(|y| row_text(&buffer, *y).contains("[Copied ✓]"))
            .count();
        assert_eq!(copied_rows, 1);

        let later = now + crate::clipboard::COPY_CONFIRM_DURATION;
        app.tick(later);
        let buffer = render(&app, later);
        assert!(find(&buffer, "[Copied ✓]").is_none());
    }

    #[test]
    fn test_notice_popup_is_drawn() {
        let mut app = app();
        app.calculate();

        let buffer = render(&app, Instant::now());

        assert!(find(&buffer, "Stop loss cannot be 0").is_some());
    }
}
