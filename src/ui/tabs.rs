use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::ui::home::game_look;

const GOLD: Color = Color::Rgb(255, 220, 80);
const IDLE: Color = Color::Rgb(120, 120, 140);

/// One tab: the game's icon and name, plus its running score once a run
/// has points on the board.
fn tab_label(tab: Tab, score: u32, active: bool) -> Line<'static> {
    let Some(kind) = tab.game() else {
        let style = if active { Style::default().fg(GOLD).add_modifier(Modifier::BOLD) } else { Style::default().fg(IDLE) };
        return Line::from(Span::styled("🏠 Home", style));
    };

    let (icon, accent) = game_look(kind);
    let name_style = if active {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(IDLE)
    };
    let mut spans = vec![Span::styled(format!("{icon} {}", kind.name()), name_style)];
    if score > 0 {
        spans.push(Span::styled(format!(" {score}"), Style::default().fg(GOLD)));
    }
    Line::from(spans)
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|&t| {
            let score = t.game().map_or(0, |kind| app.scene(kind).score());
            tab_label(t, score, t == app.current_tab)
        })
        .collect();

    let frame_color = app
        .current_tab
        .game()
        .map_or(Color::Rgb(60, 150, 200), |kind| game_look(kind).1);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(frame_color))
                .border_type(BorderType::Rounded)
                .title(" 🕹 NeonCade ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(200, 120, 255))
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(app.current_tab.index())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .divider(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
