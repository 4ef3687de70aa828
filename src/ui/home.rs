use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::TILES_PER_ROW;
use crate::games::GameKind;
use crate::scores::{HighScores, GAME_NAMES, NUM_GAMES};

const BANNER: &str = r#"
 ╔════════════════════════════════════════════════════════════════════════════════╗
 ║  ███╗   ██╗ ███████╗  ██████╗  ███╗   ██╗  ██████╗  █████╗  ██████╗  ███████╗  ║
 ║  ████╗  ██║ ██╔════╝ ██╔═══██╗ ████╗  ██║ ██╔════╝ ██╔══██╗ ██╔══██╗ ██╔════╝  ║
 ║  ██╔██╗ ██║ █████╗   ██║   ██║ ██╔██╗ ██║ ██║      ███████║ ██║  ██║ █████╗    ║
 ║  ██║╚██╗██║ ██╔══╝   ██║   ██║ ██║╚██╗██║ ██║      ██╔══██║ ██║  ██║ ██╔══╝    ║
 ║  ██║ ╚████║ ███████╗ ╚██████╔╝ ██║ ╚████║ ╚██████╗ ██║  ██║ ██████╔╝ ███████╗  ║
 ║  ╚═╝  ╚═══╝ ╚══════╝  ╚═════╝  ╚═╝  ╚═══╝  ╚═════╝ ╚═╝  ╚═╝ ╚═════╝  ╚══════╝  ║
 ╚════════════════════════════════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; NUM_GAMES] = [
    GameTile { key: "1", icon: "🧱", name: "Breakout", desc: "Smash 80 bricks\nwith a glowing ball!", color: Color::Rgb(220, 80, 80), border_color: Color::Rgb(120, 40, 40) },
    GameTile { key: "2", icon: "🐤", name: "Flappy", desc: "Flap through the\nneon pipes!", color: Color::Rgb(255, 210, 60), border_color: Color::Rgb(140, 110, 30) },
    GameTile { key: "3", icon: "🚀", name: "Shooter", desc: "Blast waves of\nincoming ships!", color: Color::Rgb(200, 120, 255), border_color: Color::Rgb(100, 60, 140) },
    GameTile { key: "4", icon: "🏓", name: "Pong", desc: "Two players,\nfirst to ten!", color: Color::Rgb(80, 200, 255), border_color: Color::Rgb(40, 100, 140) },
    GameTile { key: "5", icon: "🐍", name: "Snake", desc: "Eat, grow and\ndon't bite yourself!", color: Color::Rgb(80, 220, 80), border_color: Color::Rgb(40, 120, 40) },
];

/// Icon and accent colour a game uses across the UI.
pub fn game_look(kind: GameKind) -> (&'static str, Color) {
    let tile = &GAME_TILES[kind.index()];
    (tile.icon, tile.color)
}

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let mut lines: Vec<Line> = Vec::new();

    // Key + Icon + Name line
    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    lines.push(Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ]));

    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(vec![
            Span::styled(desc_line, Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) })),
        ]));
    }

    if selected {
        lines.push(Line::from(vec![
            Span::styled("▶ Enter to play", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

/// One `key  action` row of a controls panel
fn control(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {key:<17}"), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn heading(tile: &GameTile, tagline: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} {}", tile.icon, tile.name), Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(format!("  {tagline}"), Style::default().fg(Color::Rgb(100, 100, 120))),
        ]),
        Line::from(""),
    ]
}

fn game_controls(game_idx: usize) -> Vec<Line<'static>> {
    let Some(tile) = GAME_TILES.get(game_idx) else { return vec![] };
    let (tagline, rows): (&str, Vec<(&'static str, &'static str)>) = match game_idx {
        0 => ("Clear the wall, keep the ball up!", vec![
            ("← / →", "Move paddle"),
            ("R", "Restart after game over"),
        ]),
        1 => ("One tap per flap, mind the gaps!", vec![
            ("Space", "Start / Flap"),
            ("R", "Back to title after a crash"),
        ]),
        2 => ("Hold the line against the fleet!", vec![
            ("↑ / ↓ + Enter", "Menu"),
            ("↑ ↓ ← →", "Fly"),
            ("Space (hold)", "Fire"),
            ("R / Q", "Retry / Leave after game over"),
        ]),
        3 => ("Local two player, first to ten!", vec![
            ("W / S", "Left paddle"),
            ("↑ / ↓", "Right paddle"),
            ("Space", "Pause / Resume"),
            ("R", "New match"),
        ]),
        4 => ("Eat the food, don't hit yourself!", vec![
            ("↑ ↓ ← →", "Steer"),
            ("Space", "Pause / Restart"),
            ("R", "Restart after game over"),
        ]),
        _ => return vec![],
    };
    let mut lines = heading(tile, tagline);
    lines.extend(rows.into_iter().map(|(key, action)| control(key, action)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize, show_high_scores: bool, high_scores: &HighScores) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(12), // Game tiles (2 rows)
            Constraint::Min(10),    // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(255, 80, 200)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(vec![
        Span::styled(
            "  ⚡ Five Neon Classics ⚡  ",
            Style::default()
                .fg(Color::Rgb(80, 255, 220))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games · ↑↓←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);

    // Both rows share the column width so the short row lines up under the first
    let columns = [Constraint::Ratio(1, TILES_PER_ROW as u32); TILES_PER_ROW];
    for (row, row_area) in tile_rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(columns)
            .split(*row_area);
        for (col, col_area) in cols.iter().enumerate() {
            let idx = row * TILES_PER_ROW + col;
            if let Some(tile) = GAME_TILES.get(idx) {
                render_game_tile(frame, *col_area, tile, selected_game == idx);
            }
        }
    }

    // Controls area: navigation left, game controls right
    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let mut nav = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  🔧 Navigation", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
    ];
    nav.extend([
        control("Tab / Shift+Tab", "Switch tabs"),
        control("1-5", "Launch game"),
        control("↑ ↓ ← →", "Select game"),
        control("Enter", "Play selected"),
        control("Esc", "Return to Home"),
        control("H", "High scores"),
        control("q / Ctrl+C", "Quit"),
    ]);
    let controls = Paragraph::new(nav).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    // Controls for the selected game
    let tile = &GAME_TILES[selected_game.min(NUM_GAMES - 1)];
    let game_ctrl = Paragraph::new(game_controls(selected_game)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" 🎮 {} Control ", tile.name))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" High Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    if show_high_scores {
        render_high_scores_overlay(frame, area, high_scores);
    }
}

fn render_high_scores_overlay(frame: &mut Frame, area: Rect, high_scores: &HighScores) {
    let overlay_w = 50u16.min(area.width.saturating_sub(4));
    let overlay_h = 30u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 High Scores ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let medals = [
        ("🥇", Color::Rgb(255, 215, 0)),
        ("🥈", Color::Rgb(192, 192, 192)),
        ("🥉", Color::Rgb(205, 127, 50)),
    ];

    let mut lines: Vec<Line> = vec![Line::from("")];

    for (game_idx, tile) in GAME_TILES.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", tile.icon), Style::default()),
            Span::styled(GAME_NAMES[game_idx], Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
        ]));

        // Pong is a two player match and keeps no table
        if game_idx == GameKind::Pong.index() {
            lines.push(Line::from(vec![
                Span::styled("    Head to head only", Style::default().fg(Color::Rgb(60, 60, 80))),
            ]));
            continue;
        }

        let scores = high_scores.top_scores(game_idx);
        let ranked: Vec<_> = scores.iter().zip(medals.iter()).filter(|(e, _)| e.score > 0).collect();
        if ranked.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("    No scores yet", Style::default().fg(Color::Rgb(60, 60, 80))),
            ]));
        }
        for (entry, (medal, color)) in ranked {
            let name_display = if entry.name.is_empty() {
                "???".to_string()
            } else {
                format!("{:<9}", entry.name)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("    {medal} "), Style::default()),
                Span::styled(format!("{name_display} "), Style::default().fg(Color::Rgb(200, 200, 220))),
                Span::styled(entry.score.to_string(), Style::default().fg(*color).add_modifier(Modifier::BOLD)),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
