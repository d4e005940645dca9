use super::{format_coins, UiState};
use idle_miner::core::constants::{
    MAX_MINERS, MAX_RADIUS_LEVEL, MAX_SPEED_LEVEL, SPECIALIZATION_UNLOCK_COST,
};
use idle_miner::core::game_state::GameState;
use idle_miner::core::upgrades::{class_upgrade_cost, radius_upgrade_cost, speed_upgrade_cost};
use idle_miner::miners::{ClassUpgrade, MinerStats, Unit};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draws the roster list and the selected miner's details.
pub fn draw_miner_panel(frame: &mut Frame, area: Rect, state: &GameState, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_roster(frame, chunks[0], state, ui);
    draw_selected(frame, chunks[1], state, ui);
}

fn draw_roster(frame: &mut Frame, area: Rect, state: &GameState, ui: &UiState) {
    let title = format!(" Miners {}/{} ", state.roster.len(), MAX_MINERS);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.roster.is_empty() {
        let hint = Paragraph::new("No miners yet. Press b to hire one.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    }

    // Keep the selection visible in a short panel.
    let visible = inner.height as usize;
    let first = ui.selected_miner.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = state
        .roster
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, unit)| {
            let stats = MinerStats::resolve(&state.roster, i);
            let rate = stats.map(|s| s.clicks_per_second).unwrap_or(0.0);
            let style = if i == ui.selected_miner {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!(
                    "#{:<2} {:<13} spd {:>2} rad {:>2} {:>5.2}/s {}",
                    i + 1,
                    class_label(unit),
                    unit.speed_level,
                    unit.radius_level,
                    rate,
                    unit.targeting.name()
                ),
                style,
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn class_label(unit: &Unit) -> &'static str {
    if unit.specialization_unlocked {
        unit.kind().name()
    } else {
        "-"
    }
}

fn draw_selected(frame: &mut Frame, area: Rect, state: &GameState, ui: &UiState) {
    let block = Block::default().borders(Borders::ALL).title(" Selected ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(unit) = state.roster.get(ui.selected_miner) else {
        return;
    };
    let Some(stats) = MinerStats::resolve(&state.roster, ui.selected_miner) else {
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Miner #{} ", ui.selected_miner + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "{:.2} triggers/s, reach {:.0}px, next in {:.1}s",
                stats.clicks_per_second,
                stats.effect_radius,
                unit.cooldown.max(0.0)
            )),
        ]),
        upgrade_line(
            "[s] speed",
            unit.speed_level,
            MAX_SPEED_LEVEL,
            speed_upgrade_cost(unit.speed_level),
        ),
        upgrade_line(
            "[r] radius",
            unit.radius_level,
            MAX_RADIUS_LEVEL,
            radius_upgrade_cost(unit.radius_level),
        ),
    ];

    if !unit.specialization_unlocked {
        lines.push(Line::from(Span::styled(
            format!("[u] unlock classes: {}", format_coins(SPECIALIZATION_UNLOCK_COST)),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        let kind = unit.kind();
        lines.push(Line::from(vec![
            Span::styled(
                format!("[c] {} ", kind.name()),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled(kind.description(), Style::default().fg(Color::DarkGray)),
        ]));
        for (n, upgrade) in ClassUpgrade::for_kind(kind).into_iter().enumerate() {
            let level = unit.specialization.level(upgrade).unwrap_or(0);
            let label = format!("[{}] {}", n + 1, upgrade.name());
            lines.push(upgrade_line(
                &label,
                level,
                upgrade.max_level(),
                class_upgrade_cost(upgrade, level),
            ));
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn upgrade_line(label: &str, level: u32, max: u32, cost: f64) -> Line<'static> {
    let price = if level >= max {
        Span::styled("MAX", Style::default().fg(Color::Green))
    } else {
        Span::styled(format_coins(cost), Style::default().fg(Color::Yellow))
    };
    Line::from(vec![
        Span::raw(format!("{:<20} {:>2}/{:<2} ", label, level, max)),
        price,
    ])
}
