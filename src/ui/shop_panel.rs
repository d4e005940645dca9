use super::{format_coins, UiState};
use idle_miner::core::constants::MAX_MAP_EXPANSIONS;
use idle_miner::core::game_state::GameState;
use idle_miner::core::upgrades::{map_expansion_cost, miner_cost, ore_generation_cost};
use idle_miner::resources::Ore;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draws purchases, ore generation levels and the inventory.
pub fn draw_shop_panel(frame: &mut Frame, area: Rect, state: &GameState, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_shop(frame, chunks[0], state, ui);
    draw_inventory(frame, chunks[1], state);
}

fn draw_shop(frame: &mut Frame, area: Rect, state: &GameState, ui: &UiState) {
    let block = Block::default().borders(Borders::ALL).title(" Shop ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hire = if state.roster.is_full() {
        "full".to_string()
    } else {
        format_coins(miner_cost(state.roster.len()))
    };
    let expand = if state.map_expansions >= MAX_MAP_EXPANSIONS {
        "max".to_string()
    } else {
        format_coins(map_expansion_cost(state.map_expansions))
    };
    let mut lines = vec![
        Line::from(format!("[b] hire miner    {}", hire)),
        Line::from(format!("[e] expand map    {}", expand)),
        Line::from(""),
        Line::from(Span::styled(
            "Ore generation [o] next [g] buy",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let ladder = Ore::LADDER.iter().copied().filter(|ore| ore.is_upgradable());
    for ore in ladder.chain(std::iter::once(Ore::Amethyst)) {
        let name = if ore.is_gem() { "Gems" } else { ore.name() };
        let level = if ore.is_gem() {
            state.resources.gem_level()
        } else {
            state.resources.level(ore)
        };
        let cost = ore_generation_cost(state, ore)
            .map(format_coins)
            .unwrap_or_else(|| "-".to_string());
        let selected = ore == ui.selected_ore || (ore.is_gem() && ui.selected_ore.is_gem());
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{:<7} lv {:>3}  {}", name, level, cost),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_inventory(frame: &mut Frame, area: Rect, state: &GameState) {
    let title = if state.auto_sell_enabled {
        " Ore (auto-sell) "
    } else {
        " Ore "
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = state
        .inventory
        .iter()
        .map(|(ore, count)| Line::from(format!("{:<9}{:>8}", ore.name(), count)))
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "empty",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[x] sell {}", format_coins(state.inventory.total_value())),
        Style::default().fg(Color::Yellow),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}
