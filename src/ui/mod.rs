mod map_view;
mod miner_panel;
mod shop_panel;

use idle_miner::build_info;
use idle_miner::core::game_state::GameState;
use idle_miner::mining::Mine;
use idle_miner::resources::Ore;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Front-end only selection state; never saved.
#[derive(Debug, Clone)]
pub struct UiState {
    pub selected_miner: usize,
    /// Tile index under the map cursor.
    pub cursor: usize,
    /// Ore targeted by the generation upgrade key.
    pub selected_ore: Ore,
    pub status: String,
    pub confirm_reset: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            selected_miner: 0,
            cursor: 0,
            selected_ore: Ore::Coal,
            status: String::from("Welcome to the mine. Press h for help."),
            confirm_reset: false,
        }
    }

    /// Keeps the selections inside the current roster and map.
    pub fn clamp(&mut self, state: &GameState) {
        let owned = state.roster.len();
        if owned == 0 {
            self.selected_miner = 0;
        } else if self.selected_miner >= owned {
            self.selected_miner = owned - 1;
        }
        let tiles = state.side() * state.side();
        if self.cursor >= tiles {
            self.cursor = tiles.saturating_sub(1);
        }
    }

    pub fn move_cursor(&mut self, side: usize, d_col: i32, d_row: i32) {
        if side == 0 {
            return;
        }
        let row = (self.cursor / side) as i32;
        let col = (self.cursor % side) as i32;
        let max = side as i32 - 1;
        let row = (row + d_row).clamp(0, max) as usize;
        let col = (col + d_col).clamp(0, max) as usize;
        self.cursor = row * side + col;
    }

    pub fn cycle_ore(&mut self) {
        let upgradable: Vec<Ore> = Ore::ALL
            .iter()
            .copied()
            .filter(|ore| ore.is_upgradable() && !ore.is_gem())
            .chain(std::iter::once(Ore::Amethyst))
            .collect();
        let at = upgradable
            .iter()
            .position(|ore| {
                *ore == self.selected_ore || (ore.is_gem() && self.selected_ore.is_gem())
            })
            .unwrap_or(0);
        self.selected_ore = upgradable[(at + 1) % upgradable.len()];
    }
}

/// Draws the whole screen: header, map, side panels and footer.
pub fn draw_ui(frame: &mut Frame, state: &GameState, mine: &Mine, ui: &UiState) {
    let size = frame.size();

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Map + panels
            Constraint::Length(4), // Footer
        ])
        .split(size);

    draw_header(frame, v_chunks[0], state);

    // Left-handed mode puts the panels on the left.
    let (map_pct, side_pct) = (55, 45);
    let constraints = if state.left_handed_mode {
        [Constraint::Percentage(side_pct), Constraint::Percentage(map_pct)]
    } else {
        [Constraint::Percentage(map_pct), Constraint::Percentage(side_pct)]
    };
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(v_chunks[1]);
    let (map_area, side_area) = if state.left_handed_mode {
        (h_chunks[1], h_chunks[0])
    } else {
        (h_chunks[0], h_chunks[1])
    };

    map_view::draw_map(frame, map_area, state, mine, ui);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(side_area);
    miner_panel::draw_miner_panel(frame, side_chunks[0], state, ui);
    shop_panel::draw_shop_panel(frame, side_chunks[1], state, ui);

    draw_footer(frame, v_chunks[2], ui);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &GameState) {
    let income = idle_miner::core::estimate_coins_per_second(state);
    let header_text = vec![Line::from(vec![
        Span::styled(
            format!("Coins: {}", format_coins(state.coins)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("~{}/s", format_coins(income)),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Miners: {}", state.roster.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Play time: {}", format_duration(state.active_play_seconds)),
            Style::default().fg(Color::Gray),
        ),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Idle Miner {} ", build_info::BUILD_VERSION)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, ui: &UiState) {
    let keys = if ui.confirm_reset {
        Line::from(Span::styled(
            "Reset ALL progress? [y] confirm  [n] cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "arrows move | space mine | tab miner | b buy | s/r speed/radius | u/c class | 1-3 class upg | t target | m move | o/g ore | e expand | a/x sell | l hand | R reset | q quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let footer = Paragraph::new(vec![keys, Line::from(ui.status.as_str())])
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

/// Compact coin amounts: 950, 12.3K, 4.56M, ...
pub fn format_coins(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if value >= scale {
            return format!("{:.2}{}", value / scale, suffix);
        }
    }
    format!("{:.0}", value)
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}h {:02}m {:02}s", total / 3600, (total / 60) % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(950.0), "950");
        assert_eq!(format_coins(12_300.0), "12.30K");
        assert_eq!(format_coins(4_560_000.0), "4.56M");
    }

    #[test]
    fn test_cursor_stays_on_map() {
        let mut ui = UiState::new();
        ui.move_cursor(3, -1, -1);
        assert_eq!(ui.cursor, 0);
        ui.move_cursor(3, 5, 5);
        assert_eq!(ui.cursor, 8);
    }

    #[test]
    fn test_cycle_ore_treats_gems_as_one() {
        let mut ui = UiState::new();
        let mut seen = Vec::new();
        for _ in 0..6 {
            ui.cycle_ore();
            seen.push(ui.selected_ore);
        }
        assert_eq!(
            seen,
            vec![
                Ore::Copper,
                Ore::Iron,
                Ore::Silver,
                Ore::Gold,
                Ore::Amethyst,
                Ore::Coal
            ]
        );
    }
}
