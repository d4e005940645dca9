use super::UiState;
use idle_miner::core::constants::TILE_SIZE_PX;
use idle_miner::core::game_state::GameState;
use idle_miner::map::geometry::covered_tiles;
use idle_miner::map::{Enchantment, Point, TileGrid};
use idle_miner::miners::MinerStats;
use idle_miner::mining::Mine;
use idle_miner::resources::Ore;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Tile a pixel position falls on.
fn tile_at(point: &Point, side: usize) -> usize {
    let clamp = |v: f64| ((v / TILE_SIZE_PX).floor().max(0.0) as usize).min(side.saturating_sub(1));
    clamp(point.y) * side + clamp(point.x)
}

fn ore_color(ore: Ore) -> Color {
    match ore {
        Ore::Sand => Color::DarkGray,
        Ore::Coal => Color::Gray,
        Ore::Copper => Color::LightRed,
        Ore::Iron => Color::White,
        Ore::Silver => Color::LightCyan,
        Ore::Gold => Color::Yellow,
        _ => Color::Magenta,
    }
}

/// Draws the tile grid with miners, the cursor and the selected miner's reach.
pub fn draw_map(frame: &mut Frame, area: Rect, state: &GameState, mine: &Mine, ui: &UiState) {
    let side = mine.side();
    let title = format!(" Mine {}x{} ", side, side);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let reach: Vec<usize> = state
        .roster
        .get(ui.selected_miner)
        .zip(MinerStats::resolve(&state.roster, ui.selected_miner))
        .map(|(unit, stats)| covered_tiles(side, &unit.position, stats.effect_radius))
        .unwrap_or_default();

    let mut occupant: Vec<Option<usize>> = vec![None; side * side];
    for (i, unit) in state.roster.iter().enumerate() {
        if let Some(slot) = occupant.get_mut(tile_at(&unit.position, side)) {
            slot.get_or_insert(i);
        }
    }

    let mut lines = Vec::with_capacity(side + 2);
    for row in 0..side {
        let mut spans = Vec::with_capacity(side);
        for col in 0..side {
            let index = row * side + col;
            let Some(tile) = mine.grid.tile(index) else {
                continue;
            };
            let marker = match tile.enchantment {
                Enchantment::None => ' ',
                Enchantment::Bountiful { .. } => '+',
                Enchantment::Enriched { .. } => '$',
            };
            let (glyph, mut style) = if tile.cooldown {
                ('·', Style::default().fg(Color::DarkGray))
            } else {
                (tile.ore.glyph(), Style::default().fg(ore_color(tile.ore)))
            };
            let text = match occupant[index] {
                Some(miner) => {
                    style = style.add_modifier(Modifier::BOLD);
                    format!("{}{}{}", miner_label(miner), glyph, marker)
                }
                None => format!(" {}{}", glyph, marker),
            };
            if reach.contains(&index) {
                style = style.bg(Color::Rgb(30, 30, 60));
            }
            if index == ui.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("respawning: {}", mine.respawns.len()),
        Style::default().fg(Color::DarkGray),
    )));

    let map = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(map, inner);
}

/// Miner numbers as 1-9 then a-k.
fn miner_label(index: usize) -> char {
    std::char::from_digit((index as u32 + 1) % 36, 36).unwrap_or('*')
}
