use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pentaforge::config::FINGER_COUNT;
use pentaforge::geometry::{KeyId, KeyboardGeometry};
use pentaforge::keymap::Keymap;
use pentaforge::optimizer::SearchSnapshot;
use pentaforge::scorer::ScoreDetails;

const FINGER_NAMES: [&str; FINGER_COUNT] = ["LP", "LR", "LM", "LI", "RI", "RM", "RR", "RP"];

/// Letters placed on the board grid, indexed `[row][column]`. Keys without
/// a letter hold `.`; gaps between keys hold a space.
fn board_grid(geometry: &KeyboardGeometry, keymap: &Keymap) -> Vec<Vec<char>> {
    let mut grid: Vec<Vec<char>> = Vec::new();
    for k in 0..geometry.key_count() {
        let key = KeyId(k as u8);
        let (row, col) = geometry.grid_position(key);
        if grid.len() <= row {
            grid.resize(row + 1, Vec::new());
        }
        let cells = &mut grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, ' ');
        }
        cells[col] = keymap.letter_on(key).map_or('.', |l| l.to_char());
    }
    grid
}

/// Board rows as plain text, one string per physical row.
pub fn render_rows(geometry: &KeyboardGeometry, keymap: &Keymap) -> Vec<String> {
    board_grid(geometry, keymap)
        .into_iter()
        .map(|cells| {
            let line: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
            line.join(" ").trim_end().to_string()
        })
        .collect()
}

pub fn print_layout_grid(name: &str, geometry: &KeyboardGeometry, keymap: &Keymap) {
    println!("\nLayout: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for cells in board_grid(geometry, keymap) {
        let cells: Vec<Cell> = cells
            .iter()
            .map(|&c| Cell::new(c).set_alignment(CellAlignment::Center))
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

/// Per-term breakdown, best fitness first.
pub fn print_scoring_report(results: &[(String, ScoreDetails)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Fitness").fg(Color::Cyan),
        Cell::new("Dist"),
        Cell::new("FingIneq"),
        Cell::new("SameFing").fg(Color::Red),
        Cell::new("RowJump").fg(Color::Red),
        Cell::new("4Hand"),
        Cell::new("5Hand"),
        Cell::new("Inroll").fg(Color::Green),
    ]);

    for i in 1..=8 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, d) in results {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.5}", d.fitness)).fg(Color::Cyan),
            Cell::new(format!("{:.3}", d.distance)),
            Cell::new(format!("{:.4}", d.finger_inequality)),
            Cell::new(format!("{:.4}", d.same_finger)).fg(Color::Red),
            Cell::new(format!("{:.4}", d.row_jumps)).fg(Color::Red),
            Cell::new(format!("{:.4}", d.four_same_hand)),
            Cell::new(format!("{:.4}", d.five_same_hand)),
            Cell::new(format!("{:.4}", d.inrolls)).fg(Color::Green),
        ]);
    }
    println!("\n{}", table);
}

/// Observed finger shares against the configured targets, in percent.
pub fn print_finger_report(results: &[(String, ScoreDetails)], targets: &[f64; FINGER_COUNT]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Layout").add_attribute(Attribute::Bold)];
    header.extend(
        FINGER_NAMES
            .iter()
            .zip(targets)
            .map(|(name, t)| Cell::new(format!("{}\n{:.0}", name, t * 100.0))),
    );
    table.add_row(header);

    for i in 1..=FINGER_COUNT {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, d) in results {
        let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        row.extend(d.finger_load.iter().zip(targets).map(|(load, target)| {
            let cell = Cell::new(format!("{:.1}", load * 100.0));
            if (load - target).abs() > 0.03 {
                cell.fg(Color::Yellow)
            } else {
                cell
            }
        }));
        table.add_row(row);
    }
    println!("\n{}", table);
}

pub fn print_snapshot(snapshot: &SearchSnapshot) {
    println!(
        "Fitness: {:.6} (generation {})",
        snapshot.fitness, snapshot.best_generation
    );
    println!(
        "Generations: {} | Layouts: {} | {:.1}s | {:.0} layouts/s",
        snapshot.generations,
        snapshot.layouts_evaluated,
        snapshot.elapsed_secs,
        snapshot.throughput
    );
}
