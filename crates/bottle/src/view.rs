use crate::session::Session;
use crate::sound::SoundSink;
use spinring::angle;
use spinring::{PlayerSlot, RING_RADIUS, SelectionEngine, SlotMark};
use std::fmt::Write;

const GRID_WIDTH: usize = 41;
const GRID_HEIGHT: usize = 15;
const X_SCALE: f64 = 16.0; // columns per ring radius
const Y_SCALE: f64 = 6.0; // rows per ring radius, terminal cells are tall

struct SlotRenderer<'a> {
    slot: &'a PlayerSlot,
    mark: SlotMark,
}

impl<'a> SlotRenderer<'a> {
    fn new(slot: &'a PlayerSlot, mark: SlotMark) -> Self {
        Self { slot, mark }
    }

    fn label(&self) -> String {
        match self.mark {
            SlotMark::Selected => format!("[{}]", self.slot.id),
            SlotMark::Completed => format!("({})", self.slot.id),
            SlotMark::Available => self.slot.id.to_string(),
        }
    }

    fn cell(&self) -> (usize, usize) {
        let (cx, cy) = ((GRID_WIDTH / 2) as f64, (GRID_HEIGHT / 2) as f64);
        let col = cx + (self.slot.offset.x / RING_RADIUS * X_SCALE).round();
        let row = cy + (self.slot.offset.y / RING_RADIUS * Y_SCALE).round();
        (col.max(0.0) as usize, row.max(0.0) as usize)
    }

    fn draw(&self, grid: &mut [Vec<char>]) {
        let label = self.label();
        let (col, row) = self.cell();
        let start = col.saturating_sub(label.chars().count() / 2);

        if let Some(line) = grid.get_mut(row) {
            for (i, c) in label.chars().enumerate() {
                if let Some(cell) = line.get_mut(start + i) {
                    *cell = c;
                }
            }
        }
    }
}

/// Arrow for the direction a ring angle faces, in eighths of a turn.
fn pointer_glyph(ring: f64) -> char {
    const GLYPHS: [char; 8] = ['←', '↖', '↑', '↗', '→', '↘', '↓', '↙'];
    let sector = (angle::normalize(ring + 22.5) / 45.0) as usize;
    GLYPHS[sector % GLYPHS.len()]
}

pub fn draw_ring<S: SoundSink>(session: &Session<S>) -> String {
    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];

    let ring = angle::pointer_to_ring(session.rotation(), session.pointer().rest);
    grid[GRID_HEIGHT / 2][GRID_WIDTH / 2] = pointer_glyph(ring);

    for (slot, mark) in session.engine().marks() {
        SlotRenderer::new(slot, mark).draw(&mut grid);
    }

    grid.iter()
        .map(|line| line.iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn draw_table(engine: &SelectionEngine) -> String {
    let mut out = String::new();
    for (slot, mark) in engine.marks() {
        let _ = writeln!(
            out,
            "{:>4} {:>6.1}° ({:>7.2}, {:>7.2}) {:?}",
            slot.id.to_string(),
            slot.angle,
            slot.offset.x,
            slot.offset.y,
            mark
        );
    }
    out
}

pub fn draw<S: SoundSink>(session: &Session<S>) -> String {
    let state = session.engine().state();
    format!(
        "{}\n\n{}  ({} of {} left, bottle at {:.0}°)",
        draw_ring(session),
        session.status(),
        state.remaining(),
        session.player_count(),
        session.rotation()
    )
}
