//! Clickable UI building blocks.
//!
//! Rendering and click registration live together so a label can never be
//! drawn without its target (see `tests/lint_render.rs`).

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

/// Lines for a `Paragraph`, some of them bound to a click action.
///
/// Targets are tracked by line index, so adding or removing lines above a
/// button never desynchronises the hit rows.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Boutique"));
/// cl.push_clickable(Line::from(" [M] Acheter multiplicateur"), BUY_MULTIPLIER);
/// cl.register_targets(area, &mut cs, 1, 1, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// (line index, action id)
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register one full-width row target per visual row of each clickable line.
    ///
    /// `top`/`bottom` are the rows taken by borders inside `area`.
    /// `wrap_width` is the inner width when the paragraph wraps, or `0` when
    /// every line is exactly one row.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top: u16,
        bottom: u16,
        wrap_width: u16,
    ) {
        let first_row = area.y + top;
        let end_row = area.y + area.height.saturating_sub(bottom);

        let mut row_of_line = Vec::with_capacity(self.lines.len());
        let mut next_row = first_row;
        for line in &self.lines {
            let height = rows_for(line.width(), wrap_width);
            row_of_line.push((next_row, height));
            next_row = next_row.saturating_add(height);
        }

        for &(idx, action_id) in &self.actions {
            let Some(&(start, height)) = row_of_line.get(idx) else {
                continue;
            };
            for row in start..start.saturating_add(height) {
                if row >= end_row {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

/// Visual rows a line of `width` cells occupies when wrapped at `wrap_width`.
fn rows_for(width: usize, wrap_width: u16) -> u16 {
    let w = wrap_width as usize;
    if w == 0 || width <= w {
        1
    } else {
        width.div_ceil(w) as u16
    }
}
