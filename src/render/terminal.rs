//! Plain-text renderer for terminals

use std::io::{self, Write};

use super::{Renderer, ViewHandle};
use crate::combat::{Combatant, Side, StatusSet};

/// Width of the hp bar in characters
const BAR_WIDTH: usize = 10;

struct View {
    name: String,
    glyph: String,
}

/// Writes battle progress as text lines
///
/// Transient effects (floating numbers, attack lines, advances) have no
/// text form and are ignored. Write errors are dropped.
pub struct TerminalRenderer {
    out: Box<dyn Write + Send>,
    views: Vec<View>,
}

impl TerminalRenderer {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            views: Vec::new(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn view(&self, handle: ViewHandle) -> Option<&View> {
        self.views.get(handle.0)
    }
}

/// "[######----]" style bar
fn hp_bar(hp: u32, max_hp: u32) -> String {
    let filled = if max_hp == 0 {
        0
    } else {
        (hp as usize * BAR_WIDTH).div_ceil(max_hp as usize).min(BAR_WIDTH)
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl Renderer for TerminalRenderer {
    fn create_view(&mut self, combatant: &Combatant) -> ViewHandle {
        self.views.push(View {
            name: combatant.name().to_string(),
            glyph: combatant.glyph().to_string(),
        });
        ViewHandle(self.views.len() - 1)
    }

    fn update_view(&mut self, handle: ViewHandle, hp: u32, max_hp: u32, statuses: &StatusSet) {
        let Some(view) = self.view(handle) else {
            return;
        };
        let text = format!(
            "  {} {:<8} {} {}/{} {}",
            view.glyph,
            view.name,
            hp_bar(hp, max_hp),
            hp,
            max_hp,
            statuses.glyphs()
        );
        self.line(text.trim_end());
    }

    fn show_floating_number(&mut self, _handle: ViewHandle, _amount: u32, _is_heal: bool) {}

    fn show_crit_indicator(&mut self, _handle: ViewHandle) {}

    fn show_attack_line(&mut self, _source: ViewHandle, _target: ViewHandle) {}

    fn animate_advance(&mut self, _handle: ViewHandle, _distance_sign: i8) {}

    fn mark_dead(&mut self, handle: ViewHandle) {
        if let Some(view) = self.view(handle) {
            let text = format!("  {} {} falls.", view.glyph, view.name);
            self.line(&text);
        }
    }

    fn append_log_line(&mut self, text: &str) {
        self.line(text);
    }

    fn update_round_label(&mut self, round: u32) {
        self.line(&format!("\n-- Round {} --", round));
    }

    fn update_initiative_display(&mut self, ordered: &[ViewHandle]) {
        let glyphs: Vec<&str> = ordered
            .iter()
            .filter_map(|h| self.view(*h))
            .map(|v| v.glyph.as_str())
            .collect();
        let text = format!("Initiative: {}", glyphs.join(" "));
        self.line(&text);
    }

    fn show_winner_banner(&mut self, text: &str) {
        self.line(&format!("\n*** {} ***", text));
    }

    fn update_panel(&mut self, side: Side, lines: &[String]) {
        let label = match side {
            Side::Heroes => "Heroes",
            Side::Monsters => "Monsters",
        };
        self.line(&format!("{}: {}", label, lines.join(", ")));
    }
}
