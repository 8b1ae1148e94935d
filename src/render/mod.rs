//! Presentation interface
//!
//! The engine pushes presentation calls through [`Renderer`] and never reads
//! anything back. Implementations must return promptly; any animation they
//! run is their own business.

mod channel;
mod terminal;

pub use channel::{ChannelRenderer, RenderCall};
pub use terminal::TerminalRenderer;

use serde::{Deserialize, Serialize};

use crate::combat::{Combatant, Side, StatusSet};

/// Opaque handle to a combatant's on-screen view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewHandle(pub usize);

/// Receives presentation calls from the engine
pub trait Renderer: Send {
    /// Create the view for a combatant
    fn create_view(&mut self, combatant: &Combatant) -> ViewHandle;

    /// Redraw hp bar and status glyphs
    fn update_view(&mut self, handle: ViewHandle, hp: u32, max_hp: u32, statuses: &StatusSet);

    /// Float a damage or heal number over a view
    fn show_floating_number(&mut self, handle: ViewHandle, amount: u32, is_heal: bool);

    fn show_crit_indicator(&mut self, handle: ViewHandle);

    fn show_attack_line(&mut self, source: ViewHandle, target: ViewHandle);

    /// Step a view toward (+1/-1) or back to (0) its line
    fn animate_advance(&mut self, handle: ViewHandle, distance_sign: i8);

    fn mark_dead(&mut self, handle: ViewHandle);

    fn append_log_line(&mut self, text: &str);

    fn update_round_label(&mut self, round: u32);

    /// Show the remaining turn order for this round
    fn update_initiative_display(&mut self, ordered: &[ViewHandle]);

    fn show_winner_banner(&mut self, text: &str);

    /// Refresh a side's "Name: hp/max" summary panel
    fn update_panel(&mut self, _side: Side, _lines: &[String]) {}
}
