//! Renderer that forwards every call down a channel
//!
//! Used for JSON-lines output and by tests that observe presentation. Sends
//! never block; if the receiver is gone the calls are dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::{Renderer, ViewHandle};
use crate::combat::{Combatant, Side, StatusSet};

/// One presentation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RenderCall {
    CreateView {
        handle: ViewHandle,
        name: String,
        glyph: String,
        side: Side,
        hp: u32,
        max_hp: u32,
    },
    UpdateView {
        handle: ViewHandle,
        hp: u32,
        max_hp: u32,
        statuses: StatusSet,
    },
    FloatingNumber {
        handle: ViewHandle,
        amount: u32,
        is_heal: bool,
    },
    CritIndicator {
        handle: ViewHandle,
    },
    AttackLine {
        source: ViewHandle,
        target: ViewHandle,
    },
    Advance {
        handle: ViewHandle,
        distance_sign: i8,
    },
    MarkDead {
        handle: ViewHandle,
    },
    Log {
        text: String,
    },
    RoundLabel {
        round: u32,
    },
    Initiative {
        order: Vec<ViewHandle>,
    },
    WinnerBanner {
        text: String,
    },
    Panel {
        side: Side,
        lines: Vec<String>,
    },
}

/// Forwards presentation calls as [`RenderCall`] values
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<RenderCall>,
    next_handle: usize,
}

impl ChannelRenderer {
    pub fn new(tx: mpsc::UnboundedSender<RenderCall>) -> Self {
        Self { tx, next_handle: 0 }
    }

    /// Create a renderer together with its receiving end
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<RenderCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, call: RenderCall) {
        let _ = self.tx.send(call);
    }
}

impl Renderer for ChannelRenderer {
    fn create_view(&mut self, combatant: &Combatant) -> ViewHandle {
        let handle = ViewHandle(self.next_handle);
        self.next_handle += 1;
        self.send(RenderCall::CreateView {
            handle,
            name: combatant.name().to_string(),
            glyph: combatant.glyph().to_string(),
            side: combatant.side(),
            hp: combatant.hp(),
            max_hp: combatant.max_hp(),
        });
        handle
    }

    fn update_view(&mut self, handle: ViewHandle, hp: u32, max_hp: u32, statuses: &StatusSet) {
        self.send(RenderCall::UpdateView {
            handle,
            hp,
            max_hp,
            statuses: *statuses,
        });
    }

    fn show_floating_number(&mut self, handle: ViewHandle, amount: u32, is_heal: bool) {
        self.send(RenderCall::FloatingNumber {
            handle,
            amount,
            is_heal,
        });
    }

    fn show_crit_indicator(&mut self, handle: ViewHandle) {
        self.send(RenderCall::CritIndicator { handle });
    }

    fn show_attack_line(&mut self, source: ViewHandle, target: ViewHandle) {
        self.send(RenderCall::AttackLine { source, target });
    }

    fn animate_advance(&mut self, handle: ViewHandle, distance_sign: i8) {
        self.send(RenderCall::Advance {
            handle,
            distance_sign,
        });
    }

    fn mark_dead(&mut self, handle: ViewHandle) {
        self.send(RenderCall::MarkDead { handle });
    }

    fn append_log_line(&mut self, text: &str) {
        self.send(RenderCall::Log {
            text: text.to_string(),
        });
    }

    fn update_round_label(&mut self, round: u32) {
        self.send(RenderCall::RoundLabel { round });
    }

    fn update_initiative_display(&mut self, ordered: &[ViewHandle]) {
        self.send(RenderCall::Initiative {
            order: ordered.to_vec(),
        });
    }

    fn show_winner_banner(&mut self, text: &str) {
        self.send(RenderCall::WinnerBanner {
            text: text.to_string(),
        });
    }

    fn update_panel(&mut self, side: Side, lines: &[String]) {
        self.send(RenderCall::Panel {
            side,
            lines: lines.to_vec(),
        });
    }
}
