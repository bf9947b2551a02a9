use calltime_core::gifts::{self, GiftId, GiftSelection};
use calltime_core::Collaborator;
use crossterm::event::{KeyCode, KeyEvent};

/// What the dialog asks of its owner after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Close,
    Submit,
}

/// Gift picker state. Survives closing and reopening until a send succeeds.
#[derive(Debug, Clone)]
pub struct GiftDialog {
    pub collaborators: Vec<Collaborator>,
    pub selection: GiftSelection,
    /// Highlighted collaborator row.
    pub cursor: usize,
    /// Highlighted tier, used by space and "select all".
    pub tier: GiftId,
}

impl GiftDialog {
    pub fn new(collaborators: Vec<Collaborator>) -> Self {
        Self {
            collaborators,
            selection: GiftSelection::new(),
            cursor: 0,
            tier: GiftId::Free,
        }
    }

    fn current_name(&self) -> Option<String> {
        self.collaborators.get(self.cursor).map(|c| c.name.clone())
    }

    pub fn assign(&mut self, name: &str, gift: GiftId) {
        self.selection = self.selection.with(name, gift);
    }

    pub fn remove(&mut self, name: &str) {
        self.selection = self.selection.without(name);
    }

    pub fn select_all(&mut self) {
        self.selection = GiftSelection::all(&self.collaborators, self.tier);
    }

    pub fn clear(&mut self) {
        self.selection = GiftSelection::new();
    }

    pub fn selected(&self) -> usize {
        self.selection.len()
    }

    pub fn counter_label(&self) -> String {
        format!("{} of {} selected", self.selected(), self.collaborators.len())
    }

    pub fn send_label(&self) -> String {
        gifts::send_label(self.selected())
    }

    pub fn total_label(&self) -> String {
        gifts::format_price(self.selection.total_cost())
    }

    fn cycle_tier(&mut self, forward: bool) {
        let all = GiftId::ALL;
        let pos = all.iter().position(|g| *g == self.tier).unwrap_or(0);
        let next = if forward {
            (pos + 1) % all.len()
        } else {
            (pos + all.len() - 1) % all.len()
        };
        self.tier = all[next];
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return DialogAction::Close,
            KeyCode::Enter => return DialogAction::Submit,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.collaborators.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Right | KeyCode::Tab => self.cycle_tier(true),
            KeyCode::Left | KeyCode::BackTab => self.cycle_tier(false),
            KeyCode::Char(c @ '1'..='3') => {
                let gift = GiftId::ALL[usize::from(c as u8 - b'1')];
                if let Some(name) = self.current_name() {
                    self.assign(&name, gift);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(name) = self.current_name() {
                    if self.selection.get(&name) == Some(self.tier) {
                        self.remove(&name);
                    } else {
                        self.assign(&name, self.tier);
                    }
                }
            }
            KeyCode::Char('0') | KeyCode::Char('x') | KeyCode::Backspace | KeyCode::Delete => {
                if let Some(name) = self.current_name() {
                    self.remove(&name);
                }
            }
            KeyCode::Char('a') => self.select_all(),
            KeyCode::Char('c') => self.clear(),
            _ => {}
        }
        DialogAction::None
    }
}
