use serde::{Deserialize, Serialize};

use crate::error::RecapError;
use crate::types::Collaborator;

/// Closed catalog of gift tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GiftId {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "hat")]
    Hat,
    #[serde(rename = "wrap-box")]
    WrapBox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiftOption {
    pub id: GiftId,
    pub name: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub price_label: &'static str,
}

pub const GIFT_OPTIONS: [GiftOption; 3] = [
    GiftOption {
        id: GiftId::Free,
        name: "Thank You Card",
        description: "Digital thank you card",
        price: 0.0,
        price_label: "Free",
    },
    GiftOption {
        id: GiftId::Hat,
        name: "Calltime Hat",
        description: "Premium branded hat",
        price: 19.0,
        price_label: "$19",
    },
    GiftOption {
        id: GiftId::WrapBox,
        name: "Wrap Box",
        description: "Exclusive wrap box collection",
        price: 599.99,
        price_label: "$599.99",
    },
];

impl GiftId {
    pub const ALL: [GiftId; 3] = [GiftId::Free, GiftId::Hat, GiftId::WrapBox];

    pub fn option(self) -> &'static GiftOption {
        match self {
            GiftId::Free => &GIFT_OPTIONS[0],
            GiftId::Hat => &GIFT_OPTIONS[1],
            GiftId::WrapBox => &GIFT_OPTIONS[2],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GiftId::Free => "free",
            GiftId::Hat => "hat",
            GiftId::WrapBox => "wrap-box",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        GiftId::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn price(self) -> f64 {
        self.option().price
    }
}

/// One collaborator paired with the chosen gift tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorGift {
    pub collaborator_name: String,
    pub gift_option_id: GiftId,
}

/// Collaborator name → chosen gift tier, at most one per name.
///
/// Edits return a new selection; the previous value is never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftSelection {
    entries: Vec<(String, GiftId)>,
}

impl GiftSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose `gift` for `name`, replacing any earlier choice for that name.
    pub fn with(&self, name: &str, gift: GiftId) -> Self {
        let mut entries: Vec<(String, GiftId)> = self
            .entries
            .iter()
            .filter(|(n, _)| n != name)
            .cloned()
            .collect();
        entries.push((name.to_string(), gift));
        Self { entries }
    }

    /// Drop the choice for `name`, if any.
    pub fn without(&self, name: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| n != name)
                .cloned()
                .collect(),
        }
    }

    /// Choose `gift` for every collaborator.
    pub fn all(collaborators: &[Collaborator], gift: GiftId) -> Self {
        Self {
            entries: collaborators
                .iter()
                .map(|c| (c.name.clone(), gift))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<GiftId> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| *g)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of selected prices, in dollars.
    pub fn total_cost(&self) -> f64 {
        let cents: i64 = self
            .entries
            .iter()
            .map(|(_, g)| (g.price() * 100.0).round() as i64)
            .sum();
        cents as f64 / 100.0
    }

    /// Selections in the order they were made, ready for a send request.
    /// Fails with a validation error when nothing is selected.
    pub fn to_request_items(&self) -> Result<Vec<CollaboratorGift>, RecapError> {
        if self.entries.is_empty() {
            return Err(RecapError::Validation);
        }
        Ok(self
            .entries
            .iter()
            .map(|(name, gift)| CollaboratorGift {
                collaborator_name: name.clone(),
                gift_option_id: *gift,
            })
            .collect())
    }
}

/// Label for the send button: "Send Gift", "Send 1 Gift", "Send 3 Gifts".
pub fn send_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    if count > 0 {
        format!("Send {count} Gift{plural}")
    } else {
        format!("Send Gift{plural}")
    }
}

/// Format a dollar amount the way the catalog labels prices.
pub fn format_price(amount: f64) -> String {
    if amount == 0.0 {
        "Free".to_string()
    } else if amount.fract() == 0.0 {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}

// ── Send contract ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendGiftRequest {
    pub sender_user_id: String,
    pub recipients: Vec<CollaboratorGift>,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendGiftResponse {
    pub success: bool,
    pub sent_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_recipients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendGiftResponse {
    /// Map a backend response onto the error taxonomy.
    pub fn into_result(self) -> Result<usize, RecapError> {
        if self.success {
            return Ok(self.sent_count);
        }
        let reason = match (self.error, self.failed_recipients) {
            (Some(err), _) => err,
            (None, Some(names)) if !names.is_empty() => {
                format!("could not reach {}", names.join(", "))
            }
            _ => "backend rejected the request".to_string(),
        };
        Err(RecapError::Send(reason))
    }
}

/// A gift previously sent, as reported by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GiftHistoryEntry {
    pub collaborator_name: String,
    pub gift_option_id: GiftId,
    pub sent_at: String,
    #[serde(default)]
    pub claimed: bool,
}
