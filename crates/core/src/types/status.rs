//! Order status.
//!
//! Statuses are ordered for progress display: `EnEspera → Aceptado →
//! EnCamino → Entregado`, with `Cancelado` as a side branch. No transition
//! graph is enforced; an admin may set any status from any other status,
//! including moving a delivered order back to waiting.

use serde::{Deserialize, Serialize};

/// Status of a customer order.
///
/// Serialized with the lowercase wire values the storefront has always
/// persisted (`en_espera`, `aceptado`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, waiting for the store to accept it.
    #[default]
    EnEspera,
    /// Store accepted the order.
    Aceptado,
    /// Out for delivery.
    EnCamino,
    /// Delivered to the customer.
    Entregado,
    /// Cancelled. Not part of the progress line.
    Cancelado,
}

/// Number of steps on the tracking progress line.
pub const PROGRESS_STEPS: usize = 4;

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 5] = [
        Self::EnEspera,
        Self::Aceptado,
        Self::EnCamino,
        Self::Entregado,
        Self::Cancelado,
    ];

    /// Wire value as persisted.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnEspera => "en_espera",
            Self::Aceptado => "aceptado",
            Self::EnCamino => "en_camino",
            Self::Entregado => "entregado",
            Self::Cancelado => "cancelado",
        }
    }

    /// Human-readable label (`en espera`, `en camino`, ...).
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    /// Position on the progress line, 1 through [`PROGRESS_STEPS`].
    ///
    /// Cancelled orders sit at the first step, same as waiting ones.
    #[must_use]
    pub const fn step(&self) -> usize {
        match self {
            Self::EnEspera | Self::Cancelado => 1,
            Self::Aceptado => 2,
            Self::EnCamino => 3,
            Self::Entregado => 4,
        }
    }

    /// Width of the tracking progress bar.
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        match self.step() {
            4 => 100,
            3 => 75,
            2 => 50,
            _ => 25,
        }
    }

    /// Whether the progress line has reached `step` (1-based).
    #[must_use]
    pub const fn reached_step(&self, step: usize) -> bool {
        step <= self.step()
    }

    /// Whether the order has left the active flow.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Entregado | Self::Cancelado)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    /// Accepts the wire value or its label, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(' ', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}
