use serde::Deserialize;

/// Rule options chosen when a game is created.
///
/// Deserializes from a partial object; missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// A piece that can capture must capture.
    pub mandatory_capture: bool,
    /// Men may only move toward their promotion row. Kings are unaffected.
    pub men_move_forward_only: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            mandatory_capture: true,
            men_move_forward_only: false,
        }
    }
}
