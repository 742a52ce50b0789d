use crate::routine::{Routine, RoutinesData};
use std::sync::OnceLock;

const DEFAULT_ROUTINES_JSON: &str = include_str!("../data/default_routines.json");

static DEFAULT_ROUTINES: OnceLock<Vec<Routine>> = OnceLock::new();

/// The catalog bundled with the binary, used whenever the remote source is
/// unreachable and nothing usable is cached.
pub fn default_routines() -> &'static [Routine] {
    DEFAULT_ROUTINES.get_or_init(|| {
        match serde_json::from_str::<RoutinesData>(DEFAULT_ROUTINES_JSON) {
            Ok(data) => data.routines.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "bundled default routines are malformed");
                Vec::new()
            }
        }
    })
}
