pub mod coincidence;
pub mod quantize;

// Re-export for easier access
pub use coincidence::{CoincidenceStats, find_coincidences, find_coincidences_with_stats};
pub use quantize::{quantize, quantize_positions};
