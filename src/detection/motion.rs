use super::types::{Direction, Hand};
use crate::config::PipelineConfig;

/// Classify frame-to-frame hand movement from a single-step lookback.
///
/// The dominant axis (x wins ties) must move more than `movement_threshold`
/// pixels and the previous frame must also have had a detected hand;
/// otherwise the hand is staying still. This is a raw one-frame signal, not
/// a filtered velocity, so jitter near the threshold can flip it.
pub fn movement_direction(current: &Hand, previous: &Hand, config: &PipelineConfig) -> Direction {
    if !current.is_detected() {
        return Direction::NoHand;
    }

    let dx = current.location.0 - previous.location.0;
    let dy = current.location.1 - previous.location.1;

    if dx.abs() >= dy.abs() {
        if dx.abs() > config.movement_threshold && previous.is_detected() {
            return if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            };
        }
    } else if dy.abs() > config.movement_threshold && previous.is_detected() {
        // Screen coordinates: y grows downward
        return if dy > 0 { Direction::Down } else { Direction::Up };
    }

    Direction::Still
}
