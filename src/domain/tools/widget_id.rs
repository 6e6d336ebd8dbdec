//! Widget id generation for `create_widget`.
//!
//! `WidgetSummary.id` is an integer (it's also how `edit_widget` looks
//! widgets up), so the `widget_<ms-timestamp>_<random-0..999>` id scheme is
//! realized as a single `i64` packing both components: millisecond
//! timestamp in the high digits, a 0..999 random draw in the low three.

use rand::Rng;

/// Generates a new widget id as `timestamp_ms * 1000 + random(0..1000)`.
///
/// Not guaranteed globally unique (two widgets created in the same
/// millisecond with the same random draw would collide), but collisions are
/// vanishingly unlikely under normal use — matching the spec's own
/// acceptance of this scheme.
pub fn generate() -> i64 {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0) as i64;
    let suffix: i64 = rand::thread_rng().gen_range(0..1000);
    millis * 1000 + suffix
}
