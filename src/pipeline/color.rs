//! Random color synthesis for chart datasets.

use rand::Rng;

/// Generates a random RGBA color string with the given alpha.
///
/// R, G, B are independent uniform draws from 0..=255, formatted as
/// `rgba(r, g, b, a)` for Chart.js.
pub fn random_color(alpha: f64) -> String {
    let mut rng = rand::thread_rng();
    format!(
        "rgba({}, {}, {}, {})",
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        alpha
    )
}
