pub mod unit;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took to evaluate, and returns the value of
/// the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} µs", $label, elapsed.as_micros());
        value
    }};
}

/// Round a value to a fixed number of decimal places. Halves round away from
/// zero. For non-negative values (which is all we ever display) this matches
/// the JS idiom `Math.round(x * 100) / 100`.
pub fn round_to(value: f64, places: u8) -> f64 {
    let factor = 10f64.powi(i32::from(places));
    let rounded = (value * factor).round() / factor;
    // Avoid printing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Iterate over every consecutive pair in a slice. A slice of `n` elements
/// yields `n - 1` pairs (or none at all if it has fewer than 2 elements).
pub fn pairwise<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    items.windows(2).map(|pair| (&pair[0], &pair[1]))
}
