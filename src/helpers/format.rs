use crate::connection::Scale;

/// Format a value already expressed in `scale` units, e.g. `1.000GB`.
pub fn format_scaled(value: f64, scale: Scale) -> String {
    format!("{value:.3}{}", scale.suffix())
}

/// Format a raw byte count in `scale` units.
pub fn format_bytes_as(bytes: u64, scale: Scale) -> String {
    format_scaled(scale.apply(bytes), scale)
}
