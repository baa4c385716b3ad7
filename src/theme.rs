//! Deterministic per-sender styling: avatar colour and initials.

/// Avatar palette, indexed by a hash of the sender name.
pub const SENDER_COLORS: [&str; 16] = [
    "#e74c3c", // Alizarin
    "#3498db", // Peter river
    "#2ecc71", // Emerald
    "#9b59b6", // Amethyst
    "#f39c12", // Orange
    "#1abc9c", // Turquoise
    "#e67e22", // Carrot
    "#34495e", // Wet asphalt
    "#16a085", // Green sea
    "#27ae60", // Nephritis
    "#2980b9", // Belize hole
    "#8e44ad", // Wisteria
    "#c0392b", // Pomegranate
    "#d35400", // Pumpkin
    "#7f8c8d", // Asbestos
    "#66b2ff", // Light blue
];

/// Pick a palette colour for a sender using the FNV-1a hash of its bytes.
///
/// Same name, same colour, on every call and every machine. Case-sensitive.
pub fn sender_color(sender: &str) -> &'static str {
    let mut hash: u64 = 1469598103934665603u64;
    for b in sender.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(1099511628211u64);
    }
    let idx = (hash as usize) % SENDER_COLORS.len();
    SENDER_COLORS[idx]
}

/// Up to two uppercase initials: first letter of the first and last words.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let first_char = |w: &str| w.chars().next().into_iter().flat_map(char::to_uppercase);

    match words.as_slice() {
        [] => "?".to_string(),
        [only] => first_char(*only).collect(),
        [first, .., last] => first_char(*first).chain(first_char(*last)).collect(),
    }
}
