use sha2::{Digest, Sha256};

/// Background/foreground pair for a profile badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeColor {
    pub background: &'static str,
    pub text: &'static str,
}

const PALETTE: [BadgeColor; 8] = [
    BadgeColor { background: "#DBEAFE", text: "#1E40AF" },
    BadgeColor { background: "#DCFCE7", text: "#166534" },
    BadgeColor { background: "#FEF9C3", text: "#854D0E" },
    BadgeColor { background: "#FCE7F3", text: "#9D174D" },
    BadgeColor { background: "#EDE9FE", text: "#5B21B6" },
    BadgeColor { background: "#FFEDD5", text: "#9A3412" },
    BadgeColor { background: "#CFFAFE", text: "#155E75" },
    BadgeColor { background: "#F3F4F6", text: "#374151" },
];

/// Same name, same colour, across requests and restarts
pub fn badge_color(name: &str) -> BadgeColor {
    let digest = Sha256::digest(name.trim().to_lowercase().as_bytes());
    PALETTE[digest[0] as usize % PALETTE.len()]
}
