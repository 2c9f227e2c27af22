use plotters::style::RGBColor;

/// Color for a team name as the timing feed spells it, if known.
pub fn team_color(team: &str) -> Option<RGBColor> {
    let t = team.to_ascii_lowercase();
    let rgb = if t.contains("red bull") {
        RGBColor(0x36, 0x71, 0xC6)
    } else if t.contains("ferrari") {
        RGBColor(0xE8, 0x00, 0x2D)
    } else if t.contains("mercedes") {
        RGBColor(0x27, 0xF4, 0xD2)
    } else if t.contains("mclaren") {
        RGBColor(0xFF, 0x80, 0x00)
    } else if t.contains("aston martin") {
        RGBColor(0x22, 0x99, 0x71)
    } else if t.contains("alpine") {
        RGBColor(0x00, 0x93, 0xCC)
    } else if t.contains("williams") {
        RGBColor(0x64, 0xC4, 0xFF)
    } else if t == "rb" || t.contains("alphatauri") || t.contains("racing bulls") {
        RGBColor(0x66, 0x92, 0xFF)
    } else if t.contains("sauber") || t.contains("alfa romeo") {
        RGBColor(0x52, 0xE2, 0x52)
    } else if t.contains("haas") {
        RGBColor(0xB6, 0xBA, 0xBD)
    } else {
        return None;
    };
    Some(rgb)
}

/// Fixed per-slot default when team lookup has nothing: red for the first
/// trace, blue for the second.
pub fn fallback_color(slot: usize) -> RGBColor {
    if slot == 0 {
        RGBColor(0xFF, 0x28, 0x00)
    } else {
        RGBColor(0x06, 0x00, 0xEF)
    }
}

/// Team color with the guaranteed per-slot fallback.
pub fn resolve(team: &str, slot: usize) -> RGBColor {
    team_color(team).unwrap_or_else(|| fallback_color(slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_teams_resolve() {
        assert!(team_color("Red Bull Racing").is_some());
        assert!(team_color("Ferrari").is_some());
        assert!(team_color("Haas F1 Team").is_some());
    }

    #[test]
    fn unknown_teams_take_slot_fallbacks() {
        assert_eq!(resolve("Brawn GP", 0), fallback_color(0));
        assert_eq!(resolve("Brawn GP", 1), fallback_color(1));
        assert_ne!(fallback_color(0), fallback_color(1));
    }

    #[test]
    fn lookup_is_deterministic() {
        assert_eq!(team_color("McLaren"), team_color("McLaren"));
        assert_eq!(resolve("", 0), resolve("", 0));
    }
}
