pub mod analysis;

use ansi_term::Colour;

use crate::data::entities::Priority;

/// Formats whole minutes the way all the commands print them: 3h25m, 45m, 0m.
pub fn format_minutes(minutes: u32) -> String {
    if minutes >= 60 {
        format!("{}h{}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

/// Renders a fixed-width bar for a 0-100 percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{}",
        Colour::Purple.paint("█".repeat(filled)),
        Colour::Fixed(240).paint("░".repeat(width - filled))
    )
}

pub fn priority_badge(priority: Priority) -> String {
    match priority {
        Priority::High => Colour::Red.paint("high").to_string(),
        Priority::Medium => Colour::Yellow.paint("medium").to_string(),
        Priority::Low => Colour::Green.paint("low").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::format_minutes;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h0m");
        assert_eq!(format_minutes(205), "3h25m");
    }
}
