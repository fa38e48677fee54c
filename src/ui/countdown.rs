use ratatui::style::Color;

/// Share of the time limit still left, as a whole percentage.
pub fn percent_left(time_remaining: u32, time_limit: u32) -> u16 {
    if time_limit == 0 {
        return 0;
    }
    let pct = time_remaining.min(time_limit) as f64 / time_limit as f64 * 100.0;
    pct.round() as u16
}

/// Gauge colour: green above two thirds, yellow above one third, red below.
pub fn gauge_color(time_remaining: u32, time_limit: u32) -> Color {
    let ratio = if time_limit == 0 {
        0.0
    } else {
        time_remaining as f64 / time_limit as f64
    };
    if ratio > 0.66 {
        Color::Green
    } else if ratio > 0.33 {
        Color::Yellow
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_left() {
        assert_eq!(percent_left(15, 15), 100);
        assert_eq!(percent_left(5, 10), 50);
        assert_eq!(percent_left(1, 3), 33);
        assert_eq!(percent_left(0, 8), 0);
        assert_eq!(percent_left(3, 0), 0);
    }

    #[test]
    fn test_gauge_color_thresholds() {
        assert_eq!(gauge_color(10, 10), Color::Green);
        assert_eq!(gauge_color(7, 10), Color::Green);
        assert_eq!(gauge_color(6, 10), Color::Yellow);
        assert_eq!(gauge_color(4, 10), Color::Yellow);
        assert_eq!(gauge_color(3, 10), Color::Red);
        assert_eq!(gauge_color(0, 10), Color::Red);
    }
}
