//! Terminal colorization for the rendered scene
//!
//! Applies ANSI escape codes to scene glyphs using crossterm: markers get a
//! color per neuron kind, highlighted connection lines stand out from the
//! dim base lines.

use crossterm::style::{Color, Stylize};

/// Colorize a rendered scene
///
/// - Concept markers: cyan
/// - Principle markers: magenta
/// - Question markers: yellow
/// - Focused marker: green
/// - Connection lines: dark grey, highlighted segments yellow
/// - Labels: default terminal color
pub fn colorize_scene(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        for c in line.chars() {
            let colored = match c {
                // Concept markers
                '●' | 'O' => format!("{}", c.to_string().with(Color::Cyan)),
                // Principle markers
                '◆' | '#' => format!("{}", c.to_string().with(Color::Magenta)),
                // Question markers
                '○' => format!("{}", c.to_string().with(Color::Yellow)),
                // Focused marker
                '◉' | '@' => format!("{}", c.to_string().with(Color::Green)),
                // Highlighted connection segments
                '•' | '*' => format!("{}", c.to_string().with(Color::Yellow)),
                // Base connection lines; ASCII '.' and '?' are left alone
                // since they also appear in labels
                '·' => format!("{}", c.to_string().with(Color::DarkGrey)),
                _ => c.to_string(),
            };
            result.push_str(&colored);
        }
        result.push('\n');
    }

    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}
