//! js20 CLI UI primitives.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use js20_compiler::EmittedFunction;

/// Terminal color palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const YELLOW: Color = Color::Color256(220);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}";          // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}";  // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}";    // ◉
    pub const TRIANGLE: &str = "\u{25B8}";         // ▸
    pub const ARROW: &str = "\u{2500}\u{25B8}";    // ─▸
}

/// Width of the `name(input) -> output` column in function listings.
const SIGNATURE_WIDTH: usize = 80;
/// Width of the method column in function listings.
const METHOD_WIDTH: usize = 8;

/// Print compact version header
pub fn print_compact_header(version: &str) {
    println!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::CYAN),
        style("js20").fg(colors::CYAN).bold(),
        style(version).dim()
    );
}

/// Print a success message
pub fn success(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        msg
    );
}

/// Print an error message
pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

/// Print an info message
pub fn info(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        msg
    );
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

/// Print a box header
pub fn box_header(title: &str) {
    let width: usize = 55;
    let title_padded = format!(" {} ", title);
    let title_len = title_padded.chars().count();
    let dashes = width.saturating_sub(title_len + 4);

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::CYAN), // ╭─
        style(title_padded).fg(colors::CYAN).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::CYAN),
        style("\u{256E}").fg(colors::CYAN) // ╮
    );
}

/// Print a box line
pub fn box_line(content: &str) {
    let width: usize = 53;
    let content_len = content.chars().count();
    let padding = width.saturating_sub(content_len);
    println!(
        "  {} {}{}{}",
        style("\u{2502}").fg(colors::CYAN), // │
        content,
        " ".repeat(padding),
        style("\u{2502}").fg(colors::CYAN)
    );
}

/// Print a box footer
pub fn box_footer() {
    let width: usize = 55;
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::CYAN), // ╰
        style("\u{2500}".repeat(width - 2)).fg(colors::CYAN),
        style("\u{256F}").fg(colors::CYAN) // ╯
    );
}

/// `value` padded with spaces to at least `min` characters.
pub fn min_width(value: &str, min: usize) -> String {
    let len = value.chars().count();
    if len >= min {
        value.to_string()
    } else {
        format!("{}{}", value, " ".repeat(min - len))
    }
}

/// Strips one pair of surrounding parentheses.
fn without_parentheses(value: &str) -> &str {
    value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value)
}

/// Plain `name(input: T) -> O` signature of a generated function.
pub fn signature(function: &EmittedFunction) -> String {
    let input = function
        .input_type
        .as_deref()
        .map(|t| format!("input: {}", without_parentheses(t)))
        .unwrap_or_default();
    let output = function.output_type.as_deref().map(without_parentheses).unwrap_or("void");
    format!("{}({}) -> {}", function.name, input, output)
}

/// Print one generated function with its method and path.
pub fn function_line(function: &EmittedFunction) {
    let signature = signature(function);
    let padding = SIGNATURE_WIDTH.saturating_sub(signature.chars().count());
    let (name, rest) = signature.split_at(function.name.len());

    println!(
        "  {} {}{}{} {} {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(name).fg(colors::YELLOW),
        rest.replace(" -> ", &format!(" {} ", style("->").dim())),
        " ".repeat(padding),
        style(min_width(&function.method, METHOD_WIDTH)).fg(colors::NEON_GREEN),
        function.path
    );
}

/// Print a list of paths under a heading
pub fn path_list(heading: &str, paths: &[std::path::PathBuf]) {
    println!(
        "  {} {}",
        style(symbols::ARROW).fg(colors::CYAN),
        style(heading).bold()
    );
    for path in paths {
        println!("     {}", style(path.display()).fg(colors::DIM));
    }
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Print "Nope" error header (for check failures)
pub fn nope_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Nope.").fg(colors::MAGENTA).bold()
    );
    println!();
}

/// Print "Looking good" success for check
pub fn looking_good() {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        style("Looking good.").bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(input: Option<&str>, output: Option<&str>) -> EmittedFunction {
        EmittedFunction {
            name: "updateCars".to_string(),
            input_type: input.map(str::to_string),
            output_type: output.map(str::to_string),
            method: "PUT".to_string(),
            path: "/cars/:id".to_string(),
        }
    }

    #[test]
    fn test_signature() {
        assert_eq!(
            signature(&function(Some("PartialCar & IdInput"), Some("CarInstance"))),
            "updateCars(input: PartialCar & IdInput) -> CarInstance"
        );
        assert_eq!(signature(&function(None, None)), "updateCars() -> void");
        assert_eq!(signature(&function(None, Some("(A & B)"))), "updateCars() -> A & B");
    }

    #[test]
    fn test_min_width() {
        assert_eq!(min_width("GET", 8), "GET     ");
        assert_eq!(min_width("DELETE", 3), "DELETE");
    }
}
