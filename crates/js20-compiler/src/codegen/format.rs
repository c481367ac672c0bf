//! Deterministic re-indenter for the generated module.
//!
//! Code is generated without indentation and this pass indents it by bracket
//! depth. A line that leaves several brackets open only indents the next line
//! once, so `foo(a, {` followed by `});` reads as a single block.

use crate::config::FormatOptions;
use crate::diagnostic::CompilerError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Code,
    SingleQuote,
    DoubleQuote,
    Template,
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy)]
struct Open {
    bracket: char,
    indents: bool,
    line: usize,
}

/// Formats TypeScript source text.
pub fn format(source: &str, options: &FormatOptions) -> Result<String, CompilerError> {
    let unit = if options.use_tabs { "\t".to_string() } else { " ".repeat(options.tab_width) };

    let mut stack: Vec<Open> = Vec::new();
    let mut mode = Mode::Code;
    let mut lines: Vec<String> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;

        // Template literal contents are kept verbatim.
        if mode == Mode::Template {
            lines.push(raw.trim_end().to_string());
            mode = scan(raw, mode, &mut stack, line_number)?;
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let starts_in_comment = mode == Mode::BlockComment;
        let depth = if starts_in_comment { indent_depth(&stack) } else { depth_after_leading_closers(line, &stack) };
        let indent = unit.repeat(depth);

        mode = scan(line, mode, &mut stack, line_number)?;

        // Only the innermost bracket left open by this line indents.
        if let Some(open) = stack.iter_mut().rev().find(|o| o.line == line_number) {
            open.indents = true;
        }

        if starts_in_comment && line.starts_with('*') {
            lines.push(format!("{} {}", indent, line));
        } else {
            lines.push(format!("{}{}", indent, line));
        }
    }

    if !stack.is_empty() {
        let open: String = stack.iter().map(|o| o.bracket).collect();
        return Err(CompilerError::FormatFailed {
            message: format!("unclosed brackets at end of file: {}", open),
        });
    }
    if matches!(mode, Mode::BlockComment | Mode::Template | Mode::SingleQuote | Mode::DoubleQuote) {
        return Err(CompilerError::FormatFailed {
            message: "unterminated string or comment at end of file".to_string(),
        });
    }

    Ok(collapse_blank_lines(&lines))
}

fn indent_depth(stack: &[Open]) -> usize {
    stack.iter().filter(|o| o.indents).count()
}

/// Depth of a line that begins with closing brackets.
fn depth_after_leading_closers(line: &str, stack: &[Open]) -> usize {
    let closers = line.chars().take_while(|c| matches!(c, '}' | ')' | ']')).count();
    let keep = stack.len().saturating_sub(closers);
    indent_depth(&stack[..keep])
}

/// Scans one line, updating the bracket stack. Returns the mode at the end of
/// the line.
fn scan(line: &str, mut mode: Mode, stack: &mut Vec<Open>, line_number: usize) -> Result<Mode, CompilerError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match mode {
            Mode::Code => match c {
                '\'' => mode = Mode::SingleQuote,
                '"' => mode = Mode::DoubleQuote,
                '`' => mode = Mode::Template,
                '/' if next == Some('/') => mode = Mode::LineComment,
                '/' if next == Some('*') => {
                    mode = Mode::BlockComment;
                    i += 1;
                }
                '{' | '(' | '[' => stack.push(Open { bracket: c, indents: false, line: line_number }),
                '}' | ')' | ']' => {
                    let expected = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    match stack.pop() {
                        Some(open) if open.bracket == expected => {}
                        _ => {
                            return Err(CompilerError::FormatFailed {
                                message: format!("unbalanced '{}' on line {}", c, line_number),
                            });
                        }
                    }
                }
                _ => {}
            },
            Mode::SingleQuote | Mode::DoubleQuote => {
                let quote = if mode == Mode::SingleQuote { '\'' } else { '"' };
                if c == '\\' {
                    i += 1;
                } else if c == quote {
                    mode = Mode::Code;
                }
            }
            Mode::Template => {
                if c == '\\' {
                    i += 1;
                } else if c == '`' {
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    mode = Mode::Code;
                    i += 1;
                }
            }
            Mode::LineComment => break,
        }
        i += 1;
    }

    Ok(match mode {
        Mode::LineComment => Mode::Code,
        Mode::SingleQuote | Mode::DoubleQuote => {
            return Err(CompilerError::FormatFailed {
                message: format!("unterminated string on line {}", line_number),
            });
        }
        other => other,
    })
}

/// Drops leading blank lines, blank lines after an opening bracket and
/// before a closing one, and collapses blank runs. Ends with one newline.
fn collapse_blank_lines(lines: &[String]) -> String {
    let mut output: Vec<&str> = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        if !line.is_empty() {
            output.push(line);
            continue;
        }

        let Some(previous) = output.last() else { continue };
        if previous.is_empty() || previous.ends_with(['{', '(', '[']) {
            continue;
        }

        let next = lines[index + 1..].iter().find(|l| !l.is_empty());
        match next {
            Some(next) if next.trim_start().starts_with(['}', ')', ']']) => continue,
            None => continue,
            _ => output.push(line),
        }
    }

    let mut result = output.join("\n");
    result.push('\n');
    result
}
