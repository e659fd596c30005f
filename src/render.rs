//! Plain-text rendering of schedule cards.

use crate::models::RenderedRecord;
use crate::state::View;

const HEADING: char = '■';
const BODY_INDENT: &str = "  ";

/// Render cards as text, one heading per card with its body lines indented
/// beneath and a blank line between cards.
///
/// Example output:
/// ```text
/// ■ Block 1: Opening Night
///   Artist: Nova
///   Year: 2019
///
/// ■ Block 2: Untitled
/// ```
pub fn render_cards(cards: &[RenderedRecord]) -> String {
    let mut output = String::new();
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        render_card(&mut output, card);
    }
    output
}

fn render_card(output: &mut String, card: &RenderedRecord) {
    output.push(HEADING);
    output.push(' ');
    output.push_str(&card.title);
    output.push('\n');

    for line in &card.lines {
        output.push_str(BODY_INDENT);
        output.push_str(line);
        output.push('\n');
    }
}

/// Render any view: cards for [`View::Cards`], otherwise its message on one line.
pub fn render_view(view: &View) -> String {
    match view {
        View::Cards { day, cards } => format!("Day {}\n\n{}", day, render_cards(cards)),
        other => format!("{}\n", other),
    }
}
