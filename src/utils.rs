use ropey::{Rope, RopeSlice};
use tower_lsp::lsp_types::Position;

/// Char column of the UTF-16 `character` on `line`.
///
/// Columns past the end of the line clamp to the end of its content, before
/// the line break.
fn char_column(line: RopeSlice, character: u32) -> usize {
    let character = character as usize;
    let mut units = 0;
    let mut column = 0;

    for c in line.chars() {
        if units >= character || c == '\n' || c == '\r' {
            break;
        }
        units += c.len_utf16();
        column += 1;
    }

    column
}

/// Byte offset of `position`, with the column counted in UTF-16 code units.
pub fn position_to_offset(position: Position, rope: &Rope) -> Option<usize> {
    let line = position.line as usize;
    let line_offset = rope.try_line_to_char(line).ok()?;
    let column = char_column(rope.get_line(line)?, position.character);

    rope.try_char_to_byte(line_offset + column).ok()
}

/// Text of the line at `position` up to the cursor.
pub fn line_prefix(position: Position, rope: &Rope) -> Option<String> {
    let line = rope.get_line(position.line as usize)?;
    let end = char_column(line, position.character);
    Some(line.slice(..end).to_string())
}
