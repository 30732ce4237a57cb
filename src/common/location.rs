/// The location of the current match.
///
/// Lines are 1-based, columns are 0-based character offsets within their line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// The line where the match starts.
    pub first_line: usize,
    /// The line where the match ends.
    pub last_line: usize,
    /// The column where the match starts.
    pub first_column: usize,
    /// The column after the last character of the match.
    pub last_column: usize,
    /// The character offsets of the match, only tracked with the `ranges` option.
    pub range: Option<(usize, usize)>,
}

impl Location {
    /// The location before any input has been consumed.
    pub fn start(ranges: bool) -> Self {
        Location {
            first_line: 1,
            last_line: 1,
            first_column: 0,
            last_column: 0,
            range: ranges.then_some((0, 0)),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::start(false)
    }
}
