use super::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub path: Path,
    pub direction: Direction,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn is_desc(self) -> bool {
        matches!(self, Direction::Desc)
    }
}
