use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("row width must be positive, got {count}")]
    InvalidArgument { count: usize },
}

/// One grid cell: a real item, or padding in the last row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<T> {
    Item(T),
    Placeholder,
}

impl<T> Cell<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Placeholder)
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            Cell::Item(item) => Some(item),
            Cell::Placeholder => None,
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            Cell::Item(item) => Some(item),
            Cell::Placeholder => None,
        }
    }
}

/// A row of exactly `count` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<T> {
    cells: Vec<Cell<T>>,
}

impl<T> Row<T> {
    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell<T>> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The real items, skipping padding.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.cells.iter().filter_map(Cell::as_item)
    }

    pub fn placeholders(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_placeholder()).count()
    }
}

/// Packs items into rows of a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPacker {
    count: NonZeroUsize,
}

impl GridPacker {
    pub fn new(count: usize) -> Result<Self, LayoutError> {
        NonZeroUsize::new(count)
            .map(|count| Self { count })
            .ok_or(LayoutError::InvalidArgument { count })
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Width of one cell as a percentage of the row.
    pub fn column_width_percent(&self) -> f64 {
        100.0 / self.count.get() as f64
    }

    /// Walk `items` in order, `count` at a time. Each chunk becomes a row;
    /// the last one is right-padded with placeholders.
    pub fn pack<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<Row<T>> {
        let count = self.count.get();
        let mut items = items.into_iter().peekable();
        std::iter::from_fn(|| {
            items.peek()?;
            let mut cells: Vec<Cell<T>> = items.by_ref().take(count).map(Cell::Item).collect();
            cells.resize_with(count, || Cell::Placeholder);
            Some(Row { cells })
        })
        .collect()
    }
}

/// One-shot form of [`GridPacker::pack`].
pub fn pack<T>(
    items: impl IntoIterator<Item = T>,
    count: usize,
) -> Result<Vec<Row<T>>, LayoutError> {
    Ok(GridPacker::new(count)?.pack(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells<T: Clone>(rows: &[Row<T>]) -> Vec<Vec<Option<T>>> {
        rows.iter()
            .map(|row| row.cells().iter().map(|c| c.as_item().cloned()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        let rows = pack(Vec::<char>::new(), 3).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_last_row_is_padded() {
        let rows = pack(['a', 'b', 'c', 'd', 'e'], 2).unwrap();
        assert_eq!(
            cells(&rows),
            vec![
                vec![Some('a'), Some('b')],
                vec![Some('c'), Some('d')],
                vec![Some('e'), None],
            ]
        );
        assert_eq!(rows[2].placeholders(), 1);
        assert_eq!(rows[2].items().collect::<Vec<_>>(), vec![&'e']);
    }

    #[test]
    fn test_even_division_has_no_padding() {
        let rows = pack(['a', 'b', 'c', 'd'], 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.placeholders() == 0));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert_eq!(
            pack([1, 2, 3], 0).unwrap_err(),
            LayoutError::InvalidArgument { count: 0 }
        );
        assert!(GridPacker::new(0).is_err());
    }

    #[test]
    fn test_every_row_has_count_cells() {
        let packer = GridPacker::new(4).unwrap();
        let rows = packer.pack(0..10);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 4));
        assert_eq!(rows[2].placeholders(), 2);

        let flattened: Vec<i32> = rows.iter().flat_map(|row| row.items().copied()).collect();
        assert_eq!(flattened, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_column_width() {
        assert_eq!(GridPacker::new(4).unwrap().column_width_percent(), 25.0);
        assert_eq!(GridPacker::new(1).unwrap().pack(["x"]).len(), 1);
    }
}
