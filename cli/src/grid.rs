use anyhow::{Context, Result};
use postgate::layout::{Cell, GridPacker, Row};

const PLACEHOLDER: &str = "·";

fn format_rows(rows: &[Row<String>]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.cells()
                .iter()
                .map(|cell| match cell {
                    Cell::Item(item) => item.as_str(),
                    Cell::Placeholder => PLACEHOLDER,
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect()
}

pub fn run_grid_command(items: &[String], count: usize) -> Result<()> {
    let packer = GridPacker::new(count).context("Invalid row width")?;
    let rows = packer.pack(items.iter().cloned());

    println!(
        "{} rows of {} ({:.1}% per cell)",
        rows.len(),
        packer.count(),
        packer.column_width_percent()
    );
    for line in format_rows(&rows) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_last_row() {
        let items: Vec<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
        let rows = GridPacker::new(2).unwrap().pack(items);
        assert_eq!(format_rows(&rows), vec!["a | b", "c | ·"]);
    }

    #[test]
    fn test_zero_count_is_an_error() {
        assert!(run_grid_command(&[], 0).is_err());
    }
}
