//! Column-major table layout for lists of names.

/// Lay out items of the given lengths in column-major order so that every row
/// fits into `max_width`.
///
/// Returns one entry per row, each holding the column widths of that row. The
/// last column may be partially filled, in which case only the first rows
/// have it. If the items cannot fit even in a single column, every item gets
/// its own row with the width of the longest item.
pub fn table_layout(lens: &[usize], max_width: usize, separator_len: usize) -> Vec<Vec<usize>> {
    let total = lens.len();
    let Some(&longest) = lens.iter().max() else {
        return Vec::new();
    };

    let mut rows = 1;
    let mut full_columns = total / rows;
    while full_columns > 0 {
        let column_widths: Vec<usize> = (0..full_columns)
            .map(|j| lens[j * rows..(j + 1) * rows].iter().copied().max().unwrap_or(0))
            .collect();

        let widths: Vec<Vec<usize>> = (0..rows)
            .map(|i| {
                let mut row = column_widths.clone();
                if let Some(&remainder) = lens.get(i + full_columns * rows) {
                    row.push(remainder);
                }
                row
            })
            .collect();

        let required = widths
            .iter()
            .map(|row| row.iter().sum::<usize>() + separator_len * (row.len() - 1))
            .max()
            .unwrap_or(0);
        if required <= max_width {
            return widths;
        }

        rows += 1;
        full_columns = total / rows;
    }

    vec![vec![longest]; total]
}

/// Render `items` as table rows fitted to `max_width`.
pub fn format_table(items: &[&str], max_width: usize, separator: &str) -> Vec<String> {
    let lens: Vec<usize> = items.iter().map(|item| item.chars().count()).collect();
    let widths = table_layout(&lens, max_width, separator.chars().count());
    let rows = widths.len();

    widths
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .filter_map(|(j, &width)| items.get(j * rows + i).map(|item| format!("{item:<width$}")))
                .collect();
            cells.join(separator).trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_fits_in_one_row() {
        assert_eq!(table_layout(&[1, 2, 3], 80, 2), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_partial_last_column() {
        // two rows: columns [a, bb] and [ccc]
        assert_eq!(table_layout(&[1, 2, 3], 7, 2), vec![vec![2, 3], vec![2]]);
    }

    #[test]
    fn test_single_column() {
        assert_eq!(table_layout(&[1, 2, 3], 6, 2), vec![vec![3], vec![3], vec![3]]);
    }

    #[test]
    fn test_too_wide_items() {
        assert_eq!(table_layout(&[5, 9], 4, 1), vec![vec![9], vec![9]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(table_layout(&[], 80, 1).is_empty());
        assert!(format_table(&[], 80, " ").is_empty());
    }

    #[test]
    fn test_format_table_column_major() {
        assert_eq!(format_table(&["a", "bb", "ccc"], 7, "  "), vec!["a   ccc", "bb"]);
        assert_eq!(
            format_table(&["ls", "cd", "pwd", "help"], 80, "  "),
            vec!["ls  cd  pwd  help"]
        );
    }
}
