//! Markdown table assembly from rendered row fragments.

/// Assemble a Markdown grid from already-rendered row fragments.
///
/// The first fragment becomes the header; the separator row is synthesized
/// from the header's delimiter count. Each emitted line gets the given
/// indent prefix. Zero rows produce empty output — no header is invented
/// from nothing.
pub fn assemble_table(rows: &[String], indent: &str) -> String {
    let mut lines = rows
        .iter()
        .flat_map(|fragment| fragment.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let header = match lines.next() {
        Some(header) => header,
        None => return String::new(),
    };
    let columns = header.matches('|').count().saturating_sub(1);

    let mut out = String::new();
    out.push_str(indent);
    out.push_str(header);
    out.push('\n');

    out.push_str(indent);
    out.push('|');
    for _ in 0..columns {
        out.push_str(" --- |");
    }
    out.push('\n');

    for line in lines {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }

    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_one_data_row() {
        let rows = vec!["| A | B |\n".to_string(), "| 1 | 2 |\n".to_string()];
        assert_eq!(
            assemble_table(&rows, ""),
            "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n"
        );
    }

    #[test]
    fn test_zero_rows_is_empty() {
        assert_eq!(assemble_table(&[], ""), "");
    }

    #[test]
    fn test_empty_fragments_skipped() {
        // Partial row children render as empty fragments.
        let rows = vec![
            String::new(),
            "| only |\n".to_string(),
            String::new(),
        ];
        assert_eq!(assemble_table(&rows, ""), "| only |\n| --- |\n\n");
    }

    #[test]
    fn test_indent_applied_to_every_line() {
        let rows = vec!["| A |\n".to_string(), "| 1 |\n".to_string()];
        assert_eq!(
            assemble_table(&rows, "  "),
            "  | A |\n  | --- |\n  | 1 |\n\n"
        );
    }

    #[test]
    fn test_column_count_from_header() {
        let rows = vec![
            "| a | b | c |\n".to_string(),
            "| 1 | 2 | 3 |\n".to_string(),
        ];
        let out = assemble_table(&rows, "");
        assert!(out.contains("| --- | --- | --- |"));
    }
}
