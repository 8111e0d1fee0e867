//! Usage lines and column listings

use crate::args::CONTEXT_PARAM;

/// Render the usage line of a command
///
/// Required parameters are listed plainly; each optional parameter opens one
/// more bracket level. The context parameter is not shown.
///
/// ```
/// use pymol_cmd::format_usage;
///
/// assert_eq!(
///     format_usage("op", ["name", "value", "flag"], 1),
///     "Usage: op name [, value [, flag ]]"
/// );
/// ```
pub fn format_usage<'a>(
    name: &str,
    params: impl IntoIterator<Item = &'a str>,
    required: usize,
) -> String {
    let mut usage = format!("Usage: {}", name);
    let mut open = 0;

    for (i, param) in params
        .into_iter()
        .filter(|p| *p != CONTEXT_PARAM)
        .enumerate()
    {
        if i >= required {
            usage.push_str(" [");
            open += 1;
        }
        usage.push_str(if i > 0 { ", " } else { " " });
        usage.push_str(param);
    }
    usage.push(' ');
    usage.push_str(&"]".repeat(open));
    usage
}

/// Lay names out in columns, filling each column top to bottom
///
/// Every entry is padded to the longest one; rows start with `margin` spaces
/// and columns are separated by two spaces.
pub fn format_columns<S: AsRef<str>>(items: &[S], width: usize, margin: usize) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }

    let longest = items
        .iter()
        .map(|s| s.as_ref().chars().count())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut columns = width / longest;
    let usable = width.saturating_sub(margin);
    while columns > 0 && columns * longest + columns * 2 > usable {
        columns -= 1;
    }
    let columns = columns.max(1);
    let rows = items.len().div_ceil(columns);

    let mut table: Vec<Vec<String>> = vec![Vec::new(); rows];
    for (i, item) in items.iter().enumerate() {
        table[i % rows].push(format!("{:<width$}", item.as_ref(), width = longest));
    }
    table
        .into_iter()
        .map(|row| format!("{}{}", " ".repeat(margin), row.join("  ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_brackets() {
        assert_eq!(
            format_usage("set", ["name", "value", "selection", "state", "_self"], 1),
            "Usage: set name [, value [, selection [, state ]]]"
        );
        assert_eq!(format_usage("a", ["x", "y"], 2), "Usage: a x, y ");
        assert_eq!(format_usage("zoom", ["_self"], 0), "Usage: zoom ");
        assert_eq!(format_usage("b", ["x"], 0), "Usage: b [ x ]");
    }

    #[test]
    fn test_columns_fill_downwards() {
        let names = ["get", "help", "run", "set", "spawn"];
        let rows = format_columns(&names, 20, 2);
        // 5 wide entries: 20 / 5 = 4 columns, shrunk to 2 to fit in 18
        assert_eq!(rows, vec!["  get    set  ", "  help   spawn", "  run  "]);
    }

    #[test]
    fn test_columns_single_wide_column() {
        let rows = format_columns(&["a_very_long_command_name"], 10, 2);
        assert_eq!(rows, vec!["  a_very_long_command_name"]);
        assert!(format_columns::<&str>(&[], 77, 2).is_empty());
    }
}
