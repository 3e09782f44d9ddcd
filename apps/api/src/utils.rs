/// Formats a byte count with binary units and two decimals, e.g. `1536` → `1.50 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.2} KB");
    }

    let mb = kb / 1024.0;
    if mb < 1024.0 {
        return format!("{mb:.2} MB");
    }

    format!("{:.2} GB", mb / 1024.0)
}

/// Joins CSS class lists, dropping blanks and repeated classes.
pub fn join_classes(parts: &[&str]) -> String {
    let mut classes: Vec<&str> = Vec::new();
    for class in parts.iter().flat_map(|p| p.split_whitespace()) {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    classes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1_048_576), "1.00 MB");
        assert_eq!(format_size(5_242_880), "5.00 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn test_format_size_sub_kilobyte() {
        assert_eq!(format_size(512), "0.50 KB");
    }

    #[test]
    fn test_join_classes() {
        assert_eq!(
            join_classes(&["flex  items-center", "", "bg-green-100", "flex"]),
            "flex items-center bg-green-100"
        );
        assert_eq!(join_classes(&[]), "");
    }
}
