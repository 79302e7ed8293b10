use crate::size::MB_PER_GB;

pub struct Formatter {}

impl Formatter {
    /// Formats a size given in gigabytes. Anything below one gigabyte is
    /// shown in whole megabytes.
    pub fn format_size(size_in_gb: f64) -> String {
        if size_in_gb < 1.0 {
            let size_in_mb = (size_in_gb * MB_PER_GB).round() as i64;
            return format!("{number} {unit}", number = size_in_mb, unit = "MB");
        }

        format!(
            "{number:.prec$} {unit}",
            number = size_in_gb,
            prec = 1,
            unit = "GB"
        )
    }

    /// Formats a storage capacity option, e.g. `256GB` or `2TB`.
    pub fn format_capacity(size_in_gb: u32) -> String {
        if size_in_gb >= 1024 {
            format!("{}TB", size_in_gb as f64 / 1024.0)
        } else {
            format!("{}GB", size_in_gb)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizeValue;

    #[test]
    fn formats_small_sizes_in_megabytes() {
        assert_eq!(Formatter::format_size(0.5), "512 MB");
        assert_eq!(Formatter::format_size(0.341796875), "350 MB");
        assert_eq!(Formatter::format_size(0.0), "0 MB");
        assert_eq!(Formatter::format_size(0.9999), "1024 MB");
    }

    #[test]
    fn formats_large_sizes_in_gigabytes() {
        assert_eq!(Formatter::format_size(1.0), "1.0 GB");
        assert_eq!(Formatter::format_size(1.5), "1.5 GB");
        assert_eq!(Formatter::format_size(2.0), "2.0 GB");
        assert_eq!(Formatter::format_size(60.5), "60.5 GB");
        assert_eq!(Formatter::format_size(1234.56), "1234.6 GB");
    }

    #[test]
    fn formatted_gigabytes_parse_back_within_a_tenth() {
        for m in [1.0, 1.04, 1.26, 7.77, 35.5, 255.99, 1999.95] {
            let formatted = Formatter::format_size(m);
            let parsed = formatted.parse::<SizeValue>().unwrap();
            assert!(
                (parsed.to_canonical() - m).abs() <= 0.1,
                "{} -> {}",
                m,
                formatted
            );
        }
    }

    #[test]
    fn formats_capacities() {
        assert_eq!(Formatter::format_capacity(128), "128GB");
        assert_eq!(Formatter::format_capacity(256), "256GB");
        assert_eq!(Formatter::format_capacity(1024), "1TB");
        assert_eq!(Formatter::format_capacity(2048), "2TB");
        assert_eq!(Formatter::format_capacity(1536), "1.5TB");
    }
}
