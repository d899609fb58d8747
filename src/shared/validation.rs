use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating calendar date fields as submitted by HTML date inputs
    /// - Valid: "2024-06-10", "1999-12-31"
    /// - Invalid: "2024-6-10", "10/06/2024", "2024-06-10T00:00:00Z", ""
    pub static ref ISO_DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_regex_valid() {
        assert!(ISO_DATE_REGEX.is_match("2024-06-10"));
        assert!(ISO_DATE_REGEX.is_match("1999-12-31"));
        assert!(ISO_DATE_REGEX.is_match("2024-02-30")); // shape only, calendar checked elsewhere
    }

    #[test]
    fn test_iso_date_regex_invalid() {
        assert!(!ISO_DATE_REGEX.is_match("2024-6-10"));
        assert!(!ISO_DATE_REGEX.is_match("10/06/2024"));
        assert!(!ISO_DATE_REGEX.is_match("2024-06-10T00:00:00Z"));
        assert!(!ISO_DATE_REGEX.is_match(" 2024-06-10"));
        assert!(!ISO_DATE_REGEX.is_match(""));
    }
}
