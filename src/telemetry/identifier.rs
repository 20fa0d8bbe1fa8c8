/// Short name of an individual: everything after the last `_`.
///
/// Two identifiers sharing a suffix collapse to the same name.
pub fn individual_name(identifier: &str) -> &str {
    identifier.rsplit('_').next().unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_suffix_after_last_underscore() {
        assert_eq!(individual_name("a_b_c"), "c");
        assert_eq!(individual_name("Tapir_MS_Rita"), "Rita");
    }

    #[test]
    fn identifier_without_underscore_is_kept() {
        assert_eq!(individual_name("Rita"), "Rita");
    }

    #[test]
    fn trailing_underscore_gives_empty_name() {
        assert_eq!(individual_name("Rita_"), "");
    }
}
