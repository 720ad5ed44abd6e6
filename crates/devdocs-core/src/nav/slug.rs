/// Turn arbitrary text into an identifier-safe slug.
///
/// Lowercases and trims, replaces whitespace runs with `-`, drops every
/// character outside `[a-z0-9_-]` and collapses repeated hyphens. Letters
/// outside ASCII are dropped, not transliterated, so `"Café"` becomes `"caf"`.
/// Never fails; the result may be empty.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                push_hyphen(&mut result);
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        match ch {
            '-' => push_hyphen(&mut result),
            'a'..='z' | '0'..='9' | '_' => result.push(ch),
            _ => {}
        }
    }

    result
}

fn push_hyphen(out: &mut String) {
    if !out.ends_with('-') {
        out.push('-');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_stripped() {
        insta::assert_snapshot!(slugify("My Tag!"), @"my-tag");
    }

    #[test]
    fn test_whitespace_and_hyphen_runs_collapse() {
        insta::assert_snapshot!(slugify("  a   b--c "), @"a-b-c");
    }

    #[test]
    fn test_paths() {
        assert_eq!(slugify("/users"), "users");
        assert_eq!(slugify("/users/{userId}/messages"), "usersuseridmessages");
        assert_eq!(slugify("/pets/{pet_id}"), "petspet_id");
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(slugify("Café Menü"), "caf-men");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn test_hyphen_left_by_stripped_characters_collapses() {
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("a & b"), "a-b");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }
}
