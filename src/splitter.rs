//! Разбиение идентификаторов на подслова.
//!
//! Эвристика camelCase / snake_case без словаря: новое подслово начинается
//! на заглавной букве после незаглавной либо после подчёркивания. Цепочка
//! заглавных остаётся одним подсловом, поэтому `HTTPServer` даёт `httpserver`,
//! а не `http` + `server`.

/// Разбить идентификатор на подслова в нижнем регистре.
///
/// Односимвольная строка возвращается как есть.
pub fn split_words(word: &str) -> Vec<String> {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => return Vec::new(),
        (Some(_), None) => return vec![word.to_string()],
        _ => {}
    }

    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_upper = false;

    for c in word.chars() {
        if c == '_' {
            flush(&mut current, &mut words);
            previous_upper = false;
            continue;
        }

        let upper = c.is_uppercase();
        if upper && !previous_upper {
            flush(&mut current, &mut words);
        }
        current.push(c);
        previous_upper = upper;
    }
    flush(&mut current, &mut words);

    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(current.to_lowercase());
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(split_words("getFooValue"), vec!["get", "foo", "value"]);
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(split_words("MAX_SIZE"), vec!["max", "size"]);
    }

    #[test]
    fn test_single_character() {
        assert_eq!(split_words("x"), vec!["x"]);
        assert_eq!(split_words("X"), vec!["X"]);
    }

    #[test]
    fn test_snake_case_drops_underscores() {
        assert_eq!(split_words("get_foo"), vec!["get", "foo"]);
        assert_eq!(split_words("__init__"), vec!["init"]);
    }

    #[test]
    fn test_upper_run_is_not_segmented() {
        assert_eq!(split_words("HTTPServer"), vec!["httpserver"]);
        assert_eq!(split_words("parseHTTPServer"), vec!["parse", "httpserver"]);
    }

    #[test]
    fn test_digits_stay_attached() {
        assert_eq!(split_words("m1"), vec!["m1"]);
    }

    #[test]
    fn test_literal_with_spaces() {
        // строковые литералы передаются целиком
        assert_eq!(split_words("hello World"), vec!["hello ", "world"]);
    }

    #[test]
    fn test_empty() {
        assert!(split_words("").is_empty());
    }
}
