/// Splits text into lines of at most `max_chars` characters without breaking
/// words. A single word longer than the limit is hard-split into fixed-size
/// chunks. Paragraph breaks (`\n`) in the input always force a line break.
pub fn split_text_to_lines(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let max_chars = max_chars.max(1);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut cur = String::new();
        let mut cur_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let sep = if cur_len == 0 { 0 } else { 1 };

            if cur_len + sep + word_len <= max_chars {
                if sep == 1 {
                    cur.push(' ');
                }
                cur.push_str(word);
                cur_len += sep + word_len;
            } else if word_len > max_chars {
                // Over-long word: flush the pending line, then hard-split.
                if cur_len > 0 {
                    lines.push(std::mem::take(&mut cur));
                    cur_len = 0;
                }
                let mut rest: Vec<char> = word.chars().collect();
                while rest.len() > max_chars {
                    let tail = rest.split_off(max_chars);
                    lines.push(rest.into_iter().collect());
                    rest = tail;
                }
                cur = rest.into_iter().collect();
                cur_len = cur.chars().count();
            } else {
                lines.push(std::mem::take(&mut cur));
                cur.push_str(word);
                cur_len = word_len;
            }
        }

        if cur_len > 0 {
            lines.push(cur);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(split_text_to_lines("", 10).is_empty());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(split_text_to_lines("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = split_text_to_lines("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn rejoining_lines_preserves_words() {
        let text = "  one   two\tthree\nfour five  ";
        let rejoined = split_text_to_lines(text, 7).join(" ");
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, normalized);
    }

    #[test]
    fn overlong_word_is_chunked() {
        let word = "abcdefghijklmnop"; // 16 chars
        let lines = split_text_to_lines(word, 5);
        assert_eq!(lines.len(), 4); // ceil(16 / 5)
        for line in &lines {
            assert!(line.chars().count() <= 5);
        }
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn overlong_word_with_exact_multiple_length() {
        let word = "aaaaaaaaaa"; // 10 chars, limit 5
        let lines = split_text_to_lines(word, 5);
        assert_eq!(lines, vec!["aaaaa", "aaaaa"]);
    }

    #[test]
    fn pending_words_survive_an_overlong_neighbour() {
        let lines = split_text_to_lines("hi incomprehensibilities", 8);
        assert_eq!(lines[0], "hi");
        assert_eq!(lines.join(""), "hiincomprehensibilities");
    }

    #[test]
    fn paragraph_breaks_force_new_lines() {
        let lines = split_text_to_lines("alpha\nbeta", 40);
        assert_eq!(lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn limit_of_one_still_terminates() {
        let lines = split_text_to_lines("ab c", 1);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
