// src/core/text.rs
// Visible-text character iterator over a whole page.
// Skips tags (<...>) and the bodies of <script>/<style>, decodes entities,
// turns block-level tags into '\n' and collapses other whitespace to ' '.
// Plain text passes through with only entity decoding and space collapsing.

use super::sanitize::decode_entity;

const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "tr", "li", "ul", "ol", "table", "h1", "h2", "h3", "h4",
    "h5", "h6", "section", "article", "header", "footer", "nav", "dt", "dd",
];
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

pub struct TextChars<'a> {
    s: &'a str,
    b: &'a [u8],
    i: usize,
    n: usize,
    pending: Option<char>,
}

impl<'a> TextChars<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, b: s.as_bytes(), i: 0, n: s.len(), pending: None }
    }

    /// Called on '<'. Returns true when the tag breaks the line.
    fn skip_tag(&mut self) -> bool {
        let start = self.i + 1;
        if self.s[start..].starts_with("!--") {
            self.skip_comment(start + 3);
            return false;
        }

        self.i += 1;
        // Quotes only delimit a value right after `=`; a stray apostrophe in
        // a bare value or attribute name is literal.
        let mut quote: Option<u8> = None;
        let mut prev = b'<';
        while self.i < self.n {
            let b = self.b[self.i];
            self.i += 1;
            match quote {
                Some(q) => {
                    if b == q { quote = None; prev = b; }
                }
                None => match b {
                    b'>' => break,
                    b'\'' | b'"' if prev == b'=' => quote = Some(b),
                    _ if b.is_ascii_whitespace() => {}
                    _ => prev = b,
                },
            }
        }

        let name = tag_name(&self.s[start..self.i.min(self.n)]);
        let closing = self.b.get(start) == Some(&b'/');
        if !closing && RAW_TEXT_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
            self.skip_raw_text(&name);
            return false;
        }
        BLOCK_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t))
    }

    /// Jump past `-->` or to the end of input. `from` is just after `<!--`.
    fn skip_comment(&mut self, from: usize) {
        self.i = match self.s[from..].find("-->") {
            Some(rel) => from + rel + 3,
            None => self.n,
        };
    }

    /// Jump past `</name>` (case-insensitive) or to the end of input.
    fn skip_raw_text(&mut self, name: &str) {
        let close = format!("</{}", name.to_ascii_lowercase());
        let hay = self.s[self.i..].to_ascii_lowercase();
        match hay.find(&close) {
            Some(rel) => {
                self.i += rel;
                // consume the closing tag itself
                while self.i < self.n && self.b[self.i] != b'>' { self.i += 1; }
                self.i = (self.i + 1).min(self.n);
            }
            None => self.i = self.n,
        }
    }

    /// Called on '&'. Decodes a known entity, else yields the '&' itself.
    fn entity(&mut self) -> char {
        let tail = &self.s[self.i + 1..];
        if let Some(semi) = tail.find(';').filter(|&p| p <= 8) {
            if let Some(c) = decode_entity(&tail[..semi]) {
                self.i += semi + 2;
                return c;
            }
        }
        self.i += 1;
        '&'
    }

    #[inline]
    fn next_char(&mut self) -> Option<char> {
        let ch = self.s[self.i..].chars().next()?;
        self.i += ch.len_utf8();
        Some(ch)
    }
}

impl<'a> Iterator for TextChars<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(c) = self.pending.take() {
            return Some(c);
        }
        while self.i < self.n {
            match self.b[self.i] {
                b'<' => {
                    if self.skip_tag() { return Some('\n'); }
                    continue;
                }
                b'&' => {
                    let c = self.entity();
                    return Some(if c == '\u{a0}' { ' ' } else { c });
                }
                b'\n' => { self.i += 1; return Some('\n'); }
                b'\r' => {
                    self.i += 1;
                    if self.b.get(self.i) == Some(&b'\n') { self.i += 1; }
                    return Some('\n');
                }
                b' ' | b'\t' => {
                    // collapse runs of blanks to a single space
                    while self.i < self.n && matches!(self.b[self.i], b' ' | b'\t') { self.i += 1; }
                    return Some(' ');
                }
                _ => return self.next_char(),
            }
        }
        None
    }
}

fn tag_name(tag_body: &str) -> String {
    tag_body
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Whole visible text of a unit, one logical line per block element.
pub fn visible_text(s: &str) -> String {
    TextChars::new(s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_lines(s: &str) -> Vec<String> {
        visible_text(s)
            .lines()
            .map(crate::core::sanitize::normalize_ws)
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn block_tags_break_lines() {
        let doc = "<div>14 B - Tribunal.<br/>(1790-1858) 39</div><p>26 J - Fonds</p>";
        assert_eq!(
            visible_lines(doc),
            vec!["14 B - Tribunal.", "(1790-1858) 39", "26 J - Fonds"]
        );
    }

    #[test]
    fn inline_tags_and_entities() {
        let doc = "<span>Ren&eacute;</span> <b>Egger</b>&nbsp;(architecte)";
        assert_eq!(visible_text(doc), "René Egger (architecte)");
    }

    #[test]
    fn scripts_are_dropped() {
        let doc = "<script>var a = '<tr>';</script>14 B - X (1790) 2<style>p{}</style>";
        assert_eq!(visible_lines(doc), vec!["14 B - X (1790) 2"]);
    }

    #[test]
    fn plain_text_passes_through() {
        let txt = "line one\r\nline  two\n\n";
        assert_eq!(visible_lines(txt), vec!["line one", "line two"]);
    }

    #[test]
    fn apostrophes_in_comments_and_bare_values_are_literal() {
        let doc = "<!-- lien vers l'accueil -->\n<div>14 B - Tribunal. (1790-1858) 39</div>\n\
                   <a title=l'accueil href=/>Accueil</a><div>26 J - Famille (1800) 4</div>";
        assert_eq!(
            visible_lines(doc),
            vec!["14 B - Tribunal. (1790-1858) 39", "Accueil", "26 J - Famille (1800) 4"]
        );
    }

    #[test]
    fn quoted_values_may_hold_markup_characters() {
        let doc = r#"<a title="a > b" data-x='it''s'>lien</a> <!-- <p> -->fin"#;
        assert_eq!(visible_text(doc), "lien fin");
    }

    #[test]
    fn unterminated_comment_ends_the_text() {
        assert_eq!(visible_text("avant<!-- jamais fermé"), "avant");
    }
}
