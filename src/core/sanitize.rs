// src/core/sanitize.rs

/// Named entities seen in the catalog pages. Anything else is left as-is.
const NAMED: &[(&str, char)] = &[
    ("nbsp", ' '), ("amp", '&'), ("lt", '<'), ("gt", '>'), ("quot", '"'),
    ("apos", '\''), ("eacute", 'é'), ("egrave", 'è'), ("ecirc", 'ê'),
    ("euml", 'ë'), ("agrave", 'à'), ("acirc", 'â'), ("ccedil", 'ç'),
    ("icirc", 'î'), ("iuml", 'ï'), ("ocirc", 'ô'), ("ugrave", 'ù'),
    ("ucirc", 'û'), ("Eacute", 'É'), ("laquo", '«'), ("raquo", '»'),
    ("rsquo", '’'), ("hellip", '…'),
];

/// Decode the entity body between `&` and `;` (`eacute`, `#233`, `#xE9`).
pub fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

pub fn normalize_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 8)
            .and_then(|semi| decode_entity(&tail[..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Titles often end with the period that separated them from the dates.
pub fn clean_title(s: &str) -> String {
    normalize_ws(s).trim_end_matches('.').trim_end().to_string()
}

/// Parse an all-digit cell; anything else counts as zero.
pub fn digits_or_zero(s: &str) -> u64 {
    let t = s.trim();
    if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) {
        t.parse().unwrap_or(0)
    } else {
        0
    }
}

/// Upper-cased, single-spaced key used to compare identifiers and names.
pub fn key(s: &str) -> String {
    normalize_ws(s).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_named_numeric_and_unknown() {
        assert_eq!(normalize_entities("D&eacute;tail&nbsp;des fonds"), "Détail des fonds");
        assert_eq!(normalize_entities("&#233;t&#xE9;"), "été");
        assert_eq!(normalize_entities("A & B &bogus; C"), "A & B &bogus; C");
    }

    #[test]
    fn title_loses_trailing_period() {
        assert_eq!(clean_title("  Tribunal de commerce.  "), "Tribunal de commerce");
    }

    #[test]
    fn digits_only() {
        assert_eq!(digits_or_zero(" 39 "), 39);
        assert_eq!(digits_or_zero("3 9"), 0);
        assert_eq!(digits_or_zero(""), 0);
    }
}
