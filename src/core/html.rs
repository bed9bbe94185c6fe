// src/core/html.rs
//
// Case-insensitive scanning over raw markup. No DOM: callers walk known blocks
// (`<table>…</table>`, `<tr>…</tr>`) and slice them. Lower-casing is ASCII-only,
// so byte offsets in the lowered copy line up with the input.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// A document and its lower-cased twin, so repeated block lookups over the
/// same markup lower-case it once.
pub struct Scan<'a> {
    src: &'a str,
    lc: String,
}

impl<'a> Scan<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, lc: to_lower(src) }
    }

    /// Next `<o …>…c` block at or after `from`, as `(start, end)` byte offsets.
    pub fn next_block(&self, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
        let ol = to_lower(o);
        let cl = to_lower(c);
        let mut at = from;
        loop {
            let start = self.lc.get(at..)?.find(&ol)? + at;
            // `<tr` must not match `<track`
            if !is_name_boundary(self.lc.as_bytes().get(start + ol.len()).copied()) {
                at = start + ol.len();
                continue;
            }
            let open_end = self.src[start..].find('>')? + start + 1;
            let end_rel = self.lc[open_end..].find(&cl)?;
            return Some((start, open_end + end_rel + c.len()));
        }
    }

    /// Every `<tag …>…</tag>` block, in document order.
    pub fn blocks(&self, tag: &str) -> Vec<&'a str> {
        let open = join!("<", tag);
        let close = join!("</", tag, ">");
        let mut out = Vec::new();
        let mut pos = 0usize;
        while let Some((s, e)) = self.next_block(&open, &close, pos) {
            out.push(&self.src[s..e]);
            pos = e;
        }
        out
    }

    /// First `<tag …>` element whose `attr` equals `value` (case-insensitive).
    pub fn find_block_with_attr(&self, tag: &str, attr: &str, value: &str) -> Option<&'a str> {
        let open = join!("<", tag);
        let close = join!("</", tag, ">");
        let mut pos = 0usize;
        while let Some((start, end)) = self.next_block(&open, &close, pos) {
            let block = &self.src[start..end];
            let matches = attr_value(open_tag(block), attr)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value));
            if matches {
                return Some(block);
            }
            pos = start + open.len();
        }
        None
    }
}

/// The opening tag of a block, `<tr class="pair">` for `<tr class="pair">…</tr>`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

/// Attribute value from an opening tag. Handles `"…"`, `'…'` and bare values.
pub fn attr_value(opener: &str, attr: &str) -> Option<String> {
    let lc = to_lower(opener);
    let needle = to_lower(attr);
    let bytes = lc.as_bytes();
    let mut from = 0usize;

    while let Some(rel) = lc[from..].find(&needle) {
        let at = from + rel;
        from = at + needle.len();
        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        let Some(rest) = opener[from..].trim_start().strip_prefix('=') else { continue };
        let rest = rest.trim_start();
        let value = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let inner = &rest[1..];
                &inner[..inner.find(q)?]
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                rest[..end].trim_end_matches('/')
            }
        };
        return Some(value.to_string());
    }
    None
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Inner markup of every `<tag>` cell in `row`, in document order.
pub fn cells(row: &str, tag: &str) -> Vec<String> {
    Scan::new(row).blocks(tag).into_iter().map(inner_after_open_tag).collect()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Visible text of a fragment: tags dropped, then entities decoded, whitespace collapsed.
/// Decoding last keeps an encoded `&gt;` as text.
pub fn cell_text(fragment: &str) -> String {
    super::sanitize::normalize_ws(&super::sanitize::normalize_entities(&strip_tags(fragment)))
}

fn is_name_boundary(b: Option<u8>) -> bool {
    matches!(b, None | Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/'))
}
