//! Minimal PDF writer.
//!
//! Lays out plain-text lines on A4 pages in Helvetica. Only the subset of
//! PDF 1.4 needed for that is emitted: a catalog, a page tree, one font and
//! one content stream per page, followed by the cross-reference table.

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 14;
const WRAP_COLUMNS: usize = 95;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;
const FIRST_PAGE_ID: usize = 4;

/// Escape a line for a PDF literal string. Non-ASCII and control characters
/// become `?` since the base font has no encoding for them.
fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\t' => out.push_str("    "),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Hard-wrap a line at `WRAP_COLUMNS` characters. Continuations are indented.
fn wrap(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= WRAP_COLUMNS {
        return vec![line.to_string()];
    }
    let mut out = vec![chars[..WRAP_COLUMNS].iter().collect::<String>()];
    for chunk in chars[WRAP_COLUMNS..].chunks(WRAP_COLUMNS - 4) {
        out.push(format!("    {}", chunk.iter().collect::<String>()));
    }
    out
}

fn content_stream(lines: &[String]) -> String {
    let mut stream = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        FONT_SIZE,
        LEADING,
        MARGIN,
        PAGE_HEIGHT - MARGIN
    );
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            stream.push_str("T*\n");
        }
        stream.push_str(&format!("({}) Tj\n", escape(line)));
    }
    stream.push_str("ET");
    stream
}

/// Render `lines` into a complete PDF document.
pub fn render_lines(lines: &[String]) -> Vec<u8> {
    let wrapped: Vec<String> = lines.iter().flat_map(|l| wrap(l)).collect();
    let mut pages: Vec<&[String]> = wrapped.chunks(LINES_PER_PAGE).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }

    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_ID + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<String> = vec![
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
            PAGES_ID,
            PAGE_WIDTH,
            PAGE_HEIGHT,
            FONT_ID,
            id + 1
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        CATALOG_ID,
        xref_offset
    ));
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {}", i)).collect()
    }

    fn page_count(pdf: &[u8]) -> usize {
        String::from_utf8_lossy(pdf).matches("/Type /Page ").count()
    }

    #[test]
    fn test_document_structure() {
        let pdf = render_lines(&lines(3));
        let text = String::from_utf8(pdf.clone()).unwrap();
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("(line 2) Tj"));
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = render_lines(&lines(5));
        let text = String::from_utf8(pdf).unwrap();
        let xref_at: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(text[xref_at..].starts_with("xref\n"));

        let entries: Vec<&str> = text[xref_at..].lines().skip(3).take(5).collect();
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(text[offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn test_pagination() {
        assert_eq!(page_count(&render_lines(&[])), 1);
        assert_eq!(page_count(&render_lines(&lines(LINES_PER_PAGE))), 1);
        assert_eq!(page_count(&render_lines(&lines(LINES_PER_PAGE + 1))), 2);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r"f(x) \ y"), r"f\(x\) \\ y");
        assert_eq!(escape("caf\u{e9} \u{2705}"), "caf? ?");
    }

    #[test]
    fn test_wrap_long_lines() {
        let long = "x".repeat(WRAP_COLUMNS * 2);
        let wrapped = wrap(&long);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped[0].len(), WRAP_COLUMNS);
        assert!(wrapped[1].starts_with("    x"));
    }
}
