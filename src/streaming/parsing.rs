//! Zero-allocation bedGraph parsing utilities.
//!
//! These functions parse bedGraph lines straight from byte slices
//! without any heap allocation in the hot path.

use memchr::memchr;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty or contains non-digit characters.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse the four bedGraph fields using memchr.
///
/// Returns (chrom_bytes, start, end, value) or None if the line is not a
/// tab-separated bedGraph record. Columns after the value are ignored.
#[inline]
pub fn parse_bedgraph_bytes(line: &[u8]) -> Option<(&[u8], u64, u64, f64)> {
    let line = trim_line_end(line);

    let tab1 = memchr(b'\t', line)?;
    let chrom = &line[..tab1];

    let rest1 = &line[tab1 + 1..];
    let tab2 = memchr(b'\t', rest1)?;
    let start = parse_u64_fast(&rest1[..tab2])?;

    let rest2 = &rest1[tab2 + 1..];
    let tab3 = memchr(b'\t', rest2)?;
    let end = parse_u64_fast(&rest2[..tab3])?;

    let rest3 = &rest2[tab3 + 1..];
    let value_len = memchr(b'\t', rest3).unwrap_or(rest3.len());
    let value: f64 = std::str::from_utf8(&rest3[..value_len]).ok()?.parse().ok()?;

    Some((chrom, start, end, value))
}

/// Strip a trailing `\n` or `\r\n`.
#[inline(always)]
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#' || line.starts_with(b"track") || line.starts_with(b"browser")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_fast() {
        assert_eq!(parse_u64_fast(b"12345"), Some(12345));
        assert_eq!(parse_u64_fast(b"0"), Some(0));
        assert_eq!(parse_u64_fast(b""), None);
        assert_eq!(parse_u64_fast(b"abc"), None);
        assert_eq!(parse_u64_fast(b"123abc"), None);
        assert_eq!(parse_u64_fast(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_u64_fast(b"18446744073709551616"), None);
    }

    #[test]
    fn test_parse_bedgraph_bytes() {
        assert_eq!(
            parse_bedgraph_bytes(b"chr1\t100\t200\t1.5"),
            Some((&b"chr1"[..], 100, 200, 1.5))
        );
        assert_eq!(
            parse_bedgraph_bytes(b"chr1\t100\t200\t-3\textra"),
            Some((&b"chr1"[..], 100, 200, -3.0))
        );
        assert_eq!(
            parse_bedgraph_bytes(b"chr1\t100\t200\t2\r\n"),
            Some((&b"chr1"[..], 100, 200, 2.0))
        );
        assert_eq!(parse_bedgraph_bytes(b"chr1\t100\t200"), None);
        assert_eq!(parse_bedgraph_bytes(b"chr1\t100\t200\tnope"), None);
        assert_eq!(parse_bedgraph_bytes(b""), None);
    }

    #[test]
    fn test_should_skip_line() {
        assert!(should_skip_line(b""));
        assert!(should_skip_line(b"#comment"));
        assert!(should_skip_line(b"track type=bedGraph"));
        assert!(should_skip_line(b"browser position chr1:1-100"));
        assert!(!should_skip_line(b"chr1\t100\t200\t1"));
    }
}
