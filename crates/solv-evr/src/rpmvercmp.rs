use std::cmp::Ordering;

fn is_separator(c: char) -> bool {
    !c.is_ascii_alphanumeric() && c != '~'
}

/// Splits `s` into runs of digits, runs of ASCII letters, and separator runs,
/// in order, skipping the separator runs themselves (they only act as
/// segment boundaries).
fn segments(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if is_separator(c) {
            i += 1;
            continue;
        }
        let start = i;
        let is_digit = c.is_ascii_digit();
        while i < bytes.len() {
            let c = bytes[i] as char;
            if is_separator(c) || c.is_ascii_digit() != is_digit {
                break;
            }
            i += 1;
        }
        out.push(&s[start..i]);
    }
    out
}

fn is_digit_segment(seg: &str) -> bool {
    seg.as_bytes()[0].is_ascii_digit()
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    match (is_digit_segment(a), is_digit_segment(b)) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            match a.len().cmp(&b.len()) {
                Ordering::Equal => a.cmp(b),
                other => other,
            }
        }
        (false, false) => a.cmp(b),
    }
}

/// Compares two version strings the way rpm's `rpmvercmp` does: alternating
/// runs of digits and letters are compared pairwise (numeric runs
/// numerically, alpha runs lexically), a `~` sorts before everything
/// including the end of string, and whichever string runs out of segments
/// first is the smaller one unless the remaining segment on the other side
/// is purely alphabetic, in which case it is treated as a pre-release tag
/// and loses to the shorter string.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (a_tilde, b_tilde) = (a.find('~'), b.find('~'));
    match (a_tilde, b_tilde) {
        (Some(ai), Some(bi)) => {
            let head = rpmvercmp(&a[..ai], &b[..bi]);
            if head != Ordering::Equal {
                return head;
            }
            return rpmvercmp(&a[ai + 1..], &b[bi + 1..]);
        }
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => {}
    }

    let a_segs = segments(a);
    let b_segs = segments(b);

    for (sa, sb) in a_segs.iter().zip(b_segs.iter()) {
        let ord = compare_segment(sa, sb);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    match a_segs.len().cmp(&b_segs.len()) {
        Ordering::Equal => Ordering::Equal,
        Ordering::Greater => {
            if is_digit_segment(a_segs[b_segs.len()]) {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        Ordering::Less => {
            if is_digit_segment(b_segs[a_segs.len()]) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}
