//! Lipinski acceptor approximation from a molecular formula.
//!
//! The Rule of Five teaching simplification counts every nitrogen and
//! oxygen atom as an acceptor. This is not the database acceptor count.

/// Approximate the Lipinski HBA count as `#N + #O`.
///
/// Element symbols are an uppercase letter followed by lowercase letters, so
/// `Na`, `Ni` and `Os` are never mistaken for N or O. A symbol without a
/// trailing count means one atom. Components separated by `.` are summed,
/// each scaled by its leading multiplier (`CuO4S.5H2O` has nine). Charge
/// signs and other non-element characters are skipped.
pub fn approximate_hba(formula: &str) -> u32 {
    formula
        .split('.')
        .map(component_hba)
        .fold(0u32, u32::saturating_add)
}

fn component_hba(component: &str) -> u32 {
    let digits = component.bytes().take_while(u8::is_ascii_digit).count();
    let (multiplier, rest) = component.split_at(digits);
    let multiplier = if multiplier.is_empty() {
        1
    } else {
        multiplier.parse().unwrap_or(u32::MAX)
    };

    element_counts(rest)
        .filter(|(symbol, _)| *symbol == "N" || *symbol == "O")
        .fold(0u32, |acc, (_, count)| acc.saturating_add(count))
        .saturating_mul(multiplier)
}

/// Iterate `(symbol, count)` pairs in the order they appear.
fn element_counts(formula: &str) -> impl Iterator<Item = (&str, u32)> {
    let bytes = formula.as_bytes();
    let mut pos = 0;

    std::iter::from_fn(move || {
        while pos < bytes.len() {
            if !bytes[pos].is_ascii_uppercase() {
                pos += 1;
                continue;
            }

            let start = pos;
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_lowercase() {
                pos += 1;
            }
            let symbol = &formula[start..pos];

            let digits_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let count = if digits_start == pos {
                1
            } else {
                formula[digits_start..pos].parse().unwrap_or(u32::MAX)
            };

            return Some((symbol, count));
        }
        None
    })
}
