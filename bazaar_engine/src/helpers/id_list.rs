/// Extracts the numeric ids from a comma-separated list such as `"12,15, 21"`.
///
/// Tokens that are not made up entirely of ASCII digits (after trimming) are dropped silently, so `"3,x,-1,4"` yields
/// `[3, 4]`. Values too large for an `i64` are dropped too.
pub fn parse_id_list(items: &str) -> Vec<i64> {
    items
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|t| t.parse::<i64>().ok())
        .collect()
}
