/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC
///   - 12 bits: random
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | rand_bits
}

/// Random numeric code of `digits` length with no leading zero
/// (e.g. 4 digits gives 1000..=9999).
pub fn numeric_code(digits: u32) -> String {
    use rand::Rng;
    let low = 10u32.pow(digits.saturating_sub(1));
    let high = 10u32.pow(digits) - 1;
    rand::thread_rng().gen_range(low..=high).to_string()
}
