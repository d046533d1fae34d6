//! VIN decoding for the multi-frame mode 09 PID 02 response.

/// Reported when the vehicle does not return a usable VIN.
pub const UNKNOWN: &str = "Unknown";

/// Decode the raw response text into a printable VIN, or [`UNKNOWN`].
///
/// The VIN arrives as hex-encoded ASCII split over ISO-TP frames, each prefixed with
/// the `4902` echo and a frame-sequence byte `00`..`09`. All whitespace is dropped,
/// every header occurrence removed, and the remaining hex pairs are kept only where
/// they decode to printable ASCII (32..=126).
pub fn parse_vin(response: &str) -> String {
    let hex: String = response.chars().filter(|c| !c.is_whitespace()).collect();
    let data: Vec<char> = strip_frame_headers(&hex).chars().collect();

    let mut vin = String::new();
    for pair in data.chunks(2) {
        let pair: String = pair.iter().collect();
        if let Ok(byte) = u8::from_str_radix(&pair, 16) {
            if (32..=126).contains(&byte) {
                vin.push(byte as char);
            }
        }
    }

    let vin = vin.trim();
    if vin.is_empty() {
        UNKNOWN.to_string()
    } else {
        vin.to_string()
    }
}

/// Remove every `49020<digit>` header. Single left-to-right pass; a removed header is
/// not rescanned.
fn strip_frame_headers(hex: &str) -> String {
    let chars: Vec<char> = hex.chars().collect();
    let mut out = String::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        if i + 6 <= chars.len()
            && chars[i..i + 5] == ['4', '9', '0', '2', '0']
            && chars[i + 5].is_ascii_digit()
        {
            i += 6;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}
