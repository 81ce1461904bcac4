//! # Label / Tag Codec
//!
//! Bijective mapping between a four-character ASCII label and the packed
//! 24-bit tag transmitted on the wire.
//!
//! Each character contributes six bits in the fixed order
//! `{bit6, bit4, bit3, bit2, bit1, bit0}`; bit 5 (the ASCII case bit) is
//! always discarded, which is why lowercase letters decode back as
//! uppercase. The four 6-bit groups are concatenated most significant group
//! first into a 24-bit value. The permutation is implemented as a bit-stream
//! fold so the inverse below is obviously its mirror image.

/// Pack a label into its 24-bit tag. Labels shorter than four characters are
/// right-padded with NUL; longer ones are truncated.
pub fn label_to_tag(label: &str) -> u32 {
    let bytes = label.as_bytes();
    let mut tag: u32 = 0;
    for i in 0..4 {
        let c = bytes.get(i).copied().unwrap_or(0);
        let six = u32::from(((c >> 1) & 0x20) | (c & 0x1F));
        tag = (tag << 6) | six;
    }
    tag
}

/// Unpack a tag back into its label. Any character group that decodes to
/// zero is rendered as a space so decoded labels are always printable.
pub fn tag_to_label(tag: u32) -> String {
    let mut out = String::with_capacity(4);
    for i in 0..4 {
        let six = ((tag >> (18 - 6 * i)) & 0x3F) as u8;
        let c = ((six & 0x20) << 1) | (six & 0x1F);
        out.push(if c == 0 { ' ' } else { c as char });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_tag_bytes() {
        let tag = label_to_tag("PING");
        assert_eq!(tag, 0x00C2_9BA7);
        assert_eq!(tag_to_label(tag), "PING");
    }

    #[test]
    fn test_padded_label_decodes_with_spaces() {
        let tag = label_to_tag("AB");
        assert_eq!(tag_to_label(tag), "AB  ");
    }

    #[test]
    fn test_case_bit_is_discarded() {
        assert_eq!(label_to_tag("ping"), label_to_tag("PING"));
        assert_eq!(tag_to_label(label_to_tag("ping")), "PING");
    }

    #[test]
    fn test_overlong_label_truncates() {
        assert_eq!(label_to_tag("LONGLABEL"), label_to_tag("LONG"));
    }

    #[test]
    fn test_tag_fits_in_24_bits() {
        assert_eq!(label_to_tag("____") >> 24, 0);
        assert_eq!(label_to_tag("\x7F\x7F\x7F\x7F") >> 24, 0);
    }

    #[test]
    fn test_interior_space_roundtrips() {
        // A space packs to zero and is rendered back as a space.
        assert_eq!(tag_to_label(label_to_tag("A B")), "A B ");
    }
}
