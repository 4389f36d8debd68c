/// Builds a CAIP-10 identifier such as `eip155:97:0x8004...`.
pub fn caip10_address(chain_id: u64, contract_address: &str) -> String {
    format!("eip155:{}:{}", chain_id, contract_address)
}

/// Shortens an address for display, keeping `chars` characters after the
/// `0x` prefix and at the end.
pub fn truncate_address(address: &str, chars: usize) -> String {
    let len = address.chars().count();
    if len <= chars * 2 + 4 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars + 2).collect();
    let tail: String = address.chars().skip(len - chars).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caip10() {
        assert_eq!(
            caip10_address(97, "0x8004A818BFB912233c491871b3d84c89A494BD9e"),
            "eip155:97:0x8004A818BFB912233c491871b3d84c89A494BD9e"
        );
    }

    #[test]
    fn truncate_long_address() {
        let addr = "0x8004A818BFB912233c491871b3d84c89A494BD9e";
        assert_eq!(truncate_address(addr, 4), "0x8004...BD9e");
        assert_eq!(truncate_address(addr, 6), "0x8004A8...94BD9e");
    }

    #[test]
    fn short_strings_unchanged() {
        assert_eq!(truncate_address("0x1234", 4), "0x1234");
        assert_eq!(truncate_address("0x12345678ab", 4), "0x12345678ab");
    }
}
