/// VRAM in GB encoded in a catalog model id.
///
/// Model ids end in a `<N>gb` token (`h100-sxm5-80gb`, `a100-nvlink-40gb`); the
/// provider's inventory is keyed by the same ids, so this convention lives here
/// and nowhere else.
pub fn parse_vram_gb(model_id: &str) -> Option<u32> {
    let last = model_id.rsplit('-').next()?;
    last.strip_suffix("gb").unwrap_or(last).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vram_from_model_id() {
        assert_eq!(parse_vram_gb("a100-nvlink-40gb"), Some(40));
        assert_eq!(parse_vram_gb("h100-sxm5-80gb"), Some(80));
        assert_eq!(parse_vram_gb("geforcertx3070ti-pcie-8gb"), Some(8));
    }

    #[test]
    fn test_parse_vram_rejects_ids_without_size() {
        assert_eq!(parse_vram_gb("h100"), None);
        assert_eq!(parse_vram_gb("h100-sxm5-"), None);
        assert_eq!(parse_vram_gb("rtx-pcie-lotsgb"), None);
    }
}
