/// Encode i16 PCM samples as the service's wire format: little-endian
/// 32-bit float in [-1.0, 1.0].
pub fn f32le_bytes(samples: &[i16]) -> Vec<u8> {
    samples
        .iter()
        .map(|&s| s as f32 / 32768.0)
        .flat_map(|f| f.to_le_bytes())
        .collect()
}
