//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Gzip layer. Image bytes are already compressed, so only JSON benefits.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new()
}
