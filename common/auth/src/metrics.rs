use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Rejections by [`crate::AuthError::kind`], recorded before the guard collapses them.
pub static AUTH_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("auth_rejections_total", "Requests rejected by the auth guard, by failure kind"),
        &["kind"],
    )
    .unwrap();
    REGISTRY.register(Box::new(counter.clone())).ok();
    counter
});

pub fn record_rejection(kind: &str) {
    AUTH_REJECTIONS.with_label_values(&[kind]).inc();
}

/// Prometheus text exposition of the auth registry.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_show_up_in_exposition() {
        let before = AUTH_REJECTIONS.with_label_values(&["missing_header"]).get();
        record_rejection("missing_header");
        assert_eq!(AUTH_REJECTIONS.with_label_values(&["missing_header"]).get(), before + 1);
        assert!(gather().contains("auth_rejections_total{kind=\"missing_header\"}"));
    }
}
