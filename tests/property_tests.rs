use hikari_compressor::{
    calculate_resize_dimensions, compose_file_name, estimate_size, CompressionSettings, Engine,
    OutputFormat, QualityTier, ResizeSetting,
};
use proptest::prelude::*;

fn tier_strategy() -> impl Strategy<Value = QualityTier> {
    prop::sample::select(QualityTier::ALL.to_vec())
}

fn format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop::sample::select(OutputFormat::ALL.to_vec())
}

fn resize_strategy() -> impl Strategy<Value = ResizeSetting> {
    prop_oneof![
        Just(ResizeSetting::disabled()),
        (1u32..=200u32).prop_map(|pct| ResizeSetting::scaled(pct.to_string())),
        Just(ResizeSetting::scaled("abc")),
    ]
}

proptest! {
    #[test]
    fn estimate_never_exceeds_original(
        size in 0u64..=10_000_000_000u64,
        width in 1u32..=8000u32,
        height in 1u32..=8000u32,
        tier in tier_strategy(),
        format in format_strategy(),
        resize in resize_strategy(),
    ) {
        let settings = CompressionSettings::new(tier, format, Engine::Image, resize);
        let estimate = estimate_size(size, Some((width, height)), &settings);

        prop_assert!(estimate.estimated_size <= size);
        prop_assert!(estimate.reduction_percent >= 0.0);
        prop_assert!(estimate.reduction_percent <= 100.0);
        if size == 0 {
            prop_assert_eq!(estimate.reduction_percent, 0.0);
        }
    }

    #[test]
    fn lower_tier_never_estimates_larger(
        size in 1u64..=1_000_000_000u64,
        format in format_strategy(),
    ) {
        let sizes: Vec<u64> = QualityTier::ALL
            .iter()
            .map(|&tier| {
                let settings = CompressionSettings::new(tier, format, Engine::Image, ResizeSetting::disabled());
                estimate_size(size, None, &settings).estimated_size
            })
            .collect();
        prop_assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn disabled_resize_is_identity(
        width in 1u32..=20000u32,
        height in 1u32..=20000u32,
        scale in ".*",
    ) {
        prop_assert_eq!(calculate_resize_dimensions(width, height, &scale, false), (width, height));
    }

    #[test]
    fn resize_never_yields_zero(
        width in 1u32..=20000u32,
        height in 1u32..=20000u32,
        pct in 0.01f64..=100.0f64,
    ) {
        let (new_width, new_height) = calculate_resize_dimensions(width, height, &pct.to_string(), true);
        prop_assert!(new_width >= 1 && new_height >= 1);
        prop_assert!(new_width <= width && new_height <= height);
    }

    #[test]
    fn resize_rejects_non_positive_scales(
        width in 1u32..=20000u32,
        height in 1u32..=20000u32,
        pct in -1000i32..=0i32,
    ) {
        prop_assert_eq!(
            calculate_resize_dimensions(width, height, &pct.to_string(), true),
            (width, height)
        );
    }

    #[test]
    fn composed_name_has_stable_shape(
        stem in "[a-zA-Z0-9_ -]{1,24}",
        tier in tier_strategy(),
        format in format_strategy(),
        resize in resize_strategy(),
    ) {
        let name = compose_file_name(&stem, tier, &resize, format);
        let marker = format!("{}_compressed-{}", stem, tier.name());

        prop_assert!(name.starts_with(&marker));
        let suffix = format!(".{}", format.extension());
        prop_assert!(name.ends_with(&suffix));
        prop_assert_eq!(name.contains("pct."), resize.enabled);
        prop_assert_eq!(name.clone(), compose_file_name(&stem, tier, &resize, format));
    }
}
