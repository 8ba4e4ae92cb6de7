use crate::{CacheStore, StoreError};

const KILO: u64 = 1024;
const MEGA: u64 = 1024 * 1024;

/// Human readable cache size: `N bytes`, `X.YZ Kb` or `X.YZ Mb` with three
/// significant digits. Kilobyte values that would round to 1000 are shown
/// in megabytes; megabytes is the largest unit.
pub fn scale_size(bytes: u64) -> String {
    let kilobytes = bytes as f64 / KILO as f64;
    if bytes < KILO {
        format!("{bytes} bytes")
    } else if kilobytes < 999.5 {
        format!("{} Kb", three_significant(kilobytes))
    } else {
        format!("{} Mb", three_significant(bytes as f64 / MEGA as f64))
    }
}

fn three_significant(value: f64) -> String {
    let mut decimals: usize = if value < 1.0 {
        3
    } else if value < 10.0 {
        2
    } else if value < 100.0 {
        1
    } else {
        0
    };
    loop {
        let text = format!("{value:.decimals$}");
        // Rounding can carry into another integer digit (9.999 -> 10.00).
        // A lone leading zero is not significant (0.976).
        let integer_digits = match text.split('.').next() {
            Some("0") | None => 0,
            Some(integer) => integer.len(),
        };
        if decimals == 0 || integer_digits + decimals <= 3 {
            return text;
        }
        decimals -= 1;
    }
}

/// What the status popup shows for the cache.
pub async fn report_cache_size(store: &dyn CacheStore) -> Result<String, StoreError> {
    let bytes = store.size_in_use().await?;
    Ok(scale_size(bytes))
}

/// Empties the cache and reports the size afterwards.
pub async fn clear_cache(store: &dyn CacheStore) -> Result<String, StoreError> {
    store.clear().await?;
    report_cache_size(store).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sizes_are_plain_bytes() {
        assert_eq!(scale_size(0), "0 bytes");
        assert_eq!(scale_size(1023), "1023 bytes");
    }

    #[test]
    fn kilobytes_keep_three_significant_digits() {
        assert_eq!(scale_size(1024), "1.00 Kb");
        assert_eq!(scale_size(1536), "1.50 Kb");
        assert_eq!(scale_size(12_800), "12.5 Kb");
        assert_eq!(scale_size(512_000), "500 Kb");
    }

    #[test]
    fn rounding_carry_drops_a_decimal() {
        // 10239 / 1024 = 9.999..
        assert_eq!(scale_size(10_239), "10.0 Kb");
    }

    #[test]
    fn kilobytes_that_round_to_a_thousand_move_to_megabytes() {
        assert_eq!(scale_size(1_022_976), "999 Kb");
        // 999.5 Kb
        assert_eq!(scale_size(1_023_488), "0.976 Mb");
        assert_eq!(scale_size(1_048_063), "1.00 Mb");
        assert_eq!(scale_size(MEGA - 1), "1.00 Mb");
    }

    #[test]
    fn megabytes() {
        assert_eq!(scale_size(3 * MEGA), "3.00 Mb");
    }
}
