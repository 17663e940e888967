// src/service/astro.rs

//! 行星时计算
//!
//! 日主星按星期选取；行星时长度由日出日落时间推算。
//! 字形字母对应 Astronomicon 字体中的行星符号。

use jiff::{SignedDuration, Timestamp};

use crate::common::LayoutConfig;

/// 行星查找记录，颜色目前不参与渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planet {
    pub name: &'static str,
    /// 符号字体中的字形
    pub letter: &'static str,
    pub bg_color: &'static str,
    pub fg_color: &'static str,
}

pub const LUNAR: Planet = Planet {
    name: "Moon",
    letter: "R",
    bg_color: "violet",
    fg_color: "white",
};
pub const MARS: Planet = Planet {
    name: "Mars",
    letter: "U",
    bg_color: "red",
    fg_color: "white",
};
pub const MERCURY: Planet = Planet {
    name: "Mercury",
    letter: "S",
    bg_color: "orange",
    fg_color: "white",
};
pub const JUPITER: Planet = Planet {
    name: "Jupiter",
    letter: "V",
    bg_color: "blue",
    fg_color: "white",
};
pub const VENUS: Planet = Planet {
    name: "Venus",
    letter: "T",
    bg_color: "green",
    fg_color: "white",
};
pub const SATURN: Planet = Planet {
    name: "Saturn",
    letter: "W",
    bg_color: "black",
    fg_color: "white",
};
pub const SOLAR: Planet = Planet {
    name: "Sun",
    letter: "Q",
    bg_color: "yellow",
    fg_color: "white",
};

/// 日主星，下标为星期（周一为 0）
pub const DAY_RULERS: [Planet; 7] = [LUNAR, MARS, MERCURY, JUPITER, VENUS, SATURN, SOLAR];

/// 时主星顺序（迦勒底序）
pub const HOUR_RULERS: [Planet; 7] = [SATURN, JUPITER, MARS, SOLAR, VENUS, MERCURY, LUNAR];

/// 页面上显示的时主星
///
/// 始终为土星：行星时长度虽已算出，但尚未用于选取当前时主星。
pub const DISPLAYED_HOUR_RULER: Planet = SATURN;

/// 按星期（周一为 0）取日主星，超出范围时按 7 取模
pub fn day_ruler(weekday: u8) -> Planet {
    DAY_RULERS[weekday as usize % DAY_RULERS.len()]
}

/// 白昼行星时长度：(日落 - 日出) / 12，截断到整秒
pub fn planetary_hour_length(sunrise: Timestamp, sunset: Timestamp) -> SignedDuration {
    let elapsed = sunset.as_second() - sunrise.as_second();
    SignedDuration::from_secs(elapsed / 12)
}

/// 月相分桶：floor(phase * 12) mod 12
pub fn moon_icon_index(phase: f64) -> usize {
    let buckets = LayoutConfig::MOON_ICON_COUNT as f64;
    let index = (phase * buckets).floor().rem_euclid(buckets);
    // phase 逼近 1.0 时浮点乘法可能恰好得到 12
    (index as usize).min(LayoutConfig::MOON_ICON_COUNT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_rulers_follow_weekday_order() {
        let names: Vec<_> = (0..7).map(|d| day_ruler(d).name).collect();
        assert_eq!(
            names,
            ["Moon", "Mars", "Mercury", "Jupiter", "Venus", "Saturn", "Sun"]
        );
        // 纯函数：同一输入结果相同
        for d in 0..7 {
            assert_eq!(day_ruler(d), day_ruler(d));
        }
        assert_eq!(day_ruler(7), LUNAR);
    }

    #[test]
    fn day_ruler_letters_match_symbol_font() {
        let letters: String = DAY_RULERS.iter().map(|p| p.letter).collect();
        assert_eq!(letters, "RUSVTWQ");
        assert_eq!(DISPLAYED_HOUR_RULER.letter, "W");
    }

    #[test]
    fn hour_rulers_are_chaldean_order() {
        let names: Vec<_> = HOUR_RULERS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["Saturn", "Jupiter", "Mars", "Sun", "Venus", "Mercury", "Moon"]
        );
    }

    #[test]
    fn moon_index_bucket_edges() {
        assert_eq!(moon_icon_index(0.0), 0);
        assert_eq!(moon_icon_index(1.0 / 12.0 - 1e-9), 0);
        assert_eq!(moon_icon_index(1.0 / 12.0), 1);
        assert_eq!(moon_icon_index(0.5), 6);
        assert_eq!(moon_icon_index(0.999_999), 11);
        assert_eq!(moon_icon_index(1.0 - f64::EPSILON), 11);
        assert_eq!(moon_icon_index(1.0), 0);
    }

    #[test]
    fn hour_length_truncates_to_whole_seconds() {
        let sunrise = Timestamp::from_second(1_700_000_000).unwrap();
        // 12 小时 + 11 秒，除以 12 余数被舍去
        let sunset = Timestamp::from_second(1_700_000_000 + 12 * 3600 + 11).unwrap();
        assert_eq!(
            planetary_hour_length(sunrise, sunset),
            SignedDuration::from_secs(3600)
        );

        let sunset = Timestamp::from_second(1_700_000_000 + 10 * 3600 + 25).unwrap();
        assert_eq!(
            planetary_hour_length(sunrise, sunset),
            SignedDuration::from_secs(3002)
        );
    }
}
